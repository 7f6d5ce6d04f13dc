pub mod clock;
pub mod log;
pub mod program;
pub mod relay;
pub mod scheduler;
