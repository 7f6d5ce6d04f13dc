pub mod check;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod models;
pub mod pool;
pub mod queries;
pub mod stats;
pub mod store;
