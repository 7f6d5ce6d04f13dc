pub mod colors;
pub mod path;
pub mod time;
