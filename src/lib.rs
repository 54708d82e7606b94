pub mod level;
pub mod setup;
