pub mod logger;
pub mod steps;
