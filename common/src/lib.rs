pub mod cart;
mod deserialize_non_blank_string;
pub mod errors;
pub mod fixtures;
pub mod utils;
