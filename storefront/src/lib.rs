pub mod errors;
pub mod pages;
pub(crate) mod utils;
pub mod verification;

pub use utils::conversions::parse_price;
pub use verification::{Tolerance, verify, verify_with_tolerance};
