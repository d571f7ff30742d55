pub mod aggregates;
pub mod line_item;
pub mod report;

pub use aggregates::{Aggregate, OrderAggregates};
pub use line_item::LineItem;
pub use report::{ItemVerification, VerificationReport};
