//! Domain services

pub mod availability;
pub mod id_allocator;
pub mod pricing;
pub mod resolver;
pub mod validation;

pub use availability::{conflicting, is_available, is_available_excluding, ranges_overlap};
pub use id_allocator::next_id;
pub use pricing::{billable_days, breakdown, price, PriceBreakdown};
pub use resolver::{resolve, strip_reservations, IntegrityWarning, Resolved, Tables};
