//! Domain model types

pub mod addon;
pub mod car;
pub mod reservation;
pub mod tariff;
pub mod user;

pub use addon::Addon;
pub use car::{Car, CarRecord};
pub use reservation::{Reservation, ReservationRecord};
pub use tariff::Tariff;
pub use user::{Role, User};

/// Entities stored in a table keyed by an integer id
pub trait Identified {
    fn id(&self) -> i64;
}
