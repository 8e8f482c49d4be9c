//! Application services
//!
//! Each service borrows the repository bundle and works on fresh table reads
//! for every call.

pub mod account_service;
pub mod addon_service;
pub mod booking_service;
pub mod fleet_service;
pub mod tariff_service;

pub use account_service::{AccountService, Registration};
pub use addon_service::{AddonDraft, AddonService};
pub use booking_service::{BookingEngine, ReservationChange};
pub use fleet_service::{CarDraft, FleetService};
pub use tariff_service::TariffService;
