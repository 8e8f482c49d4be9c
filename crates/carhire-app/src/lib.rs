//! Application service layer - config, repositories and use cases

pub mod app;
pub mod config;
pub mod repository;

pub use app::{
    AccountService, AddonDraft, AddonService, BookingEngine, CarDraft, FleetService,
    Registration, ReservationChange, TariffService,
};
pub use config::Config;
pub use repository::Repositories;
