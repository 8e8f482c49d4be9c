//! Persistence implementations
//!
//! This module provides file-based implementations of the repository traits.

mod flat_file_repo;

pub use flat_file_repo::{
    FileAddonRepository, FileCarRepository, FileReservationRepository, FileTariffRepository,
    FileUserRepository, FlatFileRepository,
};
