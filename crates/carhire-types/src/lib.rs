//! Core types for the carhire rental core

mod error;
mod types;

pub use error::*;
pub use types::*;
