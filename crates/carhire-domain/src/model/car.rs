use carhire_types::CarCategory;
use serde::{Deserialize, Serialize};

use super::{Identified, Reservation, Tariff};

/// Car row as stored in the cars table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarRecord {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub registration: String,
    pub horsepower: u32,
    pub model_year: i32,
    pub category: CarCategory,
    /// `None` is stored as `0`
    pub tariff_id: Option<i64>,
}

impl CarRecord {
    /// Registrations compare trimmed and case-insensitively, including
    /// non-ASCII letters
    pub fn registration_matches(&self, registration: &str) -> bool {
        self.registration.trim().to_lowercase() == registration.trim().to_lowercase()
    }
}

impl Identified for CarRecord {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Car with its tariff and reservations attached by the resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub registration: String,
    pub horsepower: u32,
    pub model_year: i32,
    pub category: CarCategory,
    pub tariff: Option<Tariff>,
    /// Derived from the reservations table, never persisted from here
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

impl Car {
    /// Attach a resolved tariff to a stored row; reservations start empty
    pub fn from_record(record: CarRecord, tariff: Option<Tariff>) -> Self {
        Self {
            id: record.id,
            make: record.make,
            model: record.model,
            registration: record.registration,
            horsepower: record.horsepower,
            model_year: record.model_year,
            category: record.category,
            tariff,
            reservations: Vec::new(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.make, self.model, self.registration)
    }
}

impl Identified for Car {
    fn id(&self) -> i64 {
        self.id
    }
}
