use carhire_types::ReservationStatus;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Addon, Identified, User};

/// Reservation row as stored in the reservations table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub id: i64,
    pub customer_id: i64,
    pub car_id: i64,
    pub start: NaiveDate,
    /// Inclusive
    pub end: NaiveDate,
    pub status: ReservationStatus,
    /// Cached at creation/update time, never recomputed on read
    pub total_price: Decimal,
    /// Duplicates allowed
    pub addon_ids: Vec<i64>,
}

impl Identified for ReservationRecord {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Reservation with its customer and addons resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub customer: User,
    pub car_id: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: ReservationStatus,
    pub total_price: Decimal,
    pub addons: Vec<Addon>,
}

impl Reservation {
    /// Strip relationships back to bare identifiers
    pub fn to_record(&self) -> ReservationRecord {
        ReservationRecord {
            id: self.id,
            customer_id: self.customer.id,
            car_id: self.car_id,
            start: self.start,
            end: self.end,
            status: self.status,
            total_price: self.total_price,
            addon_ids: self.addons.iter().map(|a| a.id).collect(),
        }
    }
}

impl Identified for Reservation {
    fn id(&self) -> i64 {
        self.id
    }
}
