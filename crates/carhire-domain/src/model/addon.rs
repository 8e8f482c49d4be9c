use carhire_types::{BillingType, CarCategory};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Identified;

/// Optional priced extra attachable to a reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addon {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub billing: BillingType,
    /// Categories the addon may be booked with; empty means every category
    pub categories: Vec<CarCategory>,
}

impl Addon {
    pub fn is_eligible_for(&self, category: CarCategory) -> bool {
        self.categories.is_empty() || self.categories.contains(&category)
    }
}

impl Identified for Addon {
    fn id(&self) -> i64 {
        self.id
    }
}
