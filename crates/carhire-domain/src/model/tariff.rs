use carhire_types::CarCategory;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Identified;

/// Per-category daily rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub id: i64,
    pub category: CarCategory,
    /// Price of one rental day
    pub daily_rate: Decimal,
    /// Extra driver surcharge, in percent
    pub extra_driver_percent: Decimal,
}

impl Identified for Tariff {
    fn id(&self) -> i64 {
        self.id
    }
}
