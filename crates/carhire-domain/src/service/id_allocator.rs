//! Identity allocation: highest existing id + 1
//!
//! Nothing is reserved. Two allocations over the same snapshot return the same
//! id, so callers must persist before allocating again.

use carhire_types::{Error, Result};

/// Fails when the highest id is already `i64::MAX`
pub fn next_id<I>(existing: I) -> Result<i64>
where
    I: IntoIterator<Item = i64>,
{
    match existing.into_iter().max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| Error::InvalidState(format!("no identifier left after {}", max))),
    }
}
