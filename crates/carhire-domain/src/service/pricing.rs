//! Rental price computation

use carhire_types::{BillingType, Error, Result};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::model::{Addon, Car};

/// Itemised price of a rental
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Billed days, at least 1
    pub days: i64,
    pub daily_rate: Decimal,
    /// daily rate x days
    pub base: Decimal,
    /// Sum of addon contributions, unrounded
    pub addons: Decimal,
    /// base + addons, rounded half-up to 2 places
    pub total: Decimal,
}

/// Billed days: whole days between the dates, floored at 1.
///
/// A same-day rental is one day; `from..to` spanning three calendar days
/// bills two.
pub fn billable_days(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days().max(1)
}

fn out_of_range() -> Error {
    Error::validation("price out of range")
}

/// Contribution of one addon to the total
pub fn addon_charge(addon: &Addon, base: Decimal, days: i64) -> Result<Decimal> {
    match addon.billing {
        BillingType::PerDay => addon.price.checked_mul(Decimal::from(days)),
        BillingType::OneTime => Some(addon.price),
        BillingType::PercentOfBase => base.checked_mul(addon.price),
    }
    .ok_or_else(out_of_range)
}

/// Round half-up to cents and pin the scale to 2
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Full breakdown for renting `car` over `[from, to]` with `addons`.
///
/// Fails with [`Error::NoTariff`] when the car has no resolved tariff, and
/// with a validation error when the amounts overflow.
pub fn breakdown(
    car: &Car,
    from: NaiveDate,
    to: NaiveDate,
    addons: &[Addon],
) -> Result<PriceBreakdown> {
    let tariff = car
        .tariff
        .as_ref()
        .ok_or(Error::NoTariff { car_id: car.id })?;

    let days = billable_days(from, to);
    let base = tariff
        .daily_rate
        .checked_mul(Decimal::from(days))
        .ok_or_else(out_of_range)?;
    let mut addons_total = Decimal::ZERO;
    for addon in addons {
        addons_total = addons_total
            .checked_add(addon_charge(addon, base, days)?)
            .ok_or_else(out_of_range)?;
    }
    let total = base.checked_add(addons_total).ok_or_else(out_of_range)?;

    Ok(PriceBreakdown {
        days,
        daily_rate: tariff.daily_rate,
        base,
        addons: addons_total,
        total: round_money(total),
    })
}

/// Total price for renting `car` over `[from, to]` with `addons`
pub fn price(car: &Car, from: NaiveDate, to: NaiveDate, addons: &[Addon]) -> Result<Decimal> {
    breakdown(car, from, to, addons).map(|b| b.total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tariff;
    use carhire_types::CarCategory;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 3, d).unwrap()
    }

    fn car(daily_rate: Option<&str>) -> Car {
        Car {
            id: 4,
            make: "Toyota".into(),
            model: "RAV4".into(),
            registration: "KR 4242".into(),
            horsepower: 180,
            model_year: 2023,
            category: CarCategory::Suv,
            tariff: daily_rate.map(|rate| Tariff {
                id: 2,
                category: CarCategory::Suv,
                daily_rate: dec(rate),
                extra_driver_percent: dec("10"),
            }),
            reservations: vec![],
        }
    }

    fn addon(id: i64, price: &str, billing: BillingType) -> Addon {
        Addon {
            id,
            name: format!("addon-{}", id),
            price: dec(price),
            billing,
            categories: vec![],
        }
    }

    #[test]
    fn test_same_day_is_one_day() {
        assert_eq!(billable_days(day(5), day(5)), 1);
        assert_eq!(price(&car(Some("129.99")), day(5), day(5), &[]).unwrap(), dec("129.99"));
    }

    #[test]
    fn test_days_are_date_difference() {
        assert_eq!(billable_days(day(1), day(2)), 1);
        assert_eq!(billable_days(day(1), day(3)), 2);
    }

    #[test]
    fn test_mixed_addons() {
        let addons = vec![
            addon(1, "10.00", BillingType::PerDay),
            addon(2, "5.00", BillingType::OneTime),
            addon(3, "0.10", BillingType::PercentOfBase),
        ];

        let b = breakdown(&car(Some("100.00")), day(1), day(4), &addons).unwrap();
        assert_eq!(b.days, 3);
        assert_eq!(b.base, dec("300.00"));
        assert_eq!(b.addons, dec("65.00"));
        assert_eq!(b.total, dec("365.00"));
        assert_eq!(b.total.to_string(), "365.00");
    }

    #[test]
    fn test_percent_is_raw_fraction() {
        let addons = vec![addon(1, "10", BillingType::PercentOfBase)];
        let total = price(&car(Some("100.00")), day(1), day(2), &addons).unwrap();
        assert_eq!(total, dec("1100.00"));
    }

    #[test]
    fn test_duplicate_addons_count_twice() {
        let addons = vec![
            addon(1, "7.50", BillingType::OneTime),
            addon(1, "7.50", BillingType::OneTime),
        ];
        let total = price(&car(Some("50")), day(1), day(2), &addons).unwrap();
        assert_eq!(total, dec("65.00"));
    }

    #[test]
    fn test_rounds_half_up() {
        let addons = vec![addon(1, "0.125", BillingType::PercentOfBase)];
        // base 10.20 * 0.125 = 1.275 -> total 11.475 -> 11.48
        let total = price(&car(Some("10.20")), day(1), day(2), &addons).unwrap();
        assert_eq!(total.to_string(), "11.48");
    }

    #[test]
    fn test_integer_rate_renders_with_cents() {
        let total = price(&car(Some("80")), day(1), day(4), &[]).unwrap();
        assert_eq!(total.to_string(), "240.00");
    }

    #[test]
    fn test_overflow_is_an_error() {
        let err = price(&car(Some("79228162514264337593543950335")), day(1), day(3), &[]).unwrap_err();
        assert_eq!(err.kind(), carhire_types::ErrorKind::Validation);

        let addons = vec![addon(1, "79228162514264337593543950335", BillingType::OneTime)];
        assert!(price(&car(Some("100")), day(1), day(2), &addons).is_err());
    }

    #[test]
    fn test_missing_tariff() {
        let err = price(&car(None), day(1), day(2), &[]).unwrap_err();
        assert!(matches!(err, Error::NoTariff { car_id: 4 }));
    }
}
