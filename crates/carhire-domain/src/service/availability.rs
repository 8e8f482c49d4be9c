//! Availability checks over a car's attached reservations

use chrono::NaiveDate;

use crate::model::{Car, Reservation};

/// Closed-interval overlap: ranges sharing only a boundary day still conflict
pub fn ranges_overlap(
    from: NaiveDate,
    to: NaiveDate,
    other_from: NaiveDate,
    other_to: NaiveDate,
) -> bool {
    to >= other_from && from <= other_to
}

/// Whether `[from, to]` is free on `car`, ignoring cancelled reservations
pub fn is_available(car: &Car, from: NaiveDate, to: NaiveDate) -> bool {
    conflicting(car, from, to, None).is_none()
}

/// Like [`is_available`] but ignores reservation `excluded_id`, for re-dating
/// an existing reservation
pub fn is_available_excluding(
    car: &Car,
    from: NaiveDate,
    to: NaiveDate,
    excluded_id: i64,
) -> bool {
    conflicting(car, from, to, Some(excluded_id)).is_none()
}

/// First blocking reservation overlapping `[from, to]`
pub fn conflicting(
    car: &Car,
    from: NaiveDate,
    to: NaiveDate,
    excluded_id: Option<i64>,
) -> Option<&Reservation> {
    car.reservations
        .iter()
        .filter(|r| r.status.blocks_car())
        .filter(|r| Some(r.id) != excluded_id)
        .find(|r| ranges_overlap(from, to, r.start, r.end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, User};
    use carhire_types::{CarCategory, ReservationStatus};
    use rust_decimal::Decimal;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, d).unwrap()
    }

    fn booking(id: i64, start: u32, end: u32, status: ReservationStatus) -> Reservation {
        Reservation {
            id,
            customer: User {
                id: 1,
                login: "anna".into(),
                password: "secret".into(),
                first_name: "Anna".into(),
                last_name: "Nowak".into(),
                role: Role::Customer {
                    email: "anna@example.com".into(),
                },
            },
            car_id: 1,
            start: day(start),
            end: day(end),
            status,
            total_price: Decimal::ZERO,
            addons: vec![],
        }
    }

    fn car_with(reservations: Vec<Reservation>) -> Car {
        Car {
            id: 1,
            make: "Skoda".into(),
            model: "Fabia".into(),
            registration: "WA 12345".into(),
            horsepower: 90,
            model_year: 2022,
            category: CarCategory::City,
            tariff: None,
            reservations,
        }
    }

    #[test]
    fn test_free_car_is_available() {
        assert!(is_available(&car_with(vec![]), day(1), day(5)));
    }

    #[test]
    fn test_touching_boundaries_conflict() {
        let car = car_with(vec![booking(1, 10, 12, ReservationStatus::New)]);
        assert!(!is_available(&car, day(12), day(14)));
        assert!(!is_available(&car, day(8), day(10)));
        assert!(is_available(&car, day(13), day(14)));
        assert!(is_available(&car, day(7), day(9)));
    }

    #[test]
    fn test_containment_conflicts() {
        let car = car_with(vec![booking(1, 10, 20, ReservationStatus::InProgress)]);
        assert!(!is_available(&car, day(12), day(13)));
        assert!(!is_available(&car, day(5), day(25)));
    }

    #[test]
    fn test_cancelled_reservations_do_not_block() {
        let car = car_with(vec![booking(1, 10, 12, ReservationStatus::Cancelled)]);
        assert!(is_available(&car, day(10), day(12)));
    }

    #[test]
    fn test_completed_reservations_still_block() {
        let car = car_with(vec![booking(1, 10, 12, ReservationStatus::Completed)]);
        assert!(!is_available(&car, day(11), day(11)));
    }

    #[test]
    fn test_excluding_self() {
        let car = car_with(vec![
            booking(1, 10, 12, ReservationStatus::New),
            booking(2, 20, 22, ReservationStatus::New),
        ]);
        assert!(is_available_excluding(&car, day(11), day(14), 1));
        assert!(!is_available_excluding(&car, day(11), day(20), 1));
    }

    #[test]
    fn test_matches_brute_force_day_scan() {
        let car = car_with(vec![
            booking(1, 5, 7, ReservationStatus::New),
            booking(2, 15, 15, ReservationStatus::Completed),
            booking(3, 9, 12, ReservationStatus::Cancelled),
        ]);
        let blocked: Vec<u32> = vec![5, 6, 7, 15];
        for from in 1..=20 {
            for to in from..=20 {
                let expected = !(from..=to).any(|d| blocked.contains(&d));
                assert_eq!(is_available(&car, day(from), day(to)), expected, "{}..{}", from, to);
            }
        }
    }
}
