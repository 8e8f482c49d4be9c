//! Relationship resolver
//!
//! Tables store foreign keys as bare ids. After the tables are loaded
//! independently, [`resolve`] joins them in memory: cars get their tariff,
//! reservations get their customer and addons, and each car gets the
//! reservations pointing at it. Broken links never abort the pass; they are
//! reported as [`IntegrityWarning`]s alongside the resolved data.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::model::{
    Addon, Car, CarRecord, Reservation, ReservationRecord, Tariff, User,
};

/// Independently loaded table contents
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub tariffs: Vec<Tariff>,
    pub addons: Vec<Addon>,
    pub cars: Vec<CarRecord>,
    pub users: Vec<User>,
    pub reservations: Vec<ReservationRecord>,
}

/// A stored reference that did not resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityWarning {
    /// Reservation dropped: customer id unknown
    MissingCustomer { reservation_id: i64, customer_id: i64 },
    /// Reservation dropped: the user exists but is not a customer
    NotACustomer { reservation_id: i64, user_id: i64 },
    /// Reservation dropped: car id unknown
    MissingCar { reservation_id: i64, car_id: i64 },
    /// Addon skipped, reservation kept
    MissingAddon { reservation_id: i64, addon_id: i64 },
    /// Car kept without a tariff
    MissingTariff { car_id: i64, tariff_id: i64 },
}

impl IntegrityWarning {
    /// Whether the referencing reservation was left out of the result
    pub fn drops_reservation(&self) -> bool {
        matches!(
            self,
            IntegrityWarning::MissingCustomer { .. }
                | IntegrityWarning::NotACustomer { .. }
                | IntegrityWarning::MissingCar { .. }
        )
    }
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::MissingCustomer {
                reservation_id,
                customer_id,
            } => write!(
                f,
                "reservation {} references missing customer {} (dropped)",
                reservation_id, customer_id
            ),
            IntegrityWarning::NotACustomer {
                reservation_id,
                user_id,
            } => write!(
                f,
                "reservation {} references user {} who is not a customer (dropped)",
                reservation_id, user_id
            ),
            IntegrityWarning::MissingCar {
                reservation_id,
                car_id,
            } => write!(
                f,
                "reservation {} references missing car {} (dropped)",
                reservation_id, car_id
            ),
            IntegrityWarning::MissingAddon {
                reservation_id,
                addon_id,
            } => write!(
                f,
                "reservation {} references missing addon {} (addon skipped)",
                reservation_id, addon_id
            ),
            IntegrityWarning::MissingTariff { car_id, tariff_id } => write!(
                f,
                "car {} references missing tariff {} (car has no tariff)",
                car_id, tariff_id
            ),
        }
    }
}

/// Result of a resolver pass
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    /// Cars in file order, each with its tariff and reservations
    pub cars: Vec<Car>,
    /// Reservations whose customer and car resolved, in file order
    pub reservations: Vec<Reservation>,
    pub warnings: Vec<IntegrityWarning>,
}

impl Resolved {
    pub fn car(&self, id: i64) -> Option<&Car> {
        self.cars.iter().find(|c| c.id == id)
    }

    pub fn reservation(&self, id: i64) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }
}

/// Join the loaded tables.
///
/// Duplicate ids resolve to the first row with that id.
pub fn resolve(tables: &Tables) -> Resolved {
    let mut warnings = Vec::new();

    let tariffs_by_id = index_first(&tables.tariffs, |t| t.id);
    let users_by_id = index_first(&tables.users, |u| u.id);
    let addons_by_id = index_first(&tables.addons, |a| a.id);

    let mut cars: Vec<Car> = tables
        .cars
        .iter()
        .map(|record| {
            let tariff = record.tariff_id.and_then(|tariff_id| {
                let found = tariffs_by_id.get(&tariff_id).map(|t| (*t).clone());
                if found.is_none() {
                    warnings.push(IntegrityWarning::MissingTariff {
                        car_id: record.id,
                        tariff_id,
                    });
                }
                found
            });
            Car::from_record(record.clone(), tariff)
        })
        .collect();

    let car_positions = index_first_position(&cars, |c| c.id);

    let mut reservations = Vec::with_capacity(tables.reservations.len());
    for record in &tables.reservations {
        let customer = match users_by_id.get(&record.customer_id) {
            Some(user) if user.is_customer() => (*user).clone(),
            Some(_) => {
                warnings.push(IntegrityWarning::NotACustomer {
                    reservation_id: record.id,
                    user_id: record.customer_id,
                });
                continue;
            }
            None => {
                warnings.push(IntegrityWarning::MissingCustomer {
                    reservation_id: record.id,
                    customer_id: record.customer_id,
                });
                continue;
            }
        };

        if !car_positions.contains_key(&record.car_id) {
            warnings.push(IntegrityWarning::MissingCar {
                reservation_id: record.id,
                car_id: record.car_id,
            });
            continue;
        }

        let mut addons = Vec::with_capacity(record.addon_ids.len());
        for addon_id in &record.addon_ids {
            match addons_by_id.get(addon_id) {
                Some(addon) => addons.push((*addon).clone()),
                None => warnings.push(IntegrityWarning::MissingAddon {
                    reservation_id: record.id,
                    addon_id: *addon_id,
                }),
            }
        }

        reservations.push(Reservation {
            id: record.id,
            customer,
            car_id: record.car_id,
            start: record.start,
            end: record.end,
            status: record.status,
            total_price: record.total_price,
            addons,
        });
    }

    for reservation in &reservations {
        if let Some(&pos) = car_positions.get(&reservation.car_id) {
            cars[pos].reservations.push(reservation.clone());
        }
    }

    for warning in &warnings {
        tracing::warn!(%warning, "integrity warning");
    }

    Resolved {
        cars,
        reservations,
        warnings,
    }
}

/// Inverse of the resolver for reservations
pub fn strip_reservations(reservations: &[Reservation]) -> Vec<ReservationRecord> {
    reservations.iter().map(Reservation::to_record).collect()
}

fn index_first<T>(items: &[T], key: impl Fn(&T) -> i64) -> HashMap<i64, &T> {
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        map.entry(key(item)).or_insert(item);
    }
    map
}

fn index_first_position<T>(items: &[T], key: impl Fn(&T) -> i64) -> HashMap<i64, usize> {
    let mut map = HashMap::with_capacity(items.len());
    for (pos, item) in items.iter().enumerate() {
        map.entry(key(item)).or_insert(pos);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use carhire_types::{BillingType, CarCategory, ReservationStatus};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 9, d).unwrap()
    }

    fn customer(id: i64) -> User {
        User {
            id,
            login: format!("c{}", id),
            password: "pass".into(),
            first_name: "Jan".into(),
            last_name: "Kowalski".into(),
            role: Role::Customer {
                email: "jan@example.com".into(),
            },
        }
    }

    fn employee(id: i64) -> User {
        User {
            role: Role::Employee,
            ..customer(id)
        }
    }

    fn car(id: i64, tariff_id: Option<i64>) -> CarRecord {
        CarRecord {
            id,
            make: "Fiat".into(),
            model: "500".into(),
            registration: format!("PO {}", id),
            horsepower: 70,
            model_year: 2020,
            category: CarCategory::City,
            tariff_id,
        }
    }

    fn booking(id: i64, customer_id: i64, car_id: i64, addon_ids: Vec<i64>) -> ReservationRecord {
        ReservationRecord {
            id,
            customer_id,
            car_id,
            start: day(1),
            end: day(3),
            status: ReservationStatus::New,
            total_price: Decimal::new(20000, 2),
            addon_ids,
        }
    }

    fn tables() -> Tables {
        Tables {
            tariffs: vec![Tariff {
                id: 1,
                category: CarCategory::City,
                daily_rate: Decimal::new(10000, 2),
                extra_driver_percent: Decimal::ZERO,
            }],
            addons: vec![Addon {
                id: 5,
                name: "GPS".into(),
                price: Decimal::new(1000, 2),
                billing: BillingType::PerDay,
                categories: vec![],
            }],
            cars: vec![car(1, Some(1)), car(2, None), car(3, Some(99))],
            users: vec![customer(1), employee(2)],
            reservations: vec![
                booking(10, 1, 1, vec![5, 5]),
                booking(11, 1, 2, vec![]),
                booking(12, 1, 1, vec![77]),
            ],
        }
    }

    #[test]
    fn test_clean_tables_have_no_warnings() {
        let mut t = tables();
        t.cars.pop();
        t.reservations.pop();
        let resolved = resolve(&t);
        assert!(resolved.warnings.is_empty());
        assert_eq!(resolved.reservations.len(), 2);
    }

    #[test]
    fn test_cars_get_tariffs_and_reservations_in_file_order() {
        let resolved = resolve(&tables());
        let first = resolved.car(1).unwrap();
        assert_eq!(first.tariff.as_ref().map(|t| t.id), Some(1));
        let ids: Vec<i64> = first.reservations.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 12]);
        assert!(resolved.car(2).unwrap().tariff.is_none());
    }

    #[test]
    fn test_duplicate_addons_are_kept() {
        let resolved = resolve(&tables());
        assert_eq!(resolved.reservation(10).unwrap().addons.len(), 2);
    }

    #[test]
    fn test_missing_tariff_and_addon_are_reported() {
        let resolved = resolve(&tables());
        assert!(resolved.warnings.contains(&IntegrityWarning::MissingTariff {
            car_id: 3,
            tariff_id: 99
        }));
        assert!(resolved.warnings.contains(&IntegrityWarning::MissingAddon {
            reservation_id: 12,
            addon_id: 77
        }));
        assert!(resolved.reservation(12).unwrap().addons.is_empty());
    }

    #[test]
    fn test_unresolvable_reservations_are_dropped_with_warnings() {
        let mut t = tables();
        t.reservations.push(booking(20, 42, 1, vec![]));
        t.reservations.push(booking(21, 2, 1, vec![]));
        t.reservations.push(booking(22, 1, 404, vec![]));

        let resolved = resolve(&t);

        assert!(resolved.reservation(20).is_none());
        assert!(resolved.reservation(21).is_none());
        assert!(resolved.reservation(22).is_none());
        let dropped: Vec<&IntegrityWarning> = resolved
            .warnings
            .iter()
            .filter(|w| w.drops_reservation())
            .collect();
        assert_eq!(
            dropped,
            vec![
                &IntegrityWarning::MissingCustomer {
                    reservation_id: 20,
                    customer_id: 42
                },
                &IntegrityWarning::NotACustomer {
                    reservation_id: 21,
                    user_id: 2
                },
                &IntegrityWarning::MissingCar {
                    reservation_id: 22,
                    car_id: 404
                },
            ]
        );
    }

    #[test]
    fn test_strip_restores_records() {
        let mut t = tables();
        t.cars.pop();
        t.reservations.pop();
        let resolved = resolve(&t);
        assert_eq!(strip_reservations(&resolved.reservations), t.reservations);
    }
}
