//! Row encoding for each table
//!
//! Column order is fixed by the table headers below. Decoding never panics:
//! anything unexpected becomes a [`RowError`] and the row is skipped by the
//! repository.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use carhire_domain::model::{Addon, CarRecord, ReservationRecord, Role, Tariff, User};
use carhire_store::{Row, TableDef};
use carhire_types::{CarCategory, RowError, UserKind};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub const TARIFFS: TableDef = TableDef {
    name: "tariffs",
    header: &["id", "category", "dailyRate", "extraDriverPercent"],
};

pub const ADDONS: TableDef = TableDef {
    name: "addons",
    header: &["id", "name", "price", "billingType", "eligibleCategories"],
};

pub const CARS: TableDef = TableDef {
    name: "cars",
    header: &[
        "id",
        "make",
        "model",
        "registration",
        "horsepower",
        "modelYear",
        "category",
        "tariffId",
    ],
};

pub const USERS: TableDef = TableDef {
    name: "users",
    header: &["type", "id", "login", "password", "firstName", "lastName", "email"],
};

pub const RESERVATIONS: TableDef = TableDef {
    name: "reservations",
    header: &[
        "id",
        "customerId",
        "carId",
        "startDate",
        "endDate",
        "status",
        "totalPrice",
        "addonIds",
    ],
};

/// Conversion between an entity and one table row
pub trait RowCodec: Sized {
    const TABLE: TableDef;

    fn decode(row: &[String]) -> Result<Self, RowError>;

    fn encode(&self) -> Row;
}

impl RowCodec for Tariff {
    const TABLE: TableDef = TARIFFS;

    fn decode(row: &[String]) -> Result<Self, RowError> {
        require_fields(row, 4)?;
        Ok(Tariff {
            id: parse_i64(&row[0], "id")?,
            category: parse_literal(&row[1])?,
            daily_rate: parse_decimal(&row[2], "dailyRate")?,
            extra_driver_percent: parse_decimal(&row[3], "extraDriverPercent")?,
        })
    }

    fn encode(&self) -> Row {
        vec![
            self.id.to_string(),
            self.category.to_string(),
            self.daily_rate.to_string(),
            self.extra_driver_percent.to_string(),
        ]
    }
}

impl RowCodec for Addon {
    const TABLE: TableDef = ADDONS;

    /// The eligible-categories column may be absent on older rows
    fn decode(row: &[String]) -> Result<Self, RowError> {
        require_fields(row, 4)?;
        Ok(Addon {
            id: parse_i64(&row[0], "id")?,
            name: row[1].clone(),
            price: parse_decimal(&row[2], "price")?,
            billing: parse_literal(&row[3])?,
            categories: parse_list(optional(row, 4), parse_literal::<CarCategory>)?,
        })
    }

    fn encode(&self) -> Row {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.price.to_string(),
            self.billing.to_string(),
            join_list(&self.categories),
        ]
    }
}

impl RowCodec for CarRecord {
    const TABLE: TableDef = CARS;

    fn decode(row: &[String]) -> Result<Self, RowError> {
        require_fields(row, 8)?;
        let tariff_id = parse_i64(&row[7], "tariffId")?;
        Ok(CarRecord {
            id: parse_i64(&row[0], "id")?,
            make: row[1].clone(),
            model: row[2].clone(),
            registration: row[3].clone(),
            horsepower: parse_number(&row[4], "horsepower")?,
            model_year: parse_number(&row[5], "modelYear")?,
            category: parse_literal(&row[6])?,
            tariff_id: (tariff_id != 0).then_some(tariff_id),
        })
    }

    fn encode(&self) -> Row {
        vec![
            self.id.to_string(),
            self.make.clone(),
            self.model.clone(),
            self.registration.clone(),
            self.horsepower.to_string(),
            self.model_year.to_string(),
            self.category.to_string(),
            self.tariff_id.unwrap_or(0).to_string(),
        ]
    }
}

impl RowCodec for User {
    const TABLE: TableDef = USERS;

    /// Employees may omit the trailing email column
    fn decode(row: &[String]) -> Result<Self, RowError> {
        require_fields(row, 6)?;
        let kind: UserKind = parse_literal(&row[0])?;
        let role = match kind {
            UserKind::Customer => {
                require_fields(row, 7)?;
                Role::Customer {
                    email: row[6].clone(),
                }
            }
            UserKind::Employee => Role::Employee,
        };
        Ok(User {
            id: parse_i64(&row[1], "id")?,
            login: row[2].clone(),
            password: row[3].clone(),
            first_name: row[4].clone(),
            last_name: row[5].clone(),
            role,
        })
    }

    fn encode(&self) -> Row {
        vec![
            self.kind().to_string(),
            self.id.to_string(),
            self.login.clone(),
            self.password.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.email().unwrap_or_default().to_string(),
        ]
    }
}

impl RowCodec for ReservationRecord {
    const TABLE: TableDef = RESERVATIONS;

    /// An empty or missing addon column means no addons
    fn decode(row: &[String]) -> Result<Self, RowError> {
        require_fields(row, 7)?;
        let start = parse_date(&row[3], "startDate")?;
        let end = parse_date(&row[4], "endDate")?;
        if end < start {
            return Err(RowError::ReversedRange { start, end });
        }
        Ok(ReservationRecord {
            id: parse_i64(&row[0], "id")?,
            customer_id: parse_i64(&row[1], "customerId")?,
            car_id: parse_i64(&row[2], "carId")?,
            start,
            end,
            status: parse_literal(&row[5])?,
            total_price: parse_decimal(&row[6], "totalPrice")?,
            addon_ids: parse_list(optional(row, 7), |s| parse_i64(s, "addonIds"))?,
        })
    }

    fn encode(&self) -> Row {
        vec![
            self.id.to_string(),
            self.customer_id.to_string(),
            self.car_id.to_string(),
            self.start.format(DATE_FORMAT).to_string(),
            self.end.format(DATE_FORMAT).to_string(),
            self.status.to_string(),
            self.total_price.to_string(),
            join_list(&self.addon_ids),
        ]
    }
}

fn require_fields(row: &[String], expected: usize) -> Result<(), RowError> {
    if row.len() < expected {
        return Err(RowError::FieldCount {
            expected,
            found: row.len(),
        });
    }
    Ok(())
}

fn optional(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

fn parse_i64(s: &str, column: &'static str) -> Result<i64, RowError> {
    parse_number(s, column)
}

fn parse_number<N: FromStr>(s: &str, column: &'static str) -> Result<N, RowError> {
    s.trim().parse().map_err(|_| RowError::InvalidNumber {
        column,
        value: s.to_string(),
    })
}

fn parse_decimal(s: &str, column: &'static str) -> Result<Decimal, RowError> {
    Decimal::from_str(s.trim()).map_err(|_| RowError::InvalidDecimal {
        column,
        value: s.to_string(),
    })
}

fn parse_date(s: &str, column: &'static str) -> Result<NaiveDate, RowError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| RowError::InvalidDate {
        column,
        value: s.to_string(),
    })
}

fn parse_literal<T: FromStr<Err = RowError>>(s: &str) -> Result<T, RowError> {
    s.trim().parse()
}

/// Comma-joined list; empty string is an empty list
fn parse_list<T>(
    s: &str,
    parse: impl Fn(&str) -> Result<T, RowError>,
) -> Result<Vec<T>, RowError> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse)
        .collect()
}

fn join_list<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use carhire_types::{BillingType, ReservationStatus};

    fn row(line: &str) -> Row {
        line.split(';').map(str::to_string).collect()
    }

    #[test]
    fn test_encoded_rows_fill_every_column() {
        let tariff = Tariff::decode(&row("1;CITY;99.50;10")).unwrap();
        assert_eq!(tariff.encode(), row("1;CITY;99.50;10"));
        assert_eq!(TARIFFS.column_count(), 4);
        assert_eq!(ADDONS.column_count(), 5);
        assert_eq!(CARS.column_count(), 8);
        assert_eq!(USERS.column_count(), 7);
        assert_eq!(RESERVATIONS.column_count(), 8);
    }

    #[test]
    fn test_addon_categories() {
        let addon = Addon::decode(&row("3;Roof box;25.00;ONE_TIME;SUV,LUXURY")).unwrap();
        assert_eq!(addon.billing, BillingType::OneTime);
        assert_eq!(addon.categories, vec![CarCategory::Suv, CarCategory::Luxury]);
        assert_eq!(addon.encode().join(";"), "3;Roof box;25.00;ONE_TIME;SUV,LUXURY");

        let all = Addon::decode(&row("4;GPS;10.00;PER_DAY;")).unwrap();
        assert!(all.categories.is_empty());
        let legacy = Addon::decode(&row("5;Chains;5;ONE_TIME")).unwrap();
        assert!(legacy.categories.is_empty());
    }

    #[test]
    fn test_car_zero_tariff_is_none() {
        let car = CarRecord::decode(&row("1;Fiat;500;PO 123;70;2020;CITY;0")).unwrap();
        assert_eq!(car.tariff_id, None);
        assert_eq!(car.encode()[7], "0");

        let car = CarRecord::decode(&row("2;Audi;Q7;KR 1;300;2022;LUXURY;4")).unwrap();
        assert_eq!(car.tariff_id, Some(4));
    }

    #[test]
    fn test_users_by_type() {
        let employee = User::decode(&row("EMPLOYEE;1;admin;admin;Ewa;Lis;")).unwrap();
        assert!(employee.is_employee());
        assert_eq!(employee.encode().join(";"), "EMPLOYEE;1;admin;admin;Ewa;Lis;");

        let short_employee = User::decode(&row("EMPLOYEE;2;boss;pw;Jan;Lis")).unwrap();
        assert!(short_employee.is_employee());

        let customer = User::decode(&row("CUSTOMER;3;ola;pw;Ola;Kot;ola@example.com")).unwrap();
        assert_eq!(customer.email(), Some("ola@example.com"));

        let err = User::decode(&row("CUSTOMER;4;ala;pw;Ala;Kot")).unwrap_err();
        assert_eq!(err, RowError::FieldCount { expected: 7, found: 6 });
    }

    #[test]
    fn test_reservation_row() {
        let line = "7;3;1;2030-05-01;2030-05-03;IN_PROGRESS;365.00;1,1,2";
        let r = ReservationRecord::decode(&row(line)).unwrap();
        assert_eq!(r.status, ReservationStatus::InProgress);
        assert_eq!(r.addon_ids, vec![1, 1, 2]);
        assert_eq!(r.total_price.to_string(), "365.00");
        assert_eq!(r.encode().join(";"), line);

        let bare = ReservationRecord::decode(&row("8;3;1;2030-05-01;2030-05-01;NEW;50.00;")).unwrap();
        assert!(bare.addon_ids.is_empty());
    }

    #[test]
    fn test_malformed_rows() {
        assert!(matches!(
            Tariff::decode(&row("1;CITY;abc;10")),
            Err(RowError::InvalidDecimal { column: "dailyRate", .. })
        ));
        assert!(matches!(
            CarRecord::decode(&row("x;Fiat;500;PO 1;70;2020;CITY;0")),
            Err(RowError::InvalidNumber { column: "id", .. })
        ));
        assert!(matches!(
            CarRecord::decode(&row("1;Fiat;500;PO 1;-70;2020;CITY;0")),
            Err(RowError::InvalidNumber { column: "horsepower", .. })
        ));
        assert!(matches!(
            ReservationRecord::decode(&row("1;1;1;01.05.2030;2030-05-02;NEW;1;")),
            Err(RowError::InvalidDate { column: "startDate", .. })
        ));
        assert!(matches!(
            ReservationRecord::decode(&row("1;1;1;2030-05-01;2030-05-02;OPEN;1;")),
            Err(RowError::UnknownLiteral { .. })
        ));
        assert!(matches!(
            ReservationRecord::decode(&row("1;1;1;2030-05-04;2030-05-02;NEW;1;")),
            Err(RowError::ReversedRange { .. })
        ));
        assert!(matches!(
            Tariff::decode(&row("1;CITY")),
            Err(RowError::FieldCount { expected: 4, found: 2 })
        ));
    }
}
