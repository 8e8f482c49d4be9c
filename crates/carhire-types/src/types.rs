use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RowError;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Declares an enum stored on disk as an upper-case literal.
macro_rules! table_literal_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $literal:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Literal used in the table files
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $literal),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = RowError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($literal => Ok($name::$variant),)+
                    _ => Err(RowError::UnknownLiteral {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

table_literal_enum! {
    /// Car category; tariffs and addon eligibility are keyed by it
    CarCategory, "category" {
        City => "CITY",
        Suv => "SUV",
        Sport => "SPORT",
        Luxury => "LUXURY",
    }
}

table_literal_enum! {
    /// How an addon's price combines with the rental duration
    BillingType, "billing type" {
        /// price x rental days
        PerDay => "PER_DAY",
        /// flat fee
        OneTime => "ONE_TIME",
        /// base price x stored price, taken as a raw fraction (0.10 = 10%)
        PercentOfBase => "PERCENT_OF_BASE",
    }
}

table_literal_enum! {
    ReservationStatus, "reservation status" {
        New => "NEW",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

table_literal_enum! {
    /// User type column of the users table
    UserKind, "user type" {
        Customer => "CUSTOMER",
        Employee => "EMPLOYEE",
    }
}

impl ReservationStatus {
    /// Whether a reservation in this status may move to `next`.
    ///
    /// NEW -> IN_PROGRESS | CANCELLED, IN_PROGRESS -> COMPLETED. Staying put is
    /// allowed while the reservation is still open; COMPLETED and CANCELLED
    /// are terminal.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (New, New)
                | (New, InProgress)
                | (New, Cancelled)
                | (InProgress, InProgress)
                | (InProgress, Completed)
        )
    }

    /// Cancelled reservations never block a car
    pub fn blocks_car(self) -> bool {
        self != ReservationStatus::Cancelled
    }
}
