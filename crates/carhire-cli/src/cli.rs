//! CLI definition using clap

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use carhire_types::{BillingType, CarCategory, OutputFormat, ReservationStatus};

#[derive(Parser)]
#[command(name = "carhire")]
#[command(version)]
#[command(about = "Car rental records: fleet, tariffs, addons, accounts and bookings")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the table files. Uses config value if not specified.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage per-category tariffs
    Tariff {
        #[command(subcommand)]
        action: TariffCommand,
    },

    /// Manage the addon catalogue
    Addon {
        #[command(subcommand)]
        action: AddonCommand,
    },

    /// Manage the fleet
    Car {
        #[command(subcommand)]
        action: CarCommand,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Book, quote and manage reservations
    Reservation {
        #[command(subcommand)]
        action: ReservationCommand,
    },

    /// Report references between tables that do not resolve
    Check,

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set the table directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set the shortest accepted password
        #[arg(long)]
        set_min_password_length: Option<usize>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum TariffCommand {
    /// List all tariffs
    List,

    /// Add the tariff of a category
    Add {
        category: CarCategory,

        /// Price of one rental day
        #[arg(long)]
        rate: Decimal,

        /// Extra driver surcharge in percent
        #[arg(long, default_value = "0")]
        extra_driver_percent: Decimal,
    },

    /// Change an existing tariff
    Update {
        id: i64,

        #[arg(long)]
        category: Option<CarCategory>,

        #[arg(long)]
        rate: Option<Decimal>,

        #[arg(long)]
        extra_driver_percent: Option<Decimal>,
    },

    /// Delete a tariff no car uses
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum AddonCommand {
    /// List addons, optionally only those bookable with a category or car
    List {
        #[arg(long, conflicts_with = "car")]
        category: Option<CarCategory>,

        #[arg(long)]
        car: Option<i64>,
    },

    /// Add an addon
    Add {
        name: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        billing: BillingType,

        /// Eligible categories, comma separated; none means all
        #[arg(long, value_delimiter = ',')]
        categories: Vec<CarCategory>,
    },

    /// Change an addon; omitted fields keep their value
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<Decimal>,

        #[arg(long)]
        billing: Option<BillingType>,

        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<CarCategory>>,

        /// Make the addon eligible for every category
        #[arg(long, conflicts_with = "categories")]
        all_categories: bool,
    },

    /// Delete an addon
    Delete { id: i64 },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct CarFields {
    #[arg(long)]
    pub make: String,

    #[arg(long)]
    pub model: String,

    #[arg(long)]
    pub registration: String,

    #[arg(long)]
    pub horsepower: u32,

    #[arg(long)]
    pub year: i32,

    #[arg(long)]
    pub category: CarCategory,
}

#[derive(Subcommand)]
pub enum CarCommand {
    /// List the fleet
    List,

    /// Show one car with its reservations
    Show { id: i64 },

    /// Look a car up by registration (case-insensitive)
    Find { registration: String },

    /// Add a car; its tariff is taken from the category
    Add {
        #[command(flatten)]
        fields: CarFields,
    },

    /// Replace a car's fields
    Update {
        id: i64,

        #[command(flatten)]
        fields: CarFields,
    },

    /// Delete a car
    Delete { id: i64 },

    /// Cars free over a date range
    Available {
        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,

        #[arg(long)]
        category: Option<CarCategory>,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// List accounts
    List,

    /// Register a customer
    Register {
        login: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,
    },

    /// Create an employee account
    AddEmployee {
        login: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,
    },

    /// Check credentials
    Login {
        login: String,

        #[arg(long)]
        password: String,
    },

    /// Set a new password
    ResetPassword {
        login: String,

        #[arg(long)]
        new_password: String,
    },
}

/// Acting user for booking commands
#[derive(Args, Debug, Clone, PartialEq)]
pub struct Credentials {
    #[arg(long, short = 'u')]
    pub login: String,

    #[arg(long, short = 'p')]
    pub password: String,
}

#[derive(Subcommand)]
pub enum ReservationCommand {
    /// Own reservations, or all of them for employees
    List {
        #[command(flatten)]
        auth: Credentials,
    },

    /// Show one reservation
    Show {
        id: i64,

        #[command(flatten)]
        auth: Credentials,
    },

    /// Price a rental without booking it
    Quote {
        #[arg(long)]
        car: i64,

        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,

        /// Addon ids, comma separated; repeat an id to book it twice
        #[arg(long, value_delimiter = ',')]
        addons: Vec<i64>,
    },

    /// Check whether a car is free
    Available {
        #[arg(long)]
        car: i64,

        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },

    /// Book a car
    Create {
        #[command(flatten)]
        auth: Credentials,

        #[arg(long)]
        car: i64,

        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,

        #[arg(long, value_delimiter = ',')]
        addons: Vec<i64>,
    },

    /// Change dates, addons or status; the price is recomputed
    Update {
        id: i64,

        #[command(flatten)]
        auth: Credentials,

        #[arg(long)]
        from: Option<NaiveDate>,

        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(long, value_delimiter = ',')]
        addons: Option<Vec<i64>>,

        /// Drop every addon
        #[arg(long, conflicts_with = "addons")]
        no_addons: bool,

        #[arg(long)]
        status: Option<ReservationStatus>,
    },

    /// Cancel a NEW reservation
    Cancel {
        id: i64,

        #[command(flatten)]
        auth: Credentials,
    },

    /// Delete a reservation row
    Delete {
        id: i64,

        #[command(flatten)]
        auth: Credentials,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_create_reservation_args() {
        let cli = Cli::try_parse_from([
            "carhire",
            "--format",
            "json",
            "reservation",
            "create",
            "-u",
            "anna",
            "-p",
            "secret",
            "--car",
            "3",
            "--from",
            "2030-05-01",
            "--to",
            "2030-05-03",
            "--addons",
            "1,1,2",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Reservation {
                action:
                    ReservationCommand::Create {
                        auth,
                        car,
                        from,
                        to,
                        addons,
                    },
            } => {
                assert_eq!(auth.login, "anna");
                assert_eq!(car, 3);
                assert_eq!(from, NaiveDate::from_ymd_opt(2030, 5, 1).unwrap());
                assert_eq!(to, NaiveDate::from_ymd_opt(2030, 5, 3).unwrap());
                assert_eq!(addons, vec![1, 1, 2]);
            }
            _ => panic!("expected reservation create"),
        }
    }

    #[test]
    fn test_addon_categories_and_decimal_price() {
        let cli = Cli::try_parse_from([
            "carhire",
            "addon",
            "add",
            "Roof box",
            "--price",
            "19.99",
            "--billing",
            "one-time",
            "--categories",
            "suv,luxury",
        ])
        .unwrap();

        match cli.command {
            Commands::Addon {
                action:
                    AddonCommand::Add {
                        name,
                        price,
                        billing,
                        categories,
                    },
            } => {
                assert_eq!(name, "Roof box");
                assert_eq!(price, Decimal::new(1999, 2));
                assert_eq!(billing, BillingType::OneTime);
                assert_eq!(categories, vec![CarCategory::Suv, CarCategory::Luxury]);
            }
            _ => panic!("expected addon add"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["carhire", "check", "--data-dir", "/tmp/tables", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/tables")));
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let result = Cli::try_parse_from([
            "carhire", "car", "available", "--from", "01.05.2030", "--to", "2030-05-02",
        ]);
        assert!(result.is_err());
    }
}
