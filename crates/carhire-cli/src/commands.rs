//! Command handlers

use std::path::PathBuf;

use carhire_app::{
    AccountService, AddonDraft, AddonService, BookingEngine, CarDraft, Config, FleetService,
    Registration, Repositories, ReservationChange, TariffService,
};
use carhire_types::{OutputFormat, Result};

use crate::cli::{
    AddonCommand, CarCommand, CarFields, Cli, Commands, Credentials, ReservationCommand,
    TariffCommand, UserCommand,
};
use crate::output::{
    output_addons, output_car, output_cars, output_quote, output_reservation,
    output_reservations, output_tariffs, output_user, output_users, output_warnings,
};

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Config {
            show,
            set_data_dir,
            set_output,
            set_min_password_length,
            reset,
        } => cmd_config(show, set_data_dir, set_output, set_min_password_length, reset),

        Commands::Check => {
            let repos = Repositories::open(&config)?;
            let resolved = repos.resolve()?;
            output_warnings(format, &resolved.warnings)
        }

        Commands::Tariff { action } => cmd_tariff(&Repositories::open(&config)?, format, action),
        Commands::Addon { action } => cmd_addon(&Repositories::open(&config)?, format, action),
        Commands::Car { action } => cmd_car(&Repositories::open(&config)?, format, action),
        Commands::User { action } => {
            let repos = Repositories::open(&config)?;
            cmd_user(&AccountService::new(&repos, config.min_password_length), format, action)
        }
        Commands::Reservation { action } => {
            let repos = Repositories::open(&config)?;
            cmd_reservation(&repos, &config, format, action)
        }
    }
}

fn cmd_config(
    show: bool,
    set_data_dir: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    set_min_password_length: Option<usize>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dir) = set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(length) = set_min_password_length {
        config.min_password_length = length;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration saved");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

fn cmd_tariff(repos: &Repositories, format: OutputFormat, action: TariffCommand) -> Result<()> {
    let tariffs = TariffService::new(repos);

    match action {
        TariffCommand::List => output_tariffs(format, &tariffs.list()?),

        TariffCommand::Add {
            category,
            rate,
            extra_driver_percent,
        } => {
            let tariff = tariffs.create(category, rate, extra_driver_percent)?;
            output_tariffs(format, &[tariff])
        }

        TariffCommand::Update {
            id,
            category,
            rate,
            extra_driver_percent,
        } => {
            let mut tariff = tariffs.find(id)?;
            if let Some(category) = category {
                tariff.category = category;
            }
            if let Some(rate) = rate {
                tariff.daily_rate = rate;
            }
            if let Some(percent) = extra_driver_percent {
                tariff.extra_driver_percent = percent;
            }
            let tariff = tariffs.update(tariff)?;
            output_tariffs(format, &[tariff])
        }

        TariffCommand::Delete { id } => {
            tariffs.delete(id)?;
            println!("Tariff {} deleted", id);
            Ok(())
        }
    }
}

fn cmd_addon(repos: &Repositories, format: OutputFormat, action: AddonCommand) -> Result<()> {
    let addons = AddonService::new(repos);

    match action {
        AddonCommand::List { category, car } => {
            let list = match (category, car) {
                (_, Some(car_id)) => addons.for_car(car_id)?,
                (Some(category), None) => addons.for_category(category)?,
                (None, None) => addons.list()?,
            };
            output_addons(format, &list)
        }

        AddonCommand::Add {
            name,
            price,
            billing,
            categories,
        } => {
            let addon = addons.create(AddonDraft {
                name,
                price,
                billing,
                categories,
            })?;
            output_addons(format, &[addon])
        }

        AddonCommand::Update {
            id,
            name,
            price,
            billing,
            categories,
            all_categories,
        } => {
            let current = addons.find(id)?;
            let categories = if all_categories {
                Vec::new()
            } else {
                categories.unwrap_or(current.categories)
            };
            let addon = addons.update(
                id,
                AddonDraft {
                    name: name.unwrap_or(current.name),
                    price: price.unwrap_or(current.price),
                    billing: billing.unwrap_or(current.billing),
                    categories,
                },
            )?;
            output_addons(format, &[addon])
        }

        AddonCommand::Delete { id } => {
            addons.delete(id)?;
            println!("Addon {} deleted", id);
            Ok(())
        }
    }
}

fn car_draft(fields: CarFields) -> CarDraft {
    CarDraft {
        make: fields.make,
        model: fields.model,
        registration: fields.registration,
        horsepower: fields.horsepower,
        model_year: fields.year,
        category: fields.category,
    }
}

fn cmd_car(repos: &Repositories, format: OutputFormat, action: CarCommand) -> Result<()> {
    let fleet = FleetService::new(repos);

    match action {
        CarCommand::List => output_cars(format, &fleet.list()?),

        CarCommand::Show { id } => output_car(format, &fleet.find(id)?),

        CarCommand::Find { registration } => match fleet.find_by_registration(&registration)? {
            Some(car) => output_car(format, &car),
            None => {
                println!("No car registered as {}", registration.trim());
                Ok(())
            }
        },

        CarCommand::Add { fields } => {
            let record = fleet.add(&car_draft(fields))?;
            output_car(format, &fleet.find(record.id)?)
        }

        CarCommand::Update { id, fields } => {
            fleet.update(id, &car_draft(fields))?;
            output_car(format, &fleet.find(id)?)
        }

        CarCommand::Delete { id } => {
            fleet.delete(id)?;
            println!("Car {} deleted", id);
            Ok(())
        }

        CarCommand::Available { from, to, category } => {
            output_cars(format, &fleet.available(from, to, category)?)
        }
    }
}

fn cmd_user(accounts: &AccountService<'_>, format: OutputFormat, action: UserCommand) -> Result<()> {
    match action {
        UserCommand::List => output_users(format, &accounts.list()?),

        UserCommand::Register {
            login,
            password,
            first_name,
            last_name,
            email,
        } => {
            let user = accounts.register_customer(&Registration {
                login,
                password,
                first_name,
                last_name,
                email,
            })?;
            output_user(format, &user)
        }

        UserCommand::AddEmployee {
            login,
            password,
            first_name,
            last_name,
        } => {
            let user = accounts.add_employee(&login, &password, &first_name, &last_name)?;
            output_user(format, &user)
        }

        UserCommand::Login { login, password } => {
            let user = accounts.login(&login, &password)?;
            output_user(format, &user)
        }

        UserCommand::ResetPassword {
            login,
            new_password,
        } => {
            accounts.reset_password(&login, &new_password)?;
            println!("Password for {} changed", login.trim());
            Ok(())
        }
    }
}

fn cmd_reservation(
    repos: &Repositories,
    config: &Config,
    format: OutputFormat,
    action: ReservationCommand,
) -> Result<()> {
    let accounts = AccountService::new(repos, config.min_password_length);
    let engine = BookingEngine::new(repos);
    let sign_in = |auth: &Credentials| accounts.login(&auth.login, &auth.password);

    match action {
        ReservationCommand::List { auth } => {
            let user = sign_in(&auth)?;
            output_reservations(format, &engine.reservations_for(&user)?)
        }

        ReservationCommand::Show { id, auth } => {
            let user = sign_in(&auth)?;
            output_reservation(format, &engine.find(&user, id)?)
        }

        ReservationCommand::Quote {
            car,
            from,
            to,
            addons,
        } => output_quote(format, &engine.quote(car, from, to, &addons)?),

        ReservationCommand::Available { car, from, to } => {
            let available = engine.is_available(car, from, to)?;
            if format == OutputFormat::Json {
                println!(
                    "{}",
                    serde_json::json!({ "car_id": car, "from": from, "to": to, "available": available })
                );
            } else if available {
                println!("Car {} is available from {} to {}", car, from, to);
            } else {
                println!("Car {} is NOT available from {} to {}", car, from, to);
            }
            Ok(())
        }

        ReservationCommand::Create {
            auth,
            car,
            from,
            to,
            addons,
        } => {
            let user = sign_in(&auth)?;
            let reservation = engine.create(&user, car, from, to, &addons)?;
            output_reservation(format, &reservation)
        }

        ReservationCommand::Update {
            id,
            auth,
            from,
            to,
            addons,
            no_addons,
            status,
        } => {
            let user = sign_in(&auth)?;
            let current = engine.find(&user, id)?;
            let mut change = ReservationChange::from_reservation(&current);
            if let Some(from) = from {
                change.start = from;
            }
            if let Some(to) = to {
                change.end = to;
            }
            if no_addons {
                change.addon_ids.clear();
            } else if let Some(addons) = addons {
                change.addon_ids = addons;
            }
            if let Some(status) = status {
                change.status = status;
            }
            output_reservation(format, &engine.update(&user, id, change)?)
        }

        ReservationCommand::Cancel { id, auth } => {
            let user = sign_in(&auth)?;
            output_reservation(format, &engine.cancel(&user, id)?)
        }

        ReservationCommand::Delete { id, auth } => {
            let user = sign_in(&auth)?;
            engine.delete(&user, id)?;
            println!("Reservation {} deleted", id);
            Ok(())
        }
    }
}
