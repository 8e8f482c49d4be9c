//! Output formatting module

use serde::Serialize;

use carhire_domain::model::{Addon, Car, Reservation, Tariff, User};
use carhire_domain::service::{IntegrityWarning, PriceBreakdown};
use carhire_types::{OutputFormat, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

/// Cut `s` to `width` characters for a table cell
fn cell(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let cut: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

pub fn output_tariffs(format: OutputFormat, tariffs: &[Tariff]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(tariffs);
    }

    if tariffs.is_empty() {
        println!("No tariffs defined.");
        return Ok(());
    }

    println!("{:>4} {:<8} {:>12} {:>14}", "ID", "Category", "Daily rate", "Extra driver %");
    println!("{}", "-".repeat(41));
    for t in tariffs {
        println!(
            "{:>4} {:<8} {:>12} {:>14}",
            t.id,
            t.category.as_str(),
            t.daily_rate.to_string(),
            t.extra_driver_percent.to_string()
        );
    }
    Ok(())
}

pub fn output_addons(format: OutputFormat, addons: &[Addon]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(addons);
    }

    if addons.is_empty() {
        println!("No addons found.");
        return Ok(());
    }

    println!(
        "{:>4} {:<24} {:>10} {:<16} {}",
        "ID", "Name", "Price", "Billing", "Categories"
    );
    println!("{}", "-".repeat(72));
    for a in addons {
        let categories = if a.categories.is_empty() {
            "(all)".to_string()
        } else {
            a.categories
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(",")
        };
        println!(
            "{:>4} {:<24} {:>10} {:<16} {}",
            a.id,
            cell(&a.name, 24),
            a.price.to_string(),
            a.billing.as_str(),
            categories
        );
    }
    Ok(())
}

pub fn output_cars(format: OutputFormat, cars: &[Car]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(cars);
    }

    if cars.is_empty() {
        println!("No cars found.");
        return Ok(());
    }

    println!(
        "{:>4} {:<28} {:<12} {:>5} {:>5} {:<8} {:>10} {:>6}",
        "ID", "Car", "Registration", "HP", "Year", "Category", "Daily rate", "Bookings"
    );
    println!("{}", "-".repeat(88));
    for car in cars {
        let rate = car
            .tariff
            .as_ref()
            .map(|t| t.daily_rate.to_string())
            .unwrap_or_else(|| "-".to_string());
        let active = car
            .reservations
            .iter()
            .filter(|r| r.status.blocks_car())
            .count();
        println!(
            "{:>4} {:<28} {:<12} {:>5} {:>5} {:<8} {:>10} {:>6}",
            car.id,
            cell(&format!("{} {}", car.make, car.model), 28),
            cell(&car.registration, 12),
            car.horsepower,
            car.model_year,
            car.category.as_str(),
            rate,
            active
        );
    }
    Ok(())
}

pub fn output_car(format: OutputFormat, car: &Car) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(car);
    }

    println!("\n{}", car.display_name());
    println!("{}", "=".repeat(car.display_name().chars().count()));
    println!("ID:           {}", car.id);
    println!("Horsepower:   {}", car.horsepower);
    println!("Model year:   {}", car.model_year);
    println!("Category:     {}", car.category);
    match &car.tariff {
        Some(t) => println!("Tariff:       #{} ({} per day)", t.id, t.daily_rate),
        None => println!("Tariff:       (none)"),
    }
    println!();
    output_reservations(OutputFormat::Table, &car.reservations)
}

pub fn output_users(format: OutputFormat, users: &[User]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(users);
    }

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!(
        "{:>4} {:<9} {:<16} {:<28} {}",
        "ID", "Type", "Login", "Name", "Email"
    );
    println!("{}", "-".repeat(80));
    for u in users {
        println!(
            "{:>4} {:<9} {:<16} {:<28} {}",
            u.id,
            u.kind().as_str(),
            cell(&u.login, 16),
            cell(&u.full_name(), 28),
            u.email().unwrap_or("-")
        );
    }
    Ok(())
}

pub fn output_user(format: OutputFormat, user: &User) -> Result<()> {
    output_users(format, std::slice::from_ref(user))
}

pub fn output_reservations(format: OutputFormat, reservations: &[Reservation]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(reservations);
    }

    if reservations.is_empty() {
        println!("No reservations found.");
        return Ok(());
    }

    println!(
        "{:>4} {:<16} {:>5} {:<10} {:<10} {:<11} {:>10} {}",
        "ID", "Customer", "Car", "From", "To", "Status", "Total", "Addons"
    );
    println!("{}", "-".repeat(84));
    for r in reservations {
        let addons = r
            .addons
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:>4} {:<16} {:>5} {:<10} {:<10} {:<11} {:>10} {}",
            r.id,
            cell(&r.customer.login, 16),
            r.car_id,
            r.start.to_string(),
            r.end.to_string(),
            r.status.as_str(),
            r.total_price.to_string(),
            if addons.is_empty() { "-".to_string() } else { addons }
        );
    }
    Ok(())
}

pub fn output_reservation(format: OutputFormat, reservation: &Reservation) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(reservation);
    }
    output_reservations(format, std::slice::from_ref(reservation))
}

pub fn output_quote(format: OutputFormat, quote: &PriceBreakdown) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(quote);
    }

    println!("\nPrice Quote");
    println!("===========");
    println!("Days:        {}", quote.days);
    println!("Daily rate:  {}", quote.daily_rate);
    println!("Base:        {}", quote.base);
    println!("Addons:      {}", quote.addons);
    println!("-------------------------");
    println!("Total:       {}", quote.total);
    Ok(())
}

pub fn output_warnings(format: OutputFormat, warnings: &[IntegrityWarning]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(warnings);
    }

    if warnings.is_empty() {
        println!("All references resolve.");
        return Ok(());
    }

    println!("Integrity warnings: {}", warnings.len());
    for w in warnings {
        println!("  - {}", w);
    }
    Ok(())
}
