//! Input checks shared by the application services

use carhire_types::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Trim a required text field.
///
/// Empty values and values containing the table delimiter or a line break are
/// rejected, since table fields are never quoted.
pub fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{} is required", field)));
    }
    plain_text(field, trimmed)?;
    Ok(trimmed.to_string())
}

/// Reject characters the table format cannot carry
pub fn plain_text(field: &str, value: &str) -> Result<()> {
    if value.contains(';') || value.contains('\n') || value.contains('\r') {
        return Err(Error::validation(format!(
            "{} may not contain ';' or line breaks",
            field
        )));
    }
    Ok(())
}

/// `from <= to`
pub fn date_range(from: NaiveDate, to: NaiveDate) -> Result<()> {
    if from > to {
        return Err(Error::validation(format!(
            "end date {} is before start date {}",
            to, from
        )));
    }
    Ok(())
}

/// Start date not strictly before `today`
pub fn not_in_past(from: NaiveDate, today: NaiveDate) -> Result<()> {
    if from < today {
        return Err(Error::validation(format!(
            "start date {} is in the past",
            from
        )));
    }
    Ok(())
}

/// Largest rate or price accepted from input
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

fn within_max(field: &str, value: Decimal) -> Result<()> {
    if value > MAX_AMOUNT {
        return Err(Error::validation(format!(
            "{} may not exceed {}",
            field, MAX_AMOUNT
        )));
    }
    Ok(())
}

pub fn positive_decimal(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(Error::validation(format!("{} must be greater than 0", field)));
    }
    within_max(field, value)
}

pub fn non_negative_decimal(field: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(Error::validation(format!("{} may not be negative", field)));
    }
    within_max(field, value)
}

/// Minimal email shape: contains `@` and `.`
pub fn email(value: &str) -> Result<String> {
    let email = required_text("email", value)?;
    if !email.contains('@') || !email.contains('.') {
        return Err(Error::validation(format!("invalid email address: {}", email)));
    }
    Ok(email)
}
