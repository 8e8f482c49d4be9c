//! Tariff management

use rust_decimal::Decimal;
use tracing::info;

use carhire_domain::model::Tariff;
use carhire_domain::repository::{CarRepository, Repository, TariffRepository};
use carhire_domain::service::{next_id, validation};
use carhire_types::{CarCategory, Error, Result};

use crate::repository::Repositories;

pub struct TariffService<'a> {
    repos: &'a Repositories,
}

impl<'a> TariffService<'a> {
    pub fn new(repos: &'a Repositories) -> Self {
        Self { repos }
    }

    pub fn list(&self) -> Result<Vec<Tariff>> {
        self.repos.tariffs.find_all()
    }

    pub fn find(&self, id: i64) -> Result<Tariff> {
        self.repos
            .tariffs
            .find_by_id(id)?
            .ok_or_else(|| Error::not_found("tariff", id))
    }

    pub fn find_by_category(&self, category: CarCategory) -> Result<Option<Tariff>> {
        self.repos.tariffs.find_by_category(category)
    }

    /// Add the tariff for a category that has none yet
    pub fn create(
        &self,
        category: CarCategory,
        daily_rate: Decimal,
        extra_driver_percent: Decimal,
    ) -> Result<Tariff> {
        validate_amounts(daily_rate, extra_driver_percent)?;

        let mut all = self.repos.tariffs.find_all()?;
        if all.iter().any(|t| t.category == category) {
            return Err(Error::validation(format!(
                "a tariff for category {} already exists",
                category
            )));
        }

        let tariff = Tariff {
            id: next_id(all.iter().map(|t| t.id))?,
            category,
            daily_rate,
            extra_driver_percent,
        };
        all.push(tariff.clone());
        self.repos.tariffs.save_all(&all)?;
        info!(id = tariff.id, %category, "tariff created");
        Ok(tariff)
    }

    /// Replace rates and category of an existing tariff
    pub fn update(&self, tariff: Tariff) -> Result<Tariff> {
        validate_amounts(tariff.daily_rate, tariff.extra_driver_percent)?;

        let mut all = self.repos.tariffs.find_all()?;
        if all
            .iter()
            .any(|t| t.id != tariff.id && t.category == tariff.category)
        {
            return Err(Error::validation(format!(
                "a tariff for category {} already exists",
                tariff.category
            )));
        }

        let slot = all
            .iter_mut()
            .find(|t| t.id == tariff.id)
            .ok_or_else(|| Error::not_found("tariff", tariff.id))?;
        *slot = tariff.clone();
        self.repos.tariffs.save_all(&all)?;
        Ok(tariff)
    }

    /// Delete a tariff no car refers to
    pub fn delete(&self, id: i64) -> Result<()> {
        self.find(id)?;

        let in_use = self
            .repos
            .cars
            .tariff_id_by_car_id()?
            .values()
            .filter(|tariff_id| **tariff_id == id)
            .count();
        if in_use > 0 {
            return Err(Error::InvalidState(format!(
                "tariff {} is assigned to {} car(s)",
                id, in_use
            )));
        }

        self.repos.tariffs.delete(id)
    }
}

fn validate_amounts(daily_rate: Decimal, extra_driver_percent: Decimal) -> Result<()> {
    validation::non_negative_decimal("daily rate", daily_rate)?;
    validation::non_negative_decimal("extra driver percent", extra_driver_percent)
}
