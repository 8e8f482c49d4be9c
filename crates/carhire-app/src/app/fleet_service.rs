//! Fleet management: cars and their availability

use chrono::NaiveDate;
use tracing::info;

use carhire_domain::model::{Car, CarRecord};
use carhire_domain::repository::{CarRepository, Repository, TariffRepository};
use carhire_domain::service::{is_available, next_id, validation};
use carhire_types::{CarCategory, Error, Result};

use crate::repository::Repositories;

/// Editable car fields; the tariff always follows the category
#[derive(Debug, Clone, PartialEq)]
pub struct CarDraft {
    pub make: String,
    pub model: String,
    pub registration: String,
    pub horsepower: u32,
    pub model_year: i32,
    pub category: CarCategory,
}

impl CarDraft {
    fn validated(&self) -> Result<CarDraft> {
        if self.horsepower == 0 {
            return Err(Error::validation("horsepower must be greater than 0"));
        }
        Ok(CarDraft {
            make: validation::required_text("make", &self.make)?,
            model: validation::required_text("model", &self.model)?,
            registration: validation::required_text("registration", &self.registration)?,
            ..self.clone()
        })
    }
}

pub struct FleetService<'a> {
    repos: &'a Repositories,
}

impl<'a> FleetService<'a> {
    pub fn new(repos: &'a Repositories) -> Self {
        Self { repos }
    }

    /// Every car with tariff and reservations attached
    pub fn list(&self) -> Result<Vec<Car>> {
        Ok(self.repos.resolve()?.cars)
    }

    pub fn find(&self, id: i64) -> Result<Car> {
        self.repos
            .resolve()?
            .cars
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found("car", id))
    }

    pub fn find_by_registration(&self, registration: &str) -> Result<Option<Car>> {
        let Some(record) = self.repos.cars.find_by_registration(registration)? else {
            return Ok(None);
        };
        self.find(record.id).map(Some)
    }

    pub fn add(&self, draft: &CarDraft) -> Result<CarRecord> {
        let draft = draft.validated()?;
        let mut all = self.repos.cars.find_all()?;
        ensure_unique_registration(&all, &draft.registration, None)?;
        let tariff_id = self.tariff_for(draft.category)?;

        let record = into_record(next_id(all.iter().map(|c| c.id))?, draft, tariff_id);
        all.push(record.clone());
        self.repos.cars.save_all(&all)?;
        info!(id = record.id, registration = %record.registration, "car added");
        Ok(record)
    }

    /// Replace a car's fields and re-pick its tariff from the category
    pub fn update(&self, id: i64, draft: &CarDraft) -> Result<CarRecord> {
        let draft = draft.validated()?;
        let mut all = self.repos.cars.find_all()?;
        if !all.iter().any(|c| c.id == id) {
            return Err(Error::not_found("car", id));
        }
        ensure_unique_registration(&all, &draft.registration, Some(id))?;
        let tariff_id = self.tariff_for(draft.category)?;

        let record = into_record(id, draft, tariff_id);
        if let Some(slot) = all.iter_mut().find(|c| c.id == id) {
            *slot = record.clone();
        }
        self.repos.cars.save_all(&all)?;
        Ok(record)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        if self.repos.cars.find_by_id(id)?.is_none() {
            return Err(Error::not_found("car", id));
        }
        self.repos.cars.delete(id)?;
        info!(id, "car deleted");
        Ok(())
    }

    /// Cars free over `[from, to]`, optionally limited to one category
    pub fn available(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        category: Option<CarCategory>,
    ) -> Result<Vec<Car>> {
        validation::date_range(from, to)?;
        Ok(self
            .list()?
            .into_iter()
            .filter(|car| category.map_or(true, |c| car.category == c))
            .filter(|car| is_available(car, from, to))
            .collect())
    }

    fn tariff_for(&self, category: CarCategory) -> Result<i64> {
        self.repos
            .tariffs
            .find_by_category(category)?
            .map(|t| t.id)
            .ok_or(Error::MissingCategoryTariff(category))
    }
}

fn ensure_unique_registration(
    cars: &[CarRecord],
    registration: &str,
    except_id: Option<i64>,
) -> Result<()> {
    let taken = cars
        .iter()
        .filter(|c| Some(c.id) != except_id)
        .any(|c| c.registration_matches(registration));
    if taken {
        return Err(Error::validation(format!(
            "registration {} is already in use",
            registration
        )));
    }
    Ok(())
}

fn into_record(id: i64, draft: CarDraft, tariff_id: i64) -> CarRecord {
    CarRecord {
        id,
        make: draft.make,
        model: draft.model,
        registration: draft.registration,
        horsepower: draft.horsepower,
        model_year: draft.model_year,
        category: draft.category,
        tariff_id: Some(tariff_id),
    }
}
