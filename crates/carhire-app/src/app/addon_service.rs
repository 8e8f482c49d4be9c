//! Addon catalogue

use rust_decimal::Decimal;
use tracing::info;

use carhire_domain::model::Addon;
use carhire_domain::repository::Repository;
use carhire_domain::service::{next_id, validation};
use carhire_types::{BillingType, CarCategory, Error, Result};

use crate::repository::Repositories;

/// Editable addon fields
#[derive(Debug, Clone, PartialEq)]
pub struct AddonDraft {
    pub name: String,
    pub price: Decimal,
    pub billing: BillingType,
    /// Empty means every category
    pub categories: Vec<CarCategory>,
}

impl AddonDraft {
    fn into_addon(self, id: i64) -> Result<Addon> {
        let name = validation::required_text("name", &self.name)?;
        validation::positive_decimal("price", self.price)?;
        let mut categories: Vec<CarCategory> = Vec::with_capacity(self.categories.len());
        for category in self.categories {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Ok(Addon {
            id,
            name,
            price: self.price,
            billing: self.billing,
            categories,
        })
    }
}

pub struct AddonService<'a> {
    repos: &'a Repositories,
}

impl<'a> AddonService<'a> {
    pub fn new(repos: &'a Repositories) -> Self {
        Self { repos }
    }

    pub fn list(&self) -> Result<Vec<Addon>> {
        self.repos.addons.find_all()
    }

    pub fn find(&self, id: i64) -> Result<Addon> {
        self.repos
            .addons
            .find_by_id(id)?
            .ok_or_else(|| Error::not_found("addon", id))
    }

    pub fn create(&self, draft: AddonDraft) -> Result<Addon> {
        let mut all = self.repos.addons.find_all()?;
        let addon = draft.into_addon(next_id(all.iter().map(|a| a.id))?)?;
        all.push(addon.clone());
        self.repos.addons.save_all(&all)?;
        info!(id = addon.id, name = %addon.name, "addon created");
        Ok(addon)
    }

    pub fn update(&self, id: i64, draft: AddonDraft) -> Result<Addon> {
        let addon = draft.into_addon(id)?;
        let mut all = self.repos.addons.find_all()?;
        let slot = all
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::not_found("addon", id))?;
        *slot = addon.clone();
        self.repos.addons.save_all(&all)?;
        Ok(addon)
    }

    /// Existing reservations keep the id and report it as missing afterwards
    pub fn delete(&self, id: i64) -> Result<()> {
        self.find(id)?;
        self.repos.addons.delete(id)
    }

    pub fn for_category(&self, category: CarCategory) -> Result<Vec<Addon>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|a| a.is_eligible_for(category))
            .collect())
    }

    pub fn for_car(&self, car_id: i64) -> Result<Vec<Addon>> {
        let car = self
            .repos
            .cars
            .find_by_id(car_id)?
            .ok_or_else(|| Error::not_found("car", car_id))?;
        self.for_category(car.category)
    }
}
