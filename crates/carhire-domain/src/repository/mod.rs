//! Repository trait definitions for data persistence
//!
//! Every repository owns one table and persists by full rewrite: `find_all`
//! reads the whole table, `save_all` replaces it. The CRUD helpers are built
//! on top of those two and never write a single row in place.

use std::collections::HashMap;

use carhire_types::{CarCategory, Result};

use crate::model::{Addon, CarRecord, Identified, ReservationRecord, Tariff, User};

/// Whole-table persistence for one entity type
pub trait Repository {
    type Entity: Identified + Clone;

    /// Load every decodable row in file order
    fn find_all(&self) -> Result<Vec<Self::Entity>>;

    /// Replace the table contents
    fn save_all(&self, entities: &[Self::Entity]) -> Result<()>;

    fn find_by_id(&self, id: i64) -> Result<Option<Self::Entity>> {
        Ok(self.find_all()?.into_iter().find(|e| e.id() == id))
    }

    fn insert(&self, entity: Self::Entity) -> Result<()> {
        let mut all = self.find_all()?;
        all.push(entity);
        self.save_all(&all)
    }

    /// Replace the row with the same id. An unknown id rewrites the table
    /// unchanged; check with `find_by_id` first when that matters.
    fn update(&self, entity: Self::Entity) -> Result<()> {
        let mut all = self.find_all()?;
        if let Some(slot) = all.iter_mut().find(|e| e.id() == entity.id()) {
            *slot = entity;
        }
        self.save_all(&all)
    }

    /// Remove rows with the given id; unknown ids rewrite the table unchanged
    fn delete(&self, id: i64) -> Result<()> {
        let mut all = self.find_all()?;
        all.retain(|e| e.id() != id);
        self.save_all(&all)
    }

    fn ids(&self) -> Result<Vec<i64>> {
        Ok(self.find_all()?.iter().map(Identified::id).collect())
    }
}

pub trait TariffRepository: Repository<Entity = Tariff> {
    /// First tariff for the category, if any
    fn find_by_category(&self, category: CarCategory) -> Result<Option<Tariff>>;
}

pub trait AddonRepository: Repository<Entity = Addon> {}

pub trait CarRepository: Repository<Entity = CarRecord> {
    /// car id -> tariff id for cars that reference a tariff.
    ///
    /// Lets the resolver join cars to tariffs without the car repository
    /// decoding the tariff table itself.
    fn tariff_id_by_car_id(&self) -> Result<HashMap<i64, i64>>;

    /// Case-insensitive registration lookup
    fn find_by_registration(&self, registration: &str) -> Result<Option<CarRecord>> {
        Ok(self
            .find_all()?
            .into_iter()
            .find(|c| c.registration_matches(registration)))
    }
}

pub trait UserRepository: Repository<Entity = User> {
    fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        Ok(self.find_all()?.into_iter().find(|u| u.login == login))
    }
}

pub trait ReservationRepository: Repository<Entity = ReservationRecord> {
    fn find_by_car(&self, car_id: i64) -> Result<Vec<ReservationRecord>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|r| r.car_id == car_id)
            .collect())
    }
}
