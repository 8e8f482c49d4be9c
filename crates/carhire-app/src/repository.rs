//! Repository adapters for persistence layer

use std::path::{Path, PathBuf};

use carhire_domain::repository::Repository;
use carhire_domain::service::{resolve, Resolved, Tables};
use carhire_infra::persistence::{
    FileAddonRepository, FileCarRepository, FileReservationRepository, FileTariffRepository,
    FileUserRepository,
};
use carhire_store::TableStore;
use carhire_types::Result;

use crate::config::Config;

/// One repository per table, all rooted in the same data directory
pub struct Repositories {
    data_dir: PathBuf,
    pub tariffs: FileTariffRepository,
    pub addons: FileAddonRepository,
    pub cars: FileCarRepository,
    pub users: FileUserRepository,
    pub reservations: FileReservationRepository,
}

impl Repositories {
    /// Open the repositories in the configured data directory
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_at(config.data_dir()?)
    }

    /// Open the repositories at a custom directory
    pub fn open_at(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let store = TableStore::open(&data_dir)?;
        tracing::debug!(data_dir = %data_dir.display(), "opened table store");
        Ok(Self {
            data_dir,
            tariffs: FileTariffRepository::new(store.clone()),
            addons: FileAddonRepository::new(store.clone()),
            cars: FileCarRepository::new(store.clone()),
            users: FileUserRepository::new(store.clone()),
            reservations: FileReservationRepository::new(store),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load every table independently
    pub fn load_tables(&self) -> Result<Tables> {
        Ok(Tables {
            tariffs: self.tariffs.find_all()?,
            addons: self.addons.find_all()?,
            cars: self.cars.find_all()?,
            users: self.users.find_all()?,
            reservations: self.reservations.find_all()?,
        })
    }

    /// Load every table and join them
    pub fn resolve(&self) -> Result<Resolved> {
        Ok(resolve(&self.load_tables()?))
    }
}
