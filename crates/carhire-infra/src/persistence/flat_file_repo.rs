//! File-based implementation of the repository traits
//!
//! One generic repository per table; the row format comes from the entity's
//! [`RowCodec`].

use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::Path;

use tracing::{debug, warn};

use carhire_domain::model::{Addon, CarRecord, Identified, ReservationRecord, Tariff, User};
use carhire_domain::repository::{
    AddonRepository, CarRepository, Repository, ReservationRepository, TariffRepository,
    UserRepository,
};
use carhire_store::TableStore;
use carhire_types::{CarCategory, Result};

use crate::codec::RowCodec;

/// Table-backed repository for entity `T`
///
/// Holds no cached rows: every call reads the file again.
pub struct FlatFileRepository<T> {
    store: TableStore,
    _entity: PhantomData<fn() -> T>,
}

pub type FileTariffRepository = FlatFileRepository<Tariff>;
pub type FileAddonRepository = FlatFileRepository<Addon>;
pub type FileCarRepository = FlatFileRepository<CarRecord>;
pub type FileUserRepository = FlatFileRepository<User>;
pub type FileReservationRepository = FlatFileRepository<ReservationRecord>;

impl<T: RowCodec> FlatFileRepository<T> {
    pub fn new(store: TableStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Open the table inside `data_dir`, creating the directory if needed
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(TableStore::open(data_dir.as_ref())?))
    }

    pub fn table_path(&self) -> std::path::PathBuf {
        self.store.path_of(&T::TABLE)
    }
}

impl<T> Repository for FlatFileRepository<T>
where
    T: RowCodec + Identified + Clone,
{
    type Entity = T;

    fn find_all(&self) -> Result<Vec<T>> {
        let table = T::TABLE;
        let rows = self.store.load_numbered_rows(&table)?;
        let mut entities = Vec::with_capacity(rows.len());
        for (line, row) in rows {
            match T::decode(&row) {
                Ok(entity) => entities.push(entity),
                Err(e) => warn!(table = table.name, line, error = %e, "skipping malformed row"),
            }
        }
        Ok(entities)
    }

    fn save_all(&self, entities: &[T]) -> Result<()> {
        let rows: Vec<_> = entities.iter().map(RowCodec::encode).collect();
        self.store.save_rows(&T::TABLE, &rows)
    }
}

impl TariffRepository for FlatFileRepository<Tariff> {
    fn find_by_category(&self, category: CarCategory) -> Result<Option<Tariff>> {
        let mut matching = self
            .find_all()?
            .into_iter()
            .filter(|t| t.category == category);
        let first = matching.next();
        let extra = matching.count();
        if extra > 0 {
            warn!(%category, duplicates = extra, "more than one tariff for category, using the first");
        }
        Ok(first)
    }
}

impl AddonRepository for FlatFileRepository<Addon> {}

impl CarRepository for FlatFileRepository<CarRecord> {
    fn tariff_id_by_car_id(&self) -> Result<HashMap<i64, i64>> {
        let map: HashMap<i64, i64> = self
            .find_all()?
            .into_iter()
            .filter_map(|car| car.tariff_id.map(|tariff_id| (car.id, tariff_id)))
            .collect();
        debug!(cars = map.len(), "collected car tariff ids");
        Ok(map)
    }
}

impl UserRepository for FlatFileRepository<User> {}

impl ReservationRepository for FlatFileRepository<ReservationRecord> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::str::FromStr;

    use carhire_domain::model::Role;
    use carhire_types::BillingType;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    fn tariff(id: i64, category: CarCategory, rate: &str) -> Tariff {
        Tariff {
            id,
            category,
            daily_rate: Decimal::from_str(rate).unwrap(),
            extra_driver_percent: Decimal::from(15),
        }
    }

    #[test]
    fn test_missing_file_is_empty_table() {
        let dir = tempdir().unwrap();
        let repo = FileTariffRepository::open(dir.path()).unwrap();
        assert!(repo.find_all().unwrap().is_empty());
        assert!(repo.find_by_id(1).unwrap().is_none());
    }

    #[test]
    fn test_round_trip_keeps_order() {
        let dir = tempdir().unwrap();
        let repo = FileTariffRepository::open(dir.path()).unwrap();
        let tariffs = vec![
            tariff(2, CarCategory::Suv, "180.00"),
            tariff(1, CarCategory::City, "99.90"),
        ];
        repo.save_all(&tariffs).unwrap();
        assert_eq!(repo.find_all().unwrap(), tariffs);

        let content = fs::read_to_string(repo.table_path()).unwrap();
        assert!(content.starts_with("id;category;dailyRate;extraDriverPercent\n"));
    }

    #[test]
    fn test_short_row_is_skipped_and_load_continues() {
        let dir = tempdir().unwrap();
        let repo = FileCarRepository::open(dir.path()).unwrap();
        fs::write(
            repo.table_path(),
            "id;make;model;registration;horsepower;modelYear;category;tariffId\n\
             1;Fiat;500;PO 1;70;2020;CITY;1\n\
             2;Opel;Astra\n\
             3;Kia;Sportage;PO 3;150;2021;SUV;0\n",
        )
        .unwrap();

        let ids = repo.ids().unwrap();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_update_unknown_id_leaves_rows() {
        let dir = tempdir().unwrap();
        let repo = FileTariffRepository::open(dir.path()).unwrap();
        repo.insert(tariff(1, CarCategory::City, "100")).unwrap();

        repo.update(tariff(5, CarCategory::Sport, "300")).unwrap();
        repo.delete(9).unwrap();

        assert_eq!(repo.find_all().unwrap(), vec![tariff(1, CarCategory::City, "100")]);
    }

    #[test]
    fn test_find_by_category_takes_first() {
        let dir = tempdir().unwrap();
        let repo = FileTariffRepository::open(dir.path()).unwrap();
        repo.save_all(&[
            tariff(1, CarCategory::City, "100"),
            tariff(2, CarCategory::City, "120"),
        ])
        .unwrap();

        assert_eq!(repo.find_by_category(CarCategory::City).unwrap().unwrap().id, 1);
        assert!(repo.find_by_category(CarCategory::Luxury).unwrap().is_none());
    }

    #[test]
    fn test_tariff_ids_by_car() {
        let dir = tempdir().unwrap();
        let repo = FileCarRepository::open(dir.path()).unwrap();
        let car = |id, tariff_id| CarRecord {
            id,
            make: "Skoda".into(),
            model: "Fabia".into(),
            registration: format!("WA {}", id),
            horsepower: 95,
            model_year: 2019,
            category: CarCategory::City,
            tariff_id,
        };
        repo.save_all(&[car(1, Some(3)), car(2, None)]).unwrap();

        let map = repo.tariff_id_by_car_id().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&3));
        assert_eq!(
            repo.find_by_registration(" wa 2").unwrap().map(|c| c.id),
            Some(2)
        );
    }

    #[test]
    fn test_users_and_reservations_tables() {
        let dir = tempdir().unwrap();
        let users = FileUserRepository::open(dir.path()).unwrap();
        users
            .save_all(&[User {
                id: 1,
                login: "ola".into(),
                password: "tajne".into(),
                first_name: "Ola".into(),
                last_name: "Kot".into(),
                role: Role::Customer {
                    email: "ola@example.com".into(),
                },
            }])
            .unwrap();
        assert_eq!(users.find_by_login("ola").unwrap().unwrap().id, 1);
        assert!(users.find_by_login("OLA").unwrap().is_none());

        let reservations = FileReservationRepository::open(dir.path()).unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2030, 2, d).unwrap();
        let record = ReservationRecord {
            id: 1,
            customer_id: 1,
            car_id: 4,
            start: day(1),
            end: day(2),
            status: carhire_types::ReservationStatus::New,
            total_price: Decimal::new(12000, 2),
            addon_ids: vec![2, 2],
        };
        reservations.insert(record.clone()).unwrap();
        assert_eq!(reservations.find_by_car(4).unwrap(), vec![record]);
        assert!(reservations.find_by_car(5).unwrap().is_empty());

        let addons = FileAddonRepository::open(dir.path()).unwrap();
        addons
            .insert(Addon {
                id: 2,
                name: "Child seat".into(),
                price: Decimal::new(900, 2),
                billing: BillingType::PerDay,
                categories: vec![],
            })
            .unwrap();
        assert_eq!(addons.ids().unwrap(), vec![2]);
    }
}
