//! Booking engine
//!
//! Every operation reloads the tables, resolves them, checks the request
//! against that snapshot and then persists through the raw reservation rows.
//! Rows the resolver dropped are never lost by a rewrite.

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use carhire_domain::model::{Addon, Car, Reservation, User};
use carhire_domain::repository::Repository;
use carhire_domain::service::{
    availability, breakdown, conflicting, next_id, strip_reservations, validation,
    PriceBreakdown, Resolved,
};
use carhire_types::{Error, ReservationStatus, Result};

use crate::repository::Repositories;

/// New values for an existing reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationChange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub addon_ids: Vec<i64>,
    pub status: ReservationStatus,
}

impl ReservationChange {
    /// Current values of `reservation`, to be edited field by field
    pub fn from_reservation(reservation: &Reservation) -> Self {
        Self {
            start: reservation.start,
            end: reservation.end,
            addon_ids: reservation.addons.iter().map(|a| a.id).collect(),
            status: reservation.status,
        }
    }
}

pub struct BookingEngine<'a> {
    repos: &'a Repositories,
    today: NaiveDate,
}

impl<'a> BookingEngine<'a> {
    pub fn new(repos: &'a Repositories) -> Self {
        Self::with_today(repos, Local::now().date_naive())
    }

    /// Engine that treats `today` as the current date
    pub fn with_today(repos: &'a Repositories, today: NaiveDate) -> Self {
        Self { repos, today }
    }

    /// Whether `car_id` is free over `[from, to]`
    pub fn is_available(&self, car_id: i64, from: NaiveDate, to: NaiveDate) -> Result<bool> {
        validation::date_range(from, to)?;
        let resolved = self.repos.resolve()?;
        let car = find_car(&resolved, car_id)?;
        Ok(availability::is_available(car, from, to))
    }

    /// Price estimate; nothing is written
    pub fn quote(
        &self,
        car_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        addon_ids: &[i64],
    ) -> Result<PriceBreakdown> {
        validation::date_range(from, to)?;
        let resolved = self.repos.resolve()?;
        let car = find_car(&resolved, car_id)?;
        let addons = self.pick_addons(car, addon_ids)?;
        breakdown(car, from, to, &addons)
    }

    /// Book `car_id` for `customer` over `[from, to]`
    pub fn create(
        &self,
        customer: &User,
        car_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        addon_ids: &[i64],
    ) -> Result<Reservation> {
        if !customer.is_customer() {
            return Err(Error::Forbidden(
                "only customers can create reservations".to_string(),
            ));
        }
        validation::date_range(from, to)?;
        validation::not_in_past(from, self.today)?;

        let resolved = self.repos.resolve()?;
        let customer = self
            .repos
            .users
            .find_by_id(customer.id)?
            .filter(User::is_customer)
            .ok_or_else(|| Error::not_found("customer", customer.id))?;
        let car = find_car(&resolved, car_id)?;
        let addons = self.pick_addons(car, addon_ids)?;

        if let Some(existing) = conflicting(car, from, to, None) {
            debug!(car_id, conflicting = existing.id, "car already booked");
            return Err(Error::Unavailable { car_id, from, to });
        }
        let total_price = breakdown(car, from, to, &addons)?.total;

        let records = self.repos.reservations.find_all()?;
        let reservation = Reservation {
            id: next_id(records.iter().map(|r| r.id))?,
            customer,
            car_id,
            start: from,
            end: to,
            status: ReservationStatus::New,
            total_price,
            addons,
        };
        self.store(std::slice::from_ref(&reservation))?;

        info!(
            id = reservation.id,
            car_id,
            %from,
            %to,
            total = %reservation.total_price,
            "reservation created"
        );
        Ok(reservation)
    }

    /// Re-date, re-equip or move a reservation along the status graph.
    ///
    /// The price is always recomputed. Unless the new status is CANCELLED the
    /// new range must not collide with other reservations of the car.
    pub fn update(&self, actor: &User, id: i64, change: ReservationChange) -> Result<Reservation> {
        let resolved = self.repos.resolve()?;
        let current = find_reservation(&resolved, id)?;
        authorize(actor, current.customer.id)?;
        check_transition(current, change.status)?;
        validation::date_range(change.start, change.end)?;

        let car = find_car(&resolved, current.car_id)?;
        let addons = self.pick_addons(car, &change.addon_ids)?;

        if change.status.blocks_car()
            && !availability::is_available_excluding(car, change.start, change.end, id)
        {
            debug!(id, car_id = car.id, "update overlaps another reservation");
            return Err(Error::Unavailable {
                car_id: car.id,
                from: change.start,
                to: change.end,
            });
        }
        let total_price = breakdown(car, change.start, change.end, &addons)?.total;

        let updated = Reservation {
            start: change.start,
            end: change.end,
            status: change.status,
            total_price,
            addons,
            ..current.clone()
        };
        self.store(std::slice::from_ref(&updated))?;
        info!(id, status = %updated.status, total = %updated.total_price, "reservation updated");
        Ok(updated)
    }

    /// Move a NEW reservation to CANCELLED; dates and price are kept
    pub fn cancel(&self, actor: &User, id: i64) -> Result<Reservation> {
        let resolved = self.repos.resolve()?;
        let current = find_reservation(&resolved, id)?;
        authorize(actor, current.customer.id)?;
        check_transition(current, ReservationStatus::Cancelled)?;

        let cancelled = Reservation {
            status: ReservationStatus::Cancelled,
            ..current.clone()
        };
        self.store(std::slice::from_ref(&cancelled))?;
        info!(id, "reservation cancelled");
        Ok(cancelled)
    }

    /// Remove the row outright, including rows with broken references
    pub fn delete(&self, actor: &User, id: i64) -> Result<()> {
        let mut records = self.repos.reservations.find_all()?;
        let record = records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::not_found("reservation", id))?;
        authorize(actor, record.customer_id)?;

        records.retain(|r| r.id != id);
        self.repos.reservations.save_all(&records)?;
        info!(id, "reservation deleted");
        Ok(())
    }

    /// Own reservations for a customer, every reservation for an employee
    pub fn reservations_for(&self, user: &User) -> Result<Vec<Reservation>> {
        let resolved = self.repos.resolve()?;
        if user.is_employee() {
            return Ok(resolved.reservations);
        }
        Ok(resolved
            .reservations
            .into_iter()
            .filter(|r| r.customer.id == user.id)
            .collect())
    }

    pub fn find(&self, actor: &User, id: i64) -> Result<Reservation> {
        let resolved = self.repos.resolve()?;
        let reservation = find_reservation(&resolved, id)?;
        authorize(actor, reservation.customer.id)?;
        Ok(reservation.clone())
    }

    /// Resolve addon ids in order, keeping duplicates
    fn pick_addons(&self, car: &Car, addon_ids: &[i64]) -> Result<Vec<Addon>> {
        let catalogue = self.repos.addons.find_all()?;
        addon_ids
            .iter()
            .map(|id| {
                let addon = catalogue
                    .iter()
                    .find(|a| a.id == *id)
                    .ok_or_else(|| Error::not_found("addon", id))?;
                if !addon.is_eligible_for(car.category) {
                    return Err(Error::validation(format!(
                        "addon {} is not available for {} cars",
                        addon.name, car.category
                    )));
                }
                Ok(addon.clone())
            })
            .collect()
    }

    /// Strip `changed` to rows, then replace the raw rows with the same ids
    /// or append them
    fn store(&self, changed: &[Reservation]) -> Result<()> {
        let mut records = self.repos.reservations.find_all()?;
        for record in strip_reservations(changed) {
            match records.iter_mut().find(|r| r.id == record.id) {
                Some(slot) => *slot = record,
                None => records.push(record),
            }
        }
        self.repos.reservations.save_all(&records)
    }
}

fn find_car(resolved: &Resolved, car_id: i64) -> Result<&Car> {
    resolved
        .car(car_id)
        .ok_or_else(|| Error::not_found("car", car_id))
}

fn find_reservation(resolved: &Resolved, id: i64) -> Result<&Reservation> {
    resolved
        .reservation(id)
        .ok_or_else(|| Error::not_found("reservation", id))
}

/// Owners and employees may touch a reservation
fn authorize(actor: &User, customer_id: i64) -> Result<()> {
    if actor.is_employee() || (actor.is_customer() && actor.id == customer_id) {
        return Ok(());
    }
    Err(Error::Forbidden(format!(
        "user {} may not modify reservations of customer {}",
        actor.login, customer_id
    )))
}

fn check_transition(current: &Reservation, next: ReservationStatus) -> Result<()> {
    if current.status.can_transition_to(next) {
        return Ok(());
    }
    Err(Error::InvalidState(format!(
        "reservation {} cannot move from {} to {}",
        current.id, current.status, next
    )))
}
