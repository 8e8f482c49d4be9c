//! Accounts: login, registration, password reset
//!
//! There is no session. [`AccountService::login`] returns the user, and the
//! caller passes it explicitly to every booking call.

use tracing::{info, warn};

use carhire_domain::model::{Role, User};
use carhire_domain::repository::{Repository, UserRepository};
use carhire_domain::service::{next_id, validation};
use carhire_types::{Error, Result};

use crate::repository::Repositories;

/// Customer self-registration form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub login: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

pub struct AccountService<'a> {
    repos: &'a Repositories,
    min_password_length: usize,
}

impl<'a> AccountService<'a> {
    pub fn new(repos: &'a Repositories, min_password_length: usize) -> Self {
        Self {
            repos,
            min_password_length,
        }
    }

    pub fn list(&self) -> Result<Vec<User>> {
        self.repos.users.find_all()
    }

    pub fn find(&self, id: i64) -> Result<User> {
        self.repos
            .users
            .find_by_id(id)?
            .ok_or_else(|| Error::not_found("user", id))
    }

    /// Plain-text credential check
    pub fn login(&self, login: &str, password: &str) -> Result<User> {
        match self.repos.users.find_by_login(login.trim())? {
            Some(user) if user.password == password => Ok(user),
            _ => {
                warn!(login, "rejected login");
                Err(Error::Forbidden("invalid login or password".to_string()))
            }
        }
    }

    pub fn register_customer(&self, form: &Registration) -> Result<User> {
        let email = validation::email(&form.email)?;
        self.add_user(
            &form.login,
            &form.password,
            &form.first_name,
            &form.last_name,
            Role::Customer { email },
        )
    }

    pub fn add_employee(
        &self,
        login: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User> {
        self.add_user(login, password, first_name, last_name, Role::Employee)
    }

    pub fn reset_password(&self, login: &str, new_password: &str) -> Result<()> {
        self.check_password(new_password)?;
        let mut all = self.repos.users.find_all()?;
        let user = all
            .iter_mut()
            .find(|u| u.login == login.trim())
            .ok_or_else(|| Error::NotFound(format!("user with login {}", login.trim())))?;
        user.password = new_password.to_string();
        self.repos.users.save_all(&all)?;
        info!(login = login.trim(), "password reset");
        Ok(())
    }

    fn add_user(
        &self,
        login: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        role: Role,
    ) -> Result<User> {
        let login = validation::required_text("login", login)?;
        self.check_password(password)?;
        let first_name = validation::required_text("first name", first_name)?;
        let last_name = validation::required_text("last name", last_name)?;

        let mut all = self.repos.users.find_all()?;
        if all.iter().any(|u| u.login == login) {
            return Err(Error::validation(format!("login {} is already taken", login)));
        }

        let user = User {
            id: next_id(all.iter().map(|u| u.id))?,
            login,
            password: password.to_string(),
            first_name,
            last_name,
            role,
        };
        all.push(user.clone());
        self.repos.users.save_all(&all)?;
        info!(id = user.id, login = %user.login, kind = %user.kind(), "user added");
        Ok(user)
    }

    fn check_password(&self, password: &str) -> Result<()> {
        validation::plain_text("password", password)?;
        if password.chars().count() < self.min_password_length {
            return Err(Error::validation(format!(
                "password must have at least {} characters",
                self.min_password_length
            )));
        }
        Ok(())
    }
}
