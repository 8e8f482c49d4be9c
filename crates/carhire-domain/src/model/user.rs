use carhire_types::UserKind;
use serde::{Deserialize, Serialize};

use super::Identified;

/// Customer-only or employee-only data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer { email: String },
    Employee,
}

/// Account holder. Passwords are stored in plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(flatten)]
    pub role: Role,
}

impl User {
    pub fn kind(&self) -> UserKind {
        match self.role {
            Role::Customer { .. } => UserKind::Customer,
            Role::Employee => UserKind::Employee,
        }
    }

    pub fn is_customer(&self) -> bool {
        matches!(self.role, Role::Customer { .. })
    }

    pub fn is_employee(&self) -> bool {
        matches!(self.role, Role::Employee)
    }

    pub fn email(&self) -> Option<&str> {
        match &self.role {
            Role::Customer { email } => Some(email),
            Role::Employee => None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Identified for User {
    fn id(&self) -> i64 {
        self.id
    }
}
