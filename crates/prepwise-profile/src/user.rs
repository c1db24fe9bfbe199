//! Users and roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Teacher => write!(f, "teacher"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(format!("unknown role: {other} (expected student or teacher)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    /// A fresh user. The display name is the local part of the email.
    pub fn new(email: &str, role: Role) -> Self {
        let email = email.trim();
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            id: Uuid::new_v4(),
            name,
            email: email.to_string(),
            role,
        }
    }

    /// Key that identifies this person across logins: the lowercased email.
    pub fn identity_key(&self) -> String {
        self.email.to_lowercase()
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}
