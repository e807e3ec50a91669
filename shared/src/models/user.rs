//! User role models

use serde::{Deserialize, Serialize};

/// Roles a platform user can hold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Farmer,
    Technician,
    Admin,
}

impl UserRole {
    pub fn is_farmer(&self) -> bool {
        matches!(self, UserRole::Farmer)
    }

    pub fn is_technician(&self) -> bool {
        matches!(self, UserRole::Technician)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Farmer => write!(f, "farmer"),
            UserRole::Technician => write!(f, "technician"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}
