//! User and role models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Portal roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Parent,
    Kitchen,
    Manager,
    Warden,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Parent => "parent",
            UserRole::Kitchen => "kitchen",
            UserRole::Manager => "manager",
            UserRole::Warden => "warden",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "parent" => Some(UserRole::Parent),
            "kitchen" => Some(UserRole::Kitchen),
            "manager" => Some(UserRole::Manager),
            "warden" => Some(UserRole::Warden),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// Roles allowed to resolve purchase orders (approve or reject).
    pub fn can_resolve_orders(&self) -> bool {
        matches!(self, UserRole::Manager | UserRole::Admin)
    }

    /// Roles allowed to edit plans and run the weekly settlement.
    pub fn can_operate_kitchen(&self) -> bool {
        matches!(self, UserRole::Kitchen | UserRole::Manager | UserRole::Admin)
    }
}

/// Public user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}
