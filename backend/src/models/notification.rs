//! In-app notification model
//!
//! Backend-only: notifications are stored and served by this server and
//! never shared with other components.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// An in-app notification row
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub title_vi: String,
    pub message: String,
    pub message_vi: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
