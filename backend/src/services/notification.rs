//! In-app notification service
//!
//! Workflow events (order created, approved, rejected, settlement done) fan
//! out to the users holding the relevant roles. Rows here back the in-app
//! notification list; the push channel is a separate fire-and-forget client.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Notification;
use shared::UserRole;

/// Notification service
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
}

/// Bilingual content of a notification being fanned out
#[derive(Debug, Clone)]
pub struct NotificationContent<'a> {
    pub title: &'a str,
    pub title_vi: &'a str,
    pub message: &'a str,
    pub message_vi: &'a str,
    pub entity_type: &'a str,
    pub entity_id: Uuid,
}

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, title_vi, message, message_vi, \
                                    entity_type, entity_id, is_read, created_at";

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Insert one notification per user holding any of the given roles
    pub async fn notify_roles(
        &self,
        roles: &[UserRole],
        content: NotificationContent<'_>,
    ) -> AppResult<u64> {
        let role_names: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO notifications (user_id, title, title_vi, message, message_vi, entity_type, entity_id)
            SELECT id, $1, $2, $3, $4, $5, $6 FROM users WHERE role = ANY($7)
            "#,
        )
        .bind(content.title)
        .bind(content.title_vi)
        .bind(content.message)
        .bind(content.message_vi)
        .bind(content.entity_type)
        .bind(content.entity_id)
        .bind(&role_names)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected())
    }

    /// List a user's notifications, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT 100"
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Count a user's unread notifications
    pub async fn unread_count(&self, user_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    /// Mark one of the user's notifications as read
    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification".to_string()));
        }
        Ok(())
    }
}
