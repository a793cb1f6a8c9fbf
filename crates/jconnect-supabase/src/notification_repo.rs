//! Notification repository backed by the `notifications` table.

use tracing::info;

use jconnect_models::Notification;

use crate::client::SupabaseClient;
use crate::error::SupabaseResult;
use crate::query::Query;

const TABLE: &str = "notifications";

/// Repository for user-facing notifications.
pub struct NotificationRepository {
    client: SupabaseClient,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Insert a notification.
    pub async fn insert(&self, notification: &Notification) -> SupabaseResult<Notification> {
        let stored: Notification = self.client.insert(TABLE, notification).await?;
        info!(
            "Notification {} created for user {}",
            stored.id, stored.user_id
        );
        Ok(stored)
    }

    /// List a user's notifications, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> SupabaseResult<Vec<Notification>> {
        self.client
            .select(
                TABLE,
                Query::new()
                    .select("*")
                    .eq("user_id", user_id)
                    .order("created_at", true),
            )
            .await
    }

    /// Count a user's unread notifications.
    pub async fn unread_count(&self, user_id: &str) -> SupabaseResult<usize> {
        let rows: Vec<serde_json::Value> = self
            .client
            .select(
                TABLE,
                Query::new()
                    .select("id")
                    .eq("user_id", user_id)
                    .eq("read", "false"),
            )
            .await?;
        Ok(rows.len())
    }

    /// Mark one notification as read.
    pub async fn mark_read(&self, notification_id: &str) -> SupabaseResult<()> {
        let patch = serde_json::json!({ "read": true });
        let _rows: Vec<Notification> = self
            .client
            .update(TABLE, Query::new().eq("id", notification_id), &patch)
            .await?;
        Ok(())
    }

    /// Mark all of a user's notifications as read.
    pub async fn mark_all_read(&self, user_id: &str) -> SupabaseResult<()> {
        let patch = serde_json::json!({ "read": true });
        let _rows: Vec<Notification> = self
            .client
            .update(
                TABLE,
                Query::new().eq("user_id", user_id).eq("read", "false"),
                &patch,
            )
            .await?;
        info!("Marked notifications read for user {}", user_id);
        Ok(())
    }
}
