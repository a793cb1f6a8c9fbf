//! Job draft repository backed by the `job_drafts` table.

use chrono::{Duration, Utc};
use tracing::info;

use jconnect_models::{JobDraft, JobForm, DRAFT_TTL_DAYS};

use crate::client::SupabaseClient;
use crate::error::SupabaseResult;
use crate::query::Query;

const TABLE: &str = "job_drafts";

/// Repository for a user's job posting drafts.
pub struct DraftRepository {
    client: SupabaseClient,
    user_id: String,
}

impl DraftRepository {
    /// Create a new draft repository scoped to one user.
    pub fn new(client: SupabaseClient, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
        }
    }

    /// List this user's drafts, most recently touched first.
    pub async fn list(&self) -> SupabaseResult<Vec<JobDraft>> {
        self.client
            .select(
                TABLE,
                Query::new()
                    .select("*")
                    .eq("user_id", &self.user_id)
                    .order("updated_at", true),
            )
            .await
    }

    /// Persist a wizard form as a new draft row.
    ///
    /// The database enforces the five-draft cap with a trigger; a rejected
    /// insert surfaces as [`SupabaseError::DraftCapReached`].
    ///
    /// [`SupabaseError::DraftCapReached`]: crate::error::SupabaseError::DraftCapReached
    pub async fn save(&self, form: &JobForm) -> SupabaseResult<JobDraft> {
        let row = form.to_draft_row(&self.user_id);
        let stored: JobDraft = self.client.insert(TABLE, &row).await?;
        info!("Saved draft {} for user {}", stored.id, self.user_id);
        Ok(stored)
    }

    /// Get one of this user's drafts by id.
    pub async fn get(&self, draft_id: &str) -> SupabaseResult<Option<JobDraft>> {
        self.client
            .select_single(
                TABLE,
                Query::new()
                    .select("*")
                    .eq("id", draft_id)
                    .eq("user_id", &self.user_id),
            )
            .await
    }

    /// Delete one of this user's drafts.
    pub async fn delete(&self, draft_id: &str) -> SupabaseResult<()> {
        self.client
            .delete(
                TABLE,
                Query::new().eq("id", draft_id).eq("user_id", &self.user_id),
            )
            .await?;
        info!("Deleted draft {} for user {}", draft_id, self.user_id);
        Ok(())
    }

    /// Delete drafts last touched more than the TTL ago.
    /// Returns the number of drafts deleted.
    pub async fn delete_expired(&self) -> SupabaseResult<usize> {
        let cutoff = Utc::now() - Duration::days(DRAFT_TTL_DAYS);
        let deleted = self
            .client
            .delete_counting(
                TABLE,
                Query::new()
                    .eq("user_id", &self.user_id)
                    .lt("updated_at", cutoff.to_rfc3339()),
            )
            .await?;

        if deleted > 0 {
            info!(
                "Deleted {} expired drafts for user {}",
                deleted, self.user_id
            );
        }

        Ok(deleted)
    }
}
