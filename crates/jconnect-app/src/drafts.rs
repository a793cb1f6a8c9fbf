//! Saved-draft list for the posting wizard.

use chrono::{Duration, Utc};
use tracing::info;

use jconnect_models::{JobDraft, JobForm, DRAFT_TTL_DAYS};
use jconnect_supabase::{DraftRepository, SupabaseClient};

use crate::error::{AppError, AppResult};

/// The drafts panel: local list plus its persistence operations.
///
/// Local state only changes after the backend confirms, so a rejected save
/// (the five-draft cap, a network failure) leaves the list exactly as it is
/// displayed.
pub struct DraftManager {
    repo: DraftRepository,
    drafts: Vec<JobDraft>,
}

impl DraftManager {
    /// Create a manager for one user's drafts.
    pub fn new(client: SupabaseClient, user_id: impl Into<String>) -> Self {
        Self {
            repo: DraftRepository::new(client, user_id),
            drafts: Vec::new(),
        }
    }

    /// Reload the draft list, most recently updated first.
    pub async fn refresh(&mut self) -> AppResult<&[JobDraft]> {
        self.drafts = self.repo.list().await?;
        Ok(&self.drafts)
    }

    /// Drafts as last fetched, most recently updated first.
    pub fn drafts(&self) -> &[JobDraft] {
        &self.drafts
    }

    /// Number of drafts held locally.
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    /// Whether no drafts are held locally.
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Save the current form as a new draft.
    ///
    /// An entirely empty form is rejected before any network call. The
    /// sixth draft is rejected by the backend; that error carries the
    /// "Maximum 5 drafts" message and the local list stays untouched.
    pub async fn save(&mut self, form: &JobForm) -> AppResult<&JobDraft> {
        if !form.has_data() {
            return Err(AppError::validation_on("form", "Cannot save an empty draft"));
        }
        let stored = self.repo.save(form).await?;
        info!(draft_id = %stored.id, "Draft saved");
        self.drafts.insert(0, stored);
        Ok(&self.drafts[0])
    }

    /// Load a draft back into form state, when it still exists.
    pub async fn load(&self, draft_id: &str) -> AppResult<Option<JobForm>> {
        let draft = self.repo.get(draft_id).await?;
        Ok(draft.as_ref().map(JobForm::from_draft_row))
    }

    /// Delete a draft and drop it from the local list.
    pub async fn delete(&mut self, draft_id: &str) -> AppResult<()> {
        self.repo.delete(draft_id).await?;
        self.drafts.retain(|d| d.id.as_str() != draft_id);
        Ok(())
    }

    /// Purge drafts whose last update is older than the expiry window.
    ///
    /// Returns how many rows the backend removed. The local list is trimmed
    /// with the same cutoff so it never shows a draft that just expired.
    pub async fn purge_expired(&mut self) -> AppResult<usize> {
        let removed = self.repo.delete_expired().await?;
        if removed > 0 {
            let cutoff = Utc::now() - Duration::days(DRAFT_TTL_DAYS);
            self.drafts.retain(|d| d.updated_at >= cutoff);
            info!(removed, "Purged expired drafts");
        }
        Ok(removed)
    }
}
