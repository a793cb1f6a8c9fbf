//! Employer credit repository: balances and profile unlocks.

use serde::Serialize;
use tracing::info;

use jconnect_models::{EmployerCredits, ProfileView, UnlockResult};

use crate::client::SupabaseClient;
use crate::error::SupabaseResult;
use crate::query::Query;

const CREDITS_TABLE: &str = "employer_credits";
const VIEWS_TABLE: &str = "profile_views";

/// Arguments for the `access_job_seeker_profile` database function.
#[derive(Serialize)]
struct UnlockArgs<'a> {
    employer_id: &'a str,
    job_seeker_id: &'a str,
}

/// Repository for employer credits and profile view history.
pub struct CreditsRepository {
    client: SupabaseClient,
}

impl CreditsRepository {
    /// Create a new credits repository.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Get an employer's credit balance row, if one exists.
    pub async fn balance(&self, employer_id: &str) -> SupabaseResult<Option<EmployerCredits>> {
        self.client
            .select_single(
                CREDITS_TABLE,
                Query::new().select("*").eq("employer_id", employer_id),
            )
            .await
    }

    /// Unlock a job seeker's contact details, spending one credit.
    ///
    /// The check-and-decrement runs inside a single database function, so
    /// two devices racing for the last credit cannot both win; the loser
    /// gets an insufficient-credits result instead.
    pub async fn unlock_profile(
        &self,
        employer_id: &str,
        job_seeker_id: &str,
    ) -> SupabaseResult<UnlockResult> {
        let args = UnlockArgs {
            employer_id,
            job_seeker_id,
        };
        let result: UnlockResult = self.client.rpc("access_job_seeker_profile", &args).await?;
        info!(
            "Employer {} unlock of job seeker {}: success={} already_unlocked={}",
            employer_id, job_seeker_id, result.success, result.already_unlocked
        );
        Ok(result)
    }

    /// Whether the employer has already unlocked this job seeker.
    pub async fn has_viewed(&self, employer_id: &str, job_seeker_id: &str) -> SupabaseResult<bool> {
        let existing: Option<ProfileView> = self
            .client
            .select_single(
                VIEWS_TABLE,
                Query::new()
                    .select("*")
                    .eq("employer_id", employer_id)
                    .eq("job_seeker_id", job_seeker_id),
            )
            .await?;
        Ok(existing.is_some())
    }

    /// List the employer's unlocked profiles, newest first.
    pub async fn list_views(&self, employer_id: &str) -> SupabaseResult<Vec<ProfileView>> {
        self.client
            .select(
                VIEWS_TABLE,
                Query::new()
                    .select("*")
                    .eq("employer_id", employer_id)
                    .order("created_at", true),
            )
            .await
    }
}
