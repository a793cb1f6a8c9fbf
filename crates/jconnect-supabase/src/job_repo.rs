//! Job and internship posting repositories.

use chrono::Utc;
use tracing::info;

use jconnect_models::{Internship, Job, JobStatus};

use crate::client::SupabaseClient;
use crate::error::{SupabaseError, SupabaseResult};
use crate::query::Query;

const JOBS_TABLE: &str = "jobs";
const INTERNSHIPS_TABLE: &str = "internships";

/// Repository for job postings.
pub struct JobRepository {
    client: SupabaseClient,
}

impl JobRepository {
    /// Create a new job repository.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Publish a job posting.
    pub async fn insert(&self, job: &Job) -> SupabaseResult<Job> {
        let stored: Job = self.client.insert(JOBS_TABLE, job).await?;
        info!(
            "Posted job {} ({}) for employer {}",
            stored.id, stored.job_title, stored.employer_id
        );
        Ok(stored)
    }

    /// Get a job by id.
    pub async fn get(&self, job_id: &str) -> SupabaseResult<Option<Job>> {
        self.client
            .select_single(JOBS_TABLE, Query::new().select("*").eq("id", job_id))
            .await
    }

    /// List an employer's postings, newest first.
    pub async fn list_for_employer(&self, employer_id: &str) -> SupabaseResult<Vec<Job>> {
        self.client
            .select(
                JOBS_TABLE,
                Query::new()
                    .select("*")
                    .eq("employer_id", employer_id)
                    .order("created_at", true),
            )
            .await
    }

    /// List all active postings, newest first.
    pub async fn list_active(&self) -> SupabaseResult<Vec<Job>> {
        self.client
            .select(
                JOBS_TABLE,
                Query::new()
                    .select("*")
                    .eq("status", JobStatus::Active.as_str())
                    .order("created_at", true),
            )
            .await
    }

    /// Change a posting's status (pause, close, reopen).
    pub async fn update_status(&self, job_id: &str, status: JobStatus) -> SupabaseResult<Job> {
        let patch = serde_json::json!({
            "status": status.as_str(),
            "updated_at": Utc::now().to_rfc3339(),
        });
        let mut rows: Vec<Job> = self
            .client
            .update(JOBS_TABLE, Query::new().eq("id", job_id), &patch)
            .await?;
        if rows.is_empty() {
            return Err(SupabaseError::not_found(format!("job {}", job_id)));
        }
        info!("Updated job {} status to {}", job_id, status.as_str());
        Ok(rows.remove(0))
    }

    /// Delete a posting.
    pub async fn delete(&self, job_id: &str) -> SupabaseResult<()> {
        self.client
            .delete(JOBS_TABLE, Query::new().eq("id", job_id))
            .await?;
        info!("Deleted job {}", job_id);
        Ok(())
    }
}

/// Repository for internship postings.
pub struct InternshipRepository {
    client: SupabaseClient,
}

impl InternshipRepository {
    /// Create a new internship repository.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Publish an internship posting.
    pub async fn insert(&self, internship: &Internship) -> SupabaseResult<Internship> {
        let stored: Internship = self.client.insert(INTERNSHIPS_TABLE, internship).await?;
        info!(
            "Posted internship {} ({}) for employer {}",
            stored.id, stored.title, stored.employer_id
        );
        Ok(stored)
    }

    /// Get an internship by id.
    pub async fn get(&self, internship_id: &str) -> SupabaseResult<Option<Internship>> {
        self.client
            .select_single(
                INTERNSHIPS_TABLE,
                Query::new().select("*").eq("id", internship_id),
            )
            .await
    }

    /// List an employer's internships, newest first.
    pub async fn list_for_employer(&self, employer_id: &str) -> SupabaseResult<Vec<Internship>> {
        self.client
            .select(
                INTERNSHIPS_TABLE,
                Query::new()
                    .select("*")
                    .eq("employer_id", employer_id)
                    .order("created_at", true),
            )
            .await
    }

    /// List all active internships, newest first.
    pub async fn list_active(&self) -> SupabaseResult<Vec<Internship>> {
        self.client
            .select(
                INTERNSHIPS_TABLE,
                Query::new()
                    .select("*")
                    .eq("status", JobStatus::Active.as_str())
                    .order("created_at", true),
            )
            .await
    }

    /// Change an internship's status.
    pub async fn update_status(
        &self,
        internship_id: &str,
        status: JobStatus,
    ) -> SupabaseResult<Internship> {
        let patch = serde_json::json!({
            "status": status.as_str(),
            "updated_at": Utc::now().to_rfc3339(),
        });
        let mut rows: Vec<Internship> = self
            .client
            .update(
                INTERNSHIPS_TABLE,
                Query::new().eq("id", internship_id),
                &patch,
            )
            .await?;
        if rows.is_empty() {
            return Err(SupabaseError::not_found(format!(
                "internship {}",
                internship_id
            )));
        }
        info!(
            "Updated internship {} status to {}",
            internship_id,
            status.as_str()
        );
        Ok(rows.remove(0))
    }
}
