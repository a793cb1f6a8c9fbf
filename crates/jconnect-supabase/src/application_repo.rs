//! Application repositories for jobs and internships.

use chrono::Utc;
use tracing::info;

use jconnect_models::{Application, ApplicationStatus, InternshipApplication};

use crate::client::SupabaseClient;
use crate::error::{SupabaseError, SupabaseResult};
use crate::query::Query;

const APPLICATIONS_TABLE: &str = "applications";
const INTERNSHIP_APPLICATIONS_TABLE: &str = "internship_applications";

/// Repository for job and internship applications.
pub struct ApplicationRepository {
    client: SupabaseClient,
}

impl ApplicationRepository {
    /// Create a new application repository.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Submit an application to a job.
    ///
    /// A second application to the same job violates the table's unique
    /// constraint and surfaces as [`SupabaseError::UniqueViolation`].
    pub async fn apply(&self, application: &Application) -> SupabaseResult<Application> {
        let stored: Application = self.client.insert(APPLICATIONS_TABLE, application).await?;
        info!(
            "Application {} submitted to job {} by {}",
            stored.id, stored.job_id, stored.applicant_id
        );
        Ok(stored)
    }

    /// Submit an application to an internship.
    pub async fn apply_internship(
        &self,
        application: &InternshipApplication,
    ) -> SupabaseResult<InternshipApplication> {
        let stored: InternshipApplication = self
            .client
            .insert(INTERNSHIP_APPLICATIONS_TABLE, application)
            .await?;
        info!(
            "Internship application {} submitted to {} by {}",
            stored.id, stored.internship_id, stored.applicant_id
        );
        Ok(stored)
    }

    /// Whether the user has already applied to a job.
    pub async fn has_applied(&self, job_id: &str, applicant_id: &str) -> SupabaseResult<bool> {
        let existing: Option<Application> = self
            .client
            .select_single(
                APPLICATIONS_TABLE,
                Query::new()
                    .select("*")
                    .eq("job_id", job_id)
                    .eq("applicant_id", applicant_id),
            )
            .await?;
        Ok(existing.is_some())
    }

    /// List a job seeker's applications, newest first.
    pub async fn list_for_applicant(&self, applicant_id: &str) -> SupabaseResult<Vec<Application>> {
        self.client
            .select(
                APPLICATIONS_TABLE,
                Query::new()
                    .select("*")
                    .eq("applicant_id", applicant_id)
                    .order("created_at", true),
            )
            .await
    }

    /// List all applications across a set of jobs, newest first.
    pub async fn list_for_jobs(&self, job_ids: &[&str]) -> SupabaseResult<Vec<Application>> {
        if job_ids.is_empty() {
            return Ok(vec![]);
        }
        self.client
            .select(
                APPLICATIONS_TABLE,
                Query::new()
                    .select("*")
                    .in_list("job_id", job_ids)
                    .order("created_at", true),
            )
            .await
    }

    /// List all applications across a set of internships, newest first.
    pub async fn list_for_internships(
        &self,
        internship_ids: &[&str],
    ) -> SupabaseResult<Vec<InternshipApplication>> {
        if internship_ids.is_empty() {
            return Ok(vec![]);
        }
        self.client
            .select(
                INTERNSHIP_APPLICATIONS_TABLE,
                Query::new()
                    .select("*")
                    .in_list("internship_id", internship_ids)
                    .order("created_at", true),
            )
            .await
    }

    /// Move an application to a new status.
    pub async fn update_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> SupabaseResult<Application> {
        let patch = serde_json::json!({
            "status": status.as_str(),
            "updated_at": Utc::now().to_rfc3339(),
        });
        let mut rows: Vec<Application> = self
            .client
            .update(
                APPLICATIONS_TABLE,
                Query::new().eq("id", application_id),
                &patch,
            )
            .await?;
        if rows.is_empty() {
            return Err(SupabaseError::not_found(format!(
                "application {}",
                application_id
            )));
        }
        info!(
            "Updated application {} status to {}",
            application_id,
            status.as_str()
        );
        Ok(rows.remove(0))
    }

    /// Move an internship application to a new status.
    pub async fn update_internship_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> SupabaseResult<InternshipApplication> {
        let patch = serde_json::json!({
            "status": status.as_str(),
            "updated_at": Utc::now().to_rfc3339(),
        });
        let mut rows: Vec<InternshipApplication> = self
            .client
            .update(
                INTERNSHIP_APPLICATIONS_TABLE,
                Query::new().eq("id", application_id),
                &patch,
            )
            .await?;
        if rows.is_empty() {
            return Err(SupabaseError::not_found(format!(
                "internship application {}",
                application_id
            )));
        }
        info!(
            "Updated internship application {} status to {}",
            application_id,
            status.as_str()
        );
        Ok(rows.remove(0))
    }

    /// Withdraw the user's own application.
    pub async fn withdraw(&self, application_id: &str, applicant_id: &str) -> SupabaseResult<()> {
        let patch = serde_json::json!({
            "status": ApplicationStatus::Withdrawn.as_str(),
            "updated_at": Utc::now().to_rfc3339(),
        });
        let _rows: Vec<Application> = self
            .client
            .update(
                APPLICATIONS_TABLE,
                Query::new()
                    .eq("id", application_id)
                    .eq("applicant_id", applicant_id),
                &patch,
            )
            .await?;
        info!("Application {} withdrawn", application_id);
        Ok(())
    }
}
