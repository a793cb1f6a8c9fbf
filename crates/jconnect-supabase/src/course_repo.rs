//! Course repository backed by the `courses` and `course_uploads` tables.

use chrono::Utc;
use tracing::info;

use jconnect_models::{Course, CourseStatus, CourseUpload};

use crate::client::SupabaseClient;
use crate::error::{SupabaseError, SupabaseResult};
use crate::query::Query;

const COURSES_TABLE: &str = "courses";
const UPLOADS_TABLE: &str = "course_uploads";

/// Repository for courses and their uploaded assets.
pub struct CourseRepository {
    client: SupabaseClient,
}

impl CourseRepository {
    /// Create a new course repository.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Insert a new course.
    pub async fn insert(&self, course: &Course) -> SupabaseResult<Course> {
        let stored: Course = self.client.insert(COURSES_TABLE, course).await?;
        info!(
            "Created course {} ({}) for employer {}",
            stored.id, stored.title, stored.employer_id
        );
        Ok(stored)
    }

    /// Get a course by id.
    pub async fn get(&self, course_id: &str) -> SupabaseResult<Option<Course>> {
        self.client
            .select_single(COURSES_TABLE, Query::new().select("*").eq("id", course_id))
            .await
    }

    /// List published courses for the marketplace, newest first.
    pub async fn list_published(&self) -> SupabaseResult<Vec<Course>> {
        self.client
            .select(
                COURSES_TABLE,
                Query::new()
                    .select("*")
                    .eq("status", CourseStatus::Published.as_str())
                    .order("created_at", true),
            )
            .await
    }

    /// List an employer's courses, newest first.
    pub async fn list_for_employer(&self, employer_id: &str) -> SupabaseResult<Vec<Course>> {
        self.client
            .select(
                COURSES_TABLE,
                Query::new()
                    .select("*")
                    .eq("employer_id", employer_id)
                    .order("created_at", true),
            )
            .await
    }

    /// Replace a course's mutable columns with the given state.
    pub async fn update(&self, course: &Course) -> SupabaseResult<Course> {
        let mut patch = serde_json::to_value(course)?;
        if let Some(obj) = patch.as_object_mut() {
            obj.remove("id");
            obj.remove("employer_id");
            obj.remove("created_at");
            obj.insert(
                "updated_at".to_string(),
                serde_json::json!(Utc::now().to_rfc3339()),
            );
        }

        let mut rows: Vec<Course> = self
            .client
            .update(
                COURSES_TABLE,
                Query::new().eq("id", course.id.as_str()),
                &patch,
            )
            .await?;
        if rows.is_empty() {
            return Err(SupabaseError::not_found(format!("course {}", course.id)));
        }
        info!("Updated course {}", course.id);
        Ok(rows.remove(0))
    }

    /// Change a course's status (publish, archive).
    pub async fn set_status(
        &self,
        course_id: &str,
        status: CourseStatus,
    ) -> SupabaseResult<Course> {
        let patch = serde_json::json!({
            "status": status.as_str(),
            "updated_at": Utc::now().to_rfc3339(),
        });
        let mut rows: Vec<Course> = self
            .client
            .update(COURSES_TABLE, Query::new().eq("id", course_id), &patch)
            .await?;
        if rows.is_empty() {
            return Err(SupabaseError::not_found(format!("course {}", course_id)));
        }
        info!("Course {} is now {}", course_id, status.as_str());
        Ok(rows.remove(0))
    }

    /// Record uploaded assets for a course.
    pub async fn insert_uploads(
        &self,
        uploads: &[CourseUpload],
    ) -> SupabaseResult<Vec<CourseUpload>> {
        let stored: Vec<CourseUpload> = self.client.insert_rows(UPLOADS_TABLE, uploads).await?;
        if let Some(first) = stored.first() {
            info!(
                "Recorded {} uploads for course {}",
                stored.len(),
                first.course_id
            );
        }
        Ok(stored)
    }

    /// List a course's uploaded assets, oldest first.
    pub async fn list_uploads(&self, course_id: &str) -> SupabaseResult<Vec<CourseUpload>> {
        self.client
            .select(
                UPLOADS_TABLE,
                Query::new()
                    .select("*")
                    .eq("course_id", course_id)
                    .order("created_at", false),
            )
            .await
    }

    /// Remove an upload record.
    pub async fn delete_upload(&self, upload_id: &str) -> SupabaseResult<()> {
        self.client
            .delete(UPLOADS_TABLE, Query::new().eq("id", upload_id))
            .await?;
        info!("Deleted course upload {}", upload_id);
        Ok(())
    }
}
