//! Enrollment, favorite, and view repositories for the course marketplace.

use tracing::{debug, info};

use jconnect_models::{CourseFavorite, CourseNotification, CourseView, Enrollment};

use crate::client::SupabaseClient;
use crate::error::SupabaseResult;
use crate::query::Query;

const ENROLLMENTS_TABLE: &str = "course_enrollments";
const FAVORITES_TABLE: &str = "course_favorites";
const VIEWS_TABLE: &str = "course_views";
const COURSE_NOTIFICATIONS_TABLE: &str = "course_notifications";

/// Repository for course enrollments and engagement rows.
pub struct EnrollmentRepository {
    client: SupabaseClient,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Enroll a user in a course.
    ///
    /// Re-enrolling violates the table's unique constraint and surfaces as
    /// [`SupabaseError::UniqueViolation`].
    pub async fn enroll(&self, enrollment: &Enrollment) -> SupabaseResult<Enrollment> {
        let stored: Enrollment = self.client.insert(ENROLLMENTS_TABLE, enrollment).await?;
        info!(
            "User {} enrolled in course {} (paid: {})",
            stored.user_id, stored.course_id, stored.paid
        );
        Ok(stored)
    }

    /// Get a user's enrollment in a course, if any.
    pub async fn get(&self, course_id: &str, user_id: &str) -> SupabaseResult<Option<Enrollment>> {
        self.client
            .select_single(
                ENROLLMENTS_TABLE,
                Query::new()
                    .select("*")
                    .eq("course_id", course_id)
                    .eq("user_id", user_id),
            )
            .await
    }

    /// List a user's enrollments, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> SupabaseResult<Vec<Enrollment>> {
        self.client
            .select(
                ENROLLMENTS_TABLE,
                Query::new()
                    .select("*")
                    .eq("user_id", user_id)
                    .order("created_at", true),
            )
            .await
    }

    /// List all enrollments across a set of courses.
    pub async fn list_for_courses(&self, course_ids: &[&str]) -> SupabaseResult<Vec<Enrollment>> {
        if course_ids.is_empty() {
            return Ok(vec![]);
        }
        self.client
            .select(
                ENROLLMENTS_TABLE,
                Query::new().select("*").in_list("course_id", course_ids),
            )
            .await
    }

    /// Approve a pending enrollment on a manual-approval course.
    pub async fn approve(&self, enrollment_id: &str) -> SupabaseResult<()> {
        let patch = serde_json::json!({ "approved_by_employer": true });
        let _rows: Vec<Enrollment> = self
            .client
            .update(
                ENROLLMENTS_TABLE,
                Query::new().eq("id", enrollment_id),
                &patch,
            )
            .await?;
        info!("Approved enrollment {}", enrollment_id);
        Ok(())
    }

    /// Add a course to a user's wishlist. Returns `false` when it was
    /// already there.
    pub async fn add_favorite(&self, favorite: &CourseFavorite) -> SupabaseResult<bool> {
        match self
            .client
            .insert::<_, CourseFavorite>(FAVORITES_TABLE, favorite)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_unique_violation() => {
                debug!(
                    "Course {} already on wishlist for user {}",
                    favorite.course_id, favorite.user_id
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove a course from a user's wishlist.
    pub async fn remove_favorite(&self, course_id: &str, user_id: &str) -> SupabaseResult<()> {
        self.client
            .delete(
                FAVORITES_TABLE,
                Query::new()
                    .eq("course_id", course_id)
                    .eq("user_id", user_id),
            )
            .await
    }

    /// List a user's wishlisted courses.
    pub async fn list_favorites(&self, user_id: &str) -> SupabaseResult<Vec<CourseFavorite>> {
        self.client
            .select(
                FAVORITES_TABLE,
                Query::new()
                    .select("*")
                    .eq("user_id", user_id)
                    .order("created_at", true),
            )
            .await
    }

    /// Record that a course detail page was opened.
    pub async fn record_view(&self, view: &CourseView) -> SupabaseResult<()> {
        let _stored: CourseView = self.client.insert(VIEWS_TABLE, view).await?;
        Ok(())
    }

    /// List all recorded views across a set of courses.
    pub async fn list_views_for_courses(
        &self,
        course_ids: &[&str],
    ) -> SupabaseResult<Vec<CourseView>> {
        if course_ids.is_empty() {
            return Ok(vec![]);
        }
        self.client
            .select(
                VIEWS_TABLE,
                Query::new().select("*").in_list("course_id", course_ids),
            )
            .await
    }

    /// Insert a course notification (enrollment receipts and the like).
    pub async fn insert_course_notification(
        &self,
        notification: &CourseNotification,
    ) -> SupabaseResult<CourseNotification> {
        let stored: CourseNotification = self
            .client
            .insert(COURSE_NOTIFICATIONS_TABLE, notification)
            .await?;
        info!(
            "Course notification {} created for user {}",
            stored.id, stored.user_id
        );
        Ok(stored)
    }

    /// List a user's course notifications, newest first.
    pub async fn list_course_notifications(
        &self,
        user_id: &str,
    ) -> SupabaseResult<Vec<CourseNotification>> {
        self.client
            .select(
                COURSE_NOTIFICATIONS_TABLE,
                Query::new()
                    .select("*")
                    .eq("user_id", user_id)
                    .order("created_at", true),
            )
            .await
    }
}
