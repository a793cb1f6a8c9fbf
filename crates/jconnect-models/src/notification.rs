//! Notification types.
//!
//! Notifications are denormalized message rows written as side effects of
//! other operations (status changes, enrollments). Writers treat them as
//! best-effort: a failed insert never undoes the operation that produced it.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ApplicationStatus;

/// Category of a notification row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// An application's review status changed.
    #[default]
    ApplicationStatus,
    /// A learner enrolled in a course.
    Enrollment,
    /// Anything else.
    General,
}

impl NotificationKind {
    /// Get kind as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ApplicationStatus => "application_status",
            NotificationKind::Enrollment => "enrollment",
            NotificationKind::General => "general",
        }
    }
}

/// A notification row for a user's notification center.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Notification {
    /// Row primary key.
    pub id: String,

    /// Recipient (profile ID).
    pub user_id: String,

    /// Short title line.
    pub title: String,

    /// Body text.
    pub message: String,

    /// Category.
    #[serde(default)]
    pub kind: NotificationKind,

    /// Whether the recipient has opened it.
    #[serde(default)]
    pub read: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create an unread notification.
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: title.into(),
            message: message.into(),
            kind,
            read: false,
            created_at: Utc::now(),
        }
    }

    /// Build the status-change notification sent to an applicant.
    pub fn for_status_change(
        applicant_id: impl Into<String>,
        posting_title: &str,
        status: ApplicationStatus,
    ) -> Self {
        Self::new(
            applicant_id,
            "Application Update",
            format!(
                "Your application for {} has been {}",
                posting_title,
                status.label().to_lowercase()
            ),
            NotificationKind::ApplicationStatus,
        )
    }
}

/// A course-scoped event row shown on the employer's course dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CourseNotification {
    /// Row primary key.
    pub id: String,

    /// Course the event belongs to.
    pub course_id: String,

    /// User the event is about.
    pub user_id: String,

    /// Category, e.g. "enrollment".
    #[serde(rename = "type")]
    pub kind: String,

    /// Body text.
    pub message: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl CourseNotification {
    /// Build the enrollment event for a course.
    pub fn for_enrollment(
        course_id: impl Into<String>,
        user_id: impl Into<String>,
        course_title: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.into(),
            user_id: user_id.into(),
            kind: "enrollment".to_string(),
            message: format!("You enrolled in {}", course_title),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_change_notification_message() {
        let n = Notification::for_status_change("u-1", "Store Manager", ApplicationStatus::Shortlisted);
        assert_eq!(n.title, "Application Update");
        assert_eq!(n.message, "Your application for Store Manager has been shortlisted");
        assert!(!n.read);
        assert_eq!(n.kind, NotificationKind::ApplicationStatus);
    }

    #[test]
    fn test_accepted_status_reads_as_hired() {
        let n = Notification::for_status_change("u-1", "Store Manager", ApplicationStatus::Accepted);
        assert_eq!(n.message, "Your application for Store Manager has been hired");
    }

    #[test]
    fn test_enrollment_event_message() {
        let e = CourseNotification::for_enrollment("c-1", "u-1", "Retail Basics");
        assert_eq!(e.kind, "enrollment");
        assert_eq!(e.message, "You enrolled in Retail Basics");
    }

    #[test]
    fn test_course_notification_type_column_name() {
        let e = CourseNotification::for_enrollment("c-1", "u-1", "Retail Basics");
        let value = serde_json::to_value(&e).unwrap();
        // Column is named "type" in the store
        assert_eq!(value["type"], "enrollment");
        assert!(value.get("kind").is_none());
    }
}
