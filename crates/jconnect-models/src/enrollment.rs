//! Enrollment and course-event types.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique enrollment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EnrollmentId(pub String);

impl EnrollmentId {
    /// Generate a new random enrollment ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EnrollmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An enrollment row linking a learner to a course.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Enrollment {
    /// Row primary key.
    pub id: EnrollmentId,

    /// Enrolled course.
    pub course_id: String,

    /// Learner (profile ID).
    pub user_id: String,

    /// Whether the enrollment went through a paid checkout.
    #[serde(default)]
    pub paid: bool,

    /// Enrollment status; "active" unless cancelled.
    #[serde(default = "default_status")]
    pub status: String,

    /// Set once the employer approves a manually-gated enrollment.
    #[serde(default)]
    pub approved_by_employer: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

fn default_status() -> String {
    "active".to_string()
}

impl Enrollment {
    /// Create a fresh active enrollment.
    pub fn new(course_id: impl Into<String>, user_id: impl Into<String>, paid: bool) -> Self {
        Self {
            id: EnrollmentId::new(),
            course_id: course_id.into(),
            user_id: user_id.into(),
            paid,
            status: default_status(),
            approved_by_employer: false,
            created_at: Utc::now(),
        }
    }

    /// Whether course content is visible to this learner.
    ///
    /// Courses with manual approval stay locked until the employer approves;
    /// everything else unlocks immediately.
    pub fn is_unlocked(&self, manual_approval: bool) -> bool {
        !manual_approval || self.approved_by_employer
    }
}

/// A per-view analytics row for a course.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CourseView {
    /// Row primary key.
    pub id: String,

    /// Viewed course.
    pub course_id: String,

    /// Viewer (profile ID), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl CourseView {
    /// Record a view of a course.
    pub fn new(course_id: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.into(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// A learner's wishlist entry; unique per (user, course).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CourseFavorite {
    /// Row primary key.
    pub id: String,

    /// Favorited course.
    pub course_id: String,

    /// Learner (profile ID).
    pub user_id: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl CourseFavorite {
    /// Create a wishlist entry.
    pub fn new(course_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.into(),
            user_id: user_id.into(),
            created_at: Utc::now(),
        }
    }
}
