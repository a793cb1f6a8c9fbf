//! Course marketplace types.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique course identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CourseId(pub String);

impl CourseId {
    /// Generate a new random course ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CourseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CourseId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CourseId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Publication status of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    /// Being assembled, not visible in the marketplace.
    #[default]
    Draft,
    /// Listed in the marketplace.
    Published,
    /// Taken down by the owner.
    Archived,
}

impl CourseStatus {
    /// Get status as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "draft",
            CourseStatus::Published => "published",
            CourseStatus::Archived => "archived",
        }
    }

    /// Parse from string. Unknown values map to `Draft`.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "published" => CourseStatus::Published,
            "archived" => CourseStatus::Archived,
            _ => CourseStatus::Draft,
        }
    }
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A course row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Course {
    /// Row primary key.
    pub id: CourseId,

    /// Owning employer (profile ID).
    pub employer_id: String,

    /// Course title.
    pub title: String,

    /// Category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Full description text.
    #[serde(default)]
    pub description: String,

    /// Cover photo URL (public storage URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_photo_url: Option<String>,

    /// Price in rupees; ignored when `is_free`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,

    /// Whether the course is free to enroll.
    #[serde(default)]
    pub is_free: bool,

    /// External course link, when content is hosted elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_link: Option<String>,

    /// Post-enrollment redirect link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_link: Option<String>,

    /// Whether the employer must approve each enrollment before content
    /// unlocks.
    #[serde(default)]
    pub manual_approval: bool,

    /// Publication status.
    #[serde(default)]
    pub status: CourseStatus,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Effective price: zero for free courses.
    pub fn effective_price(&self) -> i64 {
        if self.is_free {
            0
        } else {
            self.price.unwrap_or(0)
        }
    }

    /// Whether the course shows up in the marketplace.
    pub fn is_listed(&self) -> bool {
        self.status == CourseStatus::Published
    }

    /// Price rendered for marketplace cards.
    pub fn price_display(&self) -> String {
        if self.is_free {
            "Free".to_string()
        } else {
            format!("₹{}", self.price.unwrap_or(0))
        }
    }
}

/// Unique upload identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct UploadId(pub String);

impl UploadId {
    /// Generate a new random upload ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UploadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata row for a file uploaded to a course.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CourseUpload {
    /// Row primary key.
    pub id: UploadId,

    /// Course the file belongs to.
    pub course_id: String,

    /// Original file name.
    pub file_name: String,

    /// File size in bytes.
    pub file_size: i64,

    /// MIME content type.
    pub content_type: String,

    /// Public storage URL.
    pub file_url: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl CourseUpload {
    /// Create an upload record for a stored file.
    pub fn new(
        course_id: impl Into<String>,
        file_name: impl Into<String>,
        file_size: i64,
        content_type: impl Into<String>,
        file_url: impl Into<String>,
    ) -> Self {
        Self {
            id: UploadId::new(),
            course_id: course_id.into(),
            file_name: file_name.into(),
            file_size,
            content_type: content_type.into(),
            file_url: file_url.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether the stored file is a video.
    pub fn is_video(&self) -> bool {
        self.content_type.starts_with("video/")
    }
}
