//! Internship posting types.
//!
//! Internships parallel jobs but carry a duration and stipend instead of a
//! salary, and collect their own application rows.

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::job::{JobStatus, JobType};

/// Unique internship identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct InternshipId(pub String);

impl InternshipId {
    /// Generate a new random internship ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for InternshipId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InternshipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for InternshipId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An internship posting row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Internship {
    /// Row primary key.
    pub id: InternshipId,

    /// Company this internship belongs to.
    pub company_id: String,

    /// Employer (profile ID) who posted it.
    pub employer_id: String,

    /// Internship title.
    pub title: String,

    /// Category label.
    pub category: String,

    /// Full description text.
    #[serde(default)]
    pub description: String,

    /// Workplace mode.
    #[serde(default)]
    pub internship_type: JobType,

    /// City the internship is based in.
    #[serde(default)]
    pub city: String,

    /// Duration, e.g. "3 months".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Monthly stipend in rupees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stipend: Option<i64>,

    /// Number of openings.
    #[serde(default = "default_openings")]
    pub openings: u32,

    /// Last date applications are accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,

    /// Lifecycle status (shares the job status set).
    #[serde(default)]
    pub status: JobStatus,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn default_openings() -> u32 {
    1
}

impl Internship {
    /// Stipend rendered for display.
    pub fn stipend_display(&self) -> String {
        match self.stipend {
            Some(amount) => format!("₹{}/month", amount),
            None => "Unpaid".to_string(),
        }
    }
}
