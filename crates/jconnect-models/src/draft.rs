//! Job draft persistence types.
//!
//! A draft is a partially-filled job posting saved for later resumption.
//! Drafts are capped at [`MAX_DRAFTS_PER_USER`] per user and expire
//! [`DRAFT_TTL_DAYS`] days after their last update; both rules are enforced
//! server-side and surfaced to the user when violated.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::job::{ApplicationRouting, CustomQuestion, JobType, PayType};

/// Maximum number of drafts a single user may hold.
pub const MAX_DRAFTS_PER_USER: usize = 5;

/// Days after the last update before a draft expires.
pub const DRAFT_TTL_DAYS: i64 = 7;

/// Unique draft identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DraftId(pub String);

impl DraftId {
    /// Generate a new random draft ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DraftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DraftId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A saved job draft row.
///
/// Column shape mirrors the wizard's form state with numeric text inputs
/// parsed into nullable numeric columns. The bidirectional mapping lives on
/// [`crate::job_form::JobForm`] so the whole boundary is reviewable in one
/// place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobDraft {
    /// Row primary key.
    pub id: DraftId,

    /// Owning user (profile ID).
    pub user_id: String,

    /// Job title, possibly empty in a draft.
    #[serde(default)]
    pub job_title: String,

    /// Category label.
    #[serde(default)]
    pub category: String,

    /// Description text.
    #[serde(default)]
    pub job_description: String,

    /// City.
    #[serde(default)]
    pub city: String,

    /// Area within the city.
    #[serde(default)]
    pub area: String,

    /// Six-digit postal code (unvalidated in drafts).
    #[serde(default)]
    pub pincode: String,

    /// Street address line.
    #[serde(default)]
    pub street_address: String,

    /// Workplace mode.
    #[serde(default)]
    pub job_type: JobType,

    /// Selected employment types.
    #[serde(default)]
    pub employment_types: Vec<String>,

    /// Selected schedule options.
    #[serde(default)]
    pub schedules: Vec<String>,

    /// Number-of-hires selection ("1".."10+", or "custom").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_hires: Option<String>,

    /// Custom hire count when `number_of_hires` is "custom".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_number_of_hires: Option<i64>,

    /// Hiring urgency window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruitment_timeline: Option<String>,

    /// How compensation is expressed.
    #[serde(default)]
    pub pay_type: PayType,

    /// Lower pay bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pay: Option<i64>,

    /// Upper pay bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pay: Option<i64>,

    /// Fixed pay amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_amount: Option<i64>,

    /// Supplemental pay entries.
    #[serde(default)]
    pub supplemental_pay: Vec<String>,

    /// Offered benefits.
    #[serde(default)]
    pub benefits: Vec<String>,

    /// Accepted education levels.
    #[serde(default)]
    pub education_levels: Vec<String>,

    /// Required English proficiency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_level: Option<String>,

    /// Required total experience bracket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_experience: Option<String>,

    /// Required languages.
    #[serde(default)]
    pub language_requirements: Vec<String>,

    /// Contact email for applicant updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,

    /// Application deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,

    /// Custom screening questions.
    #[serde(default)]
    pub custom_questions: Vec<CustomQuestion>,

    /// How applicants apply.
    #[serde(default)]
    pub application_type: ApplicationRouting,

    /// External application URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_link: Option<String>,

    /// Additional notification emails.
    #[serde(default)]
    pub notification_emails: Vec<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp; drives the expiry window.
    pub updated_at: DateTime<Utc>,
}

impl JobDraft {
    /// Whether this draft has passed its expiry window as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.updated_at > Duration::days(DRAFT_TTL_DAYS)
    }

    /// When this draft will expire.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.updated_at + Duration::days(DRAFT_TTL_DAYS)
    }

    /// Short label for draft lists: the title, or a placeholder.
    pub fn display_title(&self) -> &str {
        if self.job_title.is_empty() {
            "Untitled draft"
        } else {
            &self.job_title
        }
    }
}
