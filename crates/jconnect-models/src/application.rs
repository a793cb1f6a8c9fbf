//! Application types for jobs and internships.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique application identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    /// Generate a new random application ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ApplicationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ApplicationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Status of an application as it moves through review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Just received, not yet looked at.
    #[default]
    Submitted,
    /// Acknowledged, awaiting review.
    Pending,
    /// An employer has read it.
    Reviewed,
    /// Moved to the shortlist.
    Shortlisted,
    /// Turned down.
    Rejected,
    /// Offer made; shown as "Hired" in employer screens.
    Accepted,
    /// Withdrawn by the applicant.
    Withdrawn,
}

impl ApplicationStatus {
    /// All statuses an employer can set from the board.
    pub const EMPLOYER_CHOICES: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Accepted,
    ];

    /// Get status as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Human-readable badge label.
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Reviewed => "Reviewed",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Accepted => "Hired",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }

    /// Badge color used by status chips.
    pub fn badge_color(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "gray",
            ApplicationStatus::Pending => "yellow",
            ApplicationStatus::Reviewed => "blue",
            ApplicationStatus::Shortlisted => "green",
            ApplicationStatus::Rejected => "red",
            ApplicationStatus::Accepted => "purple",
            ApplicationStatus::Withdrawn => "gray",
        }
    }

    /// Parse from string. Unknown values map to `Submitted`.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => ApplicationStatus::Pending,
            "reviewed" => ApplicationStatus::Reviewed,
            "shortlisted" => ApplicationStatus::Shortlisted,
            "rejected" => ApplicationStatus::Rejected,
            "accepted" | "hired" => ApplicationStatus::Accepted,
            "withdrawn" => ApplicationStatus::Withdrawn,
            _ => ApplicationStatus::Submitted,
        }
    }

    /// Whether no further transitions are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected | ApplicationStatus::Accepted | ApplicationStatus::Withdrawn
        )
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An answer to one custom screening question, stored on the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionAnswer {
    /// The question text as posed.
    pub question: String,
    /// The applicant's answer.
    pub answer: String,
}

/// A job application row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Application {
    /// Row primary key.
    pub id: ApplicationId,

    /// Job applied to.
    pub job_id: String,

    /// Applicant (profile ID).
    pub applicant_id: String,

    /// Review status.
    #[serde(default)]
    pub status: ApplicationStatus,

    /// Optional cover letter text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,

    /// Answers to the job's custom questions.
    #[serde(default)]
    pub answers: Vec<QuestionAnswer>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Create a fresh application for a job.
    pub fn new(job_id: impl Into<String>, applicant_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ApplicationId::new(),
            job_id: job_id.into(),
            applicant_id: applicant_id.into(),
            status: ApplicationStatus::Submitted,
            cover_letter: None,
            answers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a cover letter.
    pub fn with_cover_letter(mut self, text: impl Into<String>) -> Self {
        self.cover_letter = Some(text.into());
        self
    }

    /// Attach screening answers.
    pub fn with_answers(mut self, answers: Vec<QuestionAnswer>) -> Self {
        self.answers = answers;
        self
    }
}

/// An internship application row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InternshipApplication {
    /// Row primary key.
    pub id: ApplicationId,

    /// Internship applied to.
    pub internship_id: String,

    /// Applicant (profile ID).
    pub applicant_id: String,

    /// Review status (shares the job application status set).
    #[serde(default)]
    pub status: ApplicationStatus,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl InternshipApplication {
    /// Create a fresh application for an internship.
    pub fn new(internship_id: impl Into<String>, applicant_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ApplicationId::new(),
            internship_id: internship_id.into(),
            applicant_id: applicant_id.into(),
            status: ApplicationStatus::Submitted,
            created_at: now,
            updated_at: now,
        }
    }
}
