//! Job posting types.

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle status of a posted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Visible to job seekers and accepting applications.
    #[default]
    Active,
    /// Temporarily hidden by the owner.
    Paused,
    /// No longer accepting applications.
    Closed,
}

impl JobStatus {
    /// Get status as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Paused => "paused",
            JobStatus::Closed => "closed",
        }
    }

    /// Parse from string. Unknown values map to `Closed`.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "active" => JobStatus::Active,
            "paused" => JobStatus::Paused,
            _ => JobStatus::Closed,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Workplace mode for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    Onsite,
    Remote,
    Hybrid,
}

impl JobType {
    /// Get job type as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Onsite => "onsite",
            JobType::Remote => "remote",
            JobType::Hybrid => "hybrid",
        }
    }

    /// Parse from string. Unknown values map to `Onsite` (the form default).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "remote" => JobType::Remote,
            "hybrid" => JobType::Hybrid,
            _ => JobType::Onsite,
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How applicants apply to a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationRouting {
    /// Applications are collected inside the app.
    #[default]
    InApp,
    /// Applicants are sent to an external careers page.
    ExternalLink,
}

impl ApplicationRouting {
    /// Get routing mode as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationRouting::InApp => "in_app",
            ApplicationRouting::ExternalLink => "external_link",
        }
    }

    /// Parse from string. Unknown values map to `InApp`.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "external_link" => ApplicationRouting::ExternalLink,
            _ => ApplicationRouting::InApp,
        }
    }
}

/// How compensation is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum PayType {
    /// Minimum and maximum bounds.
    #[default]
    Range,
    /// A single fixed amount.
    FixedAmount,
}

impl PayType {
    /// Get pay type as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayType::Range => "range",
            PayType::FixedAmount => "fixed_amount",
        }
    }

    /// Parse from string. Unknown values map to `Range`.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "fixed_amount" => PayType::FixedAmount,
            _ => PayType::Range,
        }
    }
}

/// Structured job location, stored as an embedded object on the job row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobLocation {
    /// City name.
    pub city: String,
    /// Area or neighbourhood within the city.
    pub area: String,
    /// Six-digit postal code.
    pub pincode: String,
    /// Street address line.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub street_address: String,
}

/// Answer shape for a custom screening question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Free-text answer.
    #[default]
    Text,
    /// Yes/no answer.
    YesNo,
    /// One of a fixed set of options.
    MultipleChoice,
}

impl QuestionKind {
    /// Get kind as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Text => "text",
            QuestionKind::YesNo => "yes_no",
            QuestionKind::MultipleChoice => "multiple_choice",
        }
    }
}

/// A custom screening question embedded on the job row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CustomQuestion {
    /// Question text shown to the applicant.
    pub question: String,
    /// Expected answer shape.
    #[serde(default)]
    pub kind: QuestionKind,
    /// Whether an answer is required to apply.
    #[serde(default)]
    pub required: bool,
    /// Options for multiple-choice questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl CustomQuestion {
    /// Create a free-text question.
    pub fn text(question: impl Into<String>, required: bool) -> Self {
        Self {
            question: question.into(),
            kind: QuestionKind::Text,
            required,
            options: Vec::new(),
        }
    }

    /// Create a multiple-choice question.
    pub fn multiple_choice(
        question: impl Into<String>,
        options: Vec<String>,
        required: bool,
    ) -> Self {
        Self {
            question: question.into(),
            kind: QuestionKind::MultipleChoice,
            required,
            options,
        }
    }
}

/// A posted job row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Row primary key.
    pub id: JobId,

    /// Company this job belongs to.
    pub company_id: String,

    /// Employer (profile ID) who posted it.
    pub employer_id: String,

    /// Job title.
    pub job_title: String,

    /// Category label, e.g. "Engineering".
    pub category: String,

    /// Full description text.
    #[serde(default)]
    pub job_description: String,

    /// Structured location.
    pub location: JobLocation,

    /// Workplace mode.
    #[serde(default)]
    pub job_type: JobType,

    /// Selected employment types, e.g. "Full-time".
    #[serde(default)]
    pub employment_types: Vec<String>,

    /// Selected schedule options, e.g. "Day shift".
    #[serde(default)]
    pub schedules: Vec<String>,

    /// Number of openings.
    #[serde(default = "default_openings")]
    pub openings: u32,

    /// Hiring urgency window, e.g. "1 to 3 days".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruitment_timeline: Option<String>,

    /// How compensation is expressed.
    #[serde(default)]
    pub pay_type: PayType,

    /// Lower bound for range pay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pay: Option<i64>,

    /// Upper bound for range pay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pay: Option<i64>,

    /// Amount for fixed pay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_amount: Option<i64>,

    /// Supplemental pay entries, e.g. "Performance bonus".
    #[serde(default)]
    pub supplemental_pay: Vec<String>,

    /// Offered benefits, e.g. "Health insurance".
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

    /// Required languages joined as a single display string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_requirement: Option<String>,

    /// Contact email for applicant updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,

    /// Last date applications are accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,

    /// Custom screening questions.
    #[serde(default)]
    pub custom_questions: Vec<CustomQuestion>,

    /// Additional emails notified of new applications.
    #[serde(default)]
    pub notification_emails: Vec<String>,

    /// How applicants apply.
    #[serde(default)]
    pub application_type: ApplicationRouting,

    /// External application URL when routing is `ExternalLink`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_link: Option<String>,

    /// Lifecycle status.
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

impl Job {
    /// Whether the job currently accepts applications.
    pub fn is_accepting_applications(&self) -> bool {
        self.status == JobStatus::Active
    }

    /// Compensation rendered for display, e.g. "₹25000 – ₹40000".
    pub fn pay_display(&self) -> String {
        match self.pay_type {
            PayType::Range => match (self.min_pay, self.max_pay) {
                (Some(min), Some(max)) => format!("₹{} – ₹{}", min, max),
                (Some(min), None) => format!("From ₹{}", min),
                (None, Some(max)) => format!("Up to ₹{}", max),
                (None, None) => "Not disclosed".to_string(),
            },
            PayType::FixedAmount => match self.pay_amount {
                Some(amount) => format!("₹{}", amount),
                None => "Not disclosed".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> Job {
        let now = Utc::now();
        Job {
            id: JobId::new(),
            company_id: "c-1".to_string(),
            employer_id: "e-1".to_string(),
            job_title: "Backend Engineer".to_string(),
            category: "Engineering".to_string(),
            job_description: "Build services".to_string(),
            location: JobLocation {
                city: "Mumbai".to_string(),
                area: "Andheri".to_string(),
                pincode: "400053".to_string(),
                street_address: String::new(),
            },
            job_type: JobType::Onsite,
            employment_types: vec!["Full-time".to_string()],
            schedules: vec!["Day shift".to_string()],
            openings: 2,
            recruitment_timeline: Some("1 to 3 days".to_string()),
            pay_type: PayType::Range,
            min_pay: Some(25_000),
            max_pay: Some(40_000),
            pay_amount: None,
            supplemental_pay: Vec::new(),
            benefits: vec!["Health insurance".to_string()],
            education_levels: vec!["Graduate".to_string()],
            english_level: Some("Good English".to_string()),
            total_experience: Some("2-4 years".to_string()),
            language_requirement: Some("Hindi, English".to_string()),
            contact_email: Some("jobs@acme.example".to_string()),
            application_deadline: None,
            custom_questions: Vec::new(),
            notification_emails: Vec::new(),
            application_type: ApplicationRouting::InApp,
            application_link: None,
            status: JobStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(JobStatus::from_str("active"), JobStatus::Active);
        assert_eq!(JobStatus::from_str("paused"), JobStatus::Paused);
        assert_eq!(JobStatus::from_str("closed"), JobStatus::Closed);
        assert_eq!(JobStatus::from_str("garbage"), JobStatus::Closed);
        assert_eq!(JobStatus::Paused.as_str(), "paused");
    }

    #[test]
    fn test_job_type_defaults_to_onsite() {
        assert_eq!(JobType::from_str("remote"), JobType::Remote);
        assert_eq!(JobType::from_str("unknown"), JobType::Onsite);
        assert_eq!(JobType::default(), JobType::Onsite);
    }

    #[test]
    fn test_serde_snake_case_enums() {
        assert_eq!(
            serde_json::to_string(&ApplicationRouting::ExternalLink).unwrap(),
            "\"external_link\""
        );
        assert_eq!(
            serde_json::to_string(&PayType::FixedAmount).unwrap(),
            "\"fixed_amount\""
        );
    }

    #[test]
    fn test_location_serializes_as_embedded_object() {
        let job = sample_job();
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["location"]["city"], "Mumbai");
        assert_eq!(value["location"]["pincode"], "400053");
        // Empty street address is omitted entirely
        assert!(value["location"].get("street_address").is_none());
    }

    #[test]
    fn test_pay_display_variants() {
        let mut job = sample_job();
        assert_eq!(job.pay_display(), "₹25000 – ₹40000");

        job.pay_type = PayType::FixedAmount;
        job.pay_amount = Some(30_000);
        assert_eq!(job.pay_display(), "₹30000");

        job.pay_amount = None;
        assert_eq!(job.pay_display(), "Not disclosed");
    }

    #[test]
    fn test_accepting_applications_only_when_active() {
        let mut job = sample_job();
        assert!(job.is_accepting_applications());
        job.status = JobStatus::Paused;
        assert!(!job.is_accepting_applications());
        job.status = JobStatus::Closed;
        assert!(!job.is_accepting_applications());
    }

    #[test]
    fn test_custom_question_constructors() {
        let q = CustomQuestion::text("Why this role?", true);
        assert_eq!(q.kind, QuestionKind::Text);
        assert!(q.required);
        assert!(q.options.is_empty());

        let mc = CustomQuestion::multiple_choice(
            "Notice period?",
            vec!["Immediate".to_string(), "30 days".to_string()],
            false,
        );
        assert_eq!(mc.kind, QuestionKind::MultipleChoice);
        assert_eq!(mc.options.len(), 2);
    }
}
