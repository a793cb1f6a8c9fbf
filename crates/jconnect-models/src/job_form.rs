//! Wizard form state and its row mapping.
//!
//! [`JobForm`] is the in-memory shape of the posting wizard: text inputs are
//! strings (numbers included, as typed), checkbox groups are string lists,
//! closed selects are enums. The entire form↔row boundary is the
//! [`JobForm::to_draft_row`] / [`JobForm::from_draft_row`] pair below, so the
//! field mapping is a single reviewable surface rather than a convention.
//! Round trips are lossless: every value written by `to_draft_row` is
//! restored exactly by `from_draft_row`.

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::draft::{DraftId, JobDraft};
use crate::job::{
    ApplicationRouting, CustomQuestion, Job, JobId, JobLocation, JobStatus, JobType, PayType,
};

/// Number-of-hires selection that triggers the free-form count input.
pub const CUSTOM_HIRES: &str = "custom";

/// In-memory state of the job posting wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobForm {
    // Step 1: details
    pub job_title: String,
    pub category: String,
    pub job_description: String,
    pub city: String,
    pub area: String,
    pub pincode: String,
    pub street_address: String,

    // Step 2: employment
    pub job_type: JobType,
    pub employment_types: Vec<String>,
    pub schedules: Vec<String>,
    /// "1".."10+", or [`CUSTOM_HIRES`].
    pub number_of_hires: String,
    /// Free-form count, used when `number_of_hires` is [`CUSTOM_HIRES`].
    pub custom_number_of_hires: String,
    pub recruitment_timeline: String,

    // Step 3: compensation
    pub pay_type: PayType,
    pub min_pay: String,
    pub max_pay: String,
    pub pay_amount: String,
    pub supplemental_pay: Vec<String>,
    pub benefits: Vec<String>,

    // Step 4: requirements
    pub education_levels: Vec<String>,
    pub english_level: String,
    pub total_experience: String,
    pub language_requirements: Vec<String>,
    pub contact_email: String,
    /// ISO date text, e.g. "2026-09-30"; empty when unset.
    pub application_deadline: String,

    // Step 5: custom questions & routing
    pub custom_questions: Vec<CustomQuestion>,
    pub application_type: ApplicationRouting,
    pub application_link: String,
    pub disclaimer_accepted: bool,
    pub notification_emails: Vec<String>,
}

impl Default for JobForm {
    fn default() -> Self {
        Self {
            job_title: String::new(),
            category: String::new(),
            job_description: String::new(),
            city: String::new(),
            area: String::new(),
            pincode: String::new(),
            street_address: String::new(),
            job_type: JobType::Onsite,
            employment_types: Vec::new(),
            schedules: Vec::new(),
            number_of_hires: "1".to_string(),
            custom_number_of_hires: String::new(),
            recruitment_timeline: String::new(),
            pay_type: PayType::Range,
            min_pay: String::new(),
            max_pay: String::new(),
            pay_amount: String::new(),
            supplemental_pay: Vec::new(),
            benefits: Vec::new(),
            education_levels: Vec::new(),
            english_level: String::new(),
            total_experience: String::new(),
            language_requirements: Vec::new(),
            contact_email: String::new(),
            application_deadline: String::new(),
            custom_questions: Vec::new(),
            application_type: ApplicationRouting::InApp,
            application_link: String::new(),
            disclaimer_accepted: false,
            notification_emails: Vec::new(),
        }
    }
}

impl JobForm {
    /// Whether any field carries user input worth saving.
    ///
    /// Saving an entirely empty form is rejected before any network call.
    /// Selections that merely equal their defaults (workplace mode, pay
    /// type, hire count "1") do not count as data.
    pub fn has_data(&self) -> bool {
        let text_fields = [
            &self.job_title,
            &self.category,
            &self.job_description,
            &self.city,
            &self.area,
            &self.pincode,
            &self.street_address,
            &self.custom_number_of_hires,
            &self.recruitment_timeline,
            &self.min_pay,
            &self.max_pay,
            &self.pay_amount,
            &self.english_level,
            &self.total_experience,
            &self.contact_email,
            &self.application_deadline,
            &self.application_link,
        ];
        if text_fields.iter().any(|f| !f.trim().is_empty()) {
            return true;
        }

        !self.employment_types.is_empty()
            || !self.schedules.is_empty()
            || !self.supplemental_pay.is_empty()
            || !self.benefits.is_empty()
            || !self.education_levels.is_empty()
            || !self.language_requirements.is_empty()
            || !self.custom_questions.is_empty()
            || !self.notification_emails.is_empty()
    }

    /// Map this form into a fresh draft row for the given user.
    ///
    /// Numeric text inputs become nullable numeric columns (empty or
    /// unparseable → null); the deadline text becomes a date column; empty
    /// optional text fields become nulls.
    pub fn to_draft_row(&self, user_id: impl Into<String>) -> JobDraft {
        let now = Utc::now();
        JobDraft {
            id: DraftId::new(),
            user_id: user_id.into(),
            job_title: self.job_title.clone(),
            category: self.category.clone(),
            job_description: self.job_description.clone(),
            city: self.city.clone(),
            area: self.area.clone(),
            pincode: self.pincode.clone(),
            street_address: self.street_address.clone(),
            job_type: self.job_type,
            employment_types: self.employment_types.clone(),
            schedules: self.schedules.clone(),
            number_of_hires: opt_text(&self.number_of_hires),
            custom_number_of_hires: parse_opt_i64(&self.custom_number_of_hires),
            recruitment_timeline: opt_text(&self.recruitment_timeline),
            pay_type: self.pay_type,
            min_pay: parse_opt_i64(&self.min_pay),
            max_pay: parse_opt_i64(&self.max_pay),
            pay_amount: parse_opt_i64(&self.pay_amount),
            supplemental_pay: self.supplemental_pay.clone(),
            benefits: self.benefits.clone(),
            education_levels: self.education_levels.clone(),
            english_level: opt_text(&self.english_level),
            total_experience: opt_text(&self.total_experience),
            language_requirements: self.language_requirements.clone(),
            contact_email: opt_text(&self.contact_email),
            application_deadline: parse_opt_date(&self.application_deadline),
            custom_questions: self.custom_questions.clone(),
            application_type: self.application_type,
            application_link: opt_text(&self.application_link),
            notification_emails: self.notification_emails.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Restore form state from a saved draft row.
    ///
    /// Nulls become empty strings; a missing hire-count selection falls back
    /// to the form default of "1".
    pub fn from_draft_row(row: &JobDraft) -> Self {
        Self {
            job_title: row.job_title.clone(),
            category: row.category.clone(),
            job_description: row.job_description.clone(),
            city: row.city.clone(),
            area: row.area.clone(),
            pincode: row.pincode.clone(),
            street_address: row.street_address.clone(),
            job_type: row.job_type,
            employment_types: row.employment_types.clone(),
            schedules: row.schedules.clone(),
            number_of_hires: row
                .number_of_hires
                .clone()
                .unwrap_or_else(|| "1".to_string()),
            custom_number_of_hires: render_opt_i64(row.custom_number_of_hires),
            recruitment_timeline: text_or_empty(&row.recruitment_timeline),
            pay_type: row.pay_type,
            min_pay: render_opt_i64(row.min_pay),
            max_pay: render_opt_i64(row.max_pay),
            pay_amount: render_opt_i64(row.pay_amount),
            supplemental_pay: row.supplemental_pay.clone(),
            benefits: row.benefits.clone(),
            education_levels: row.education_levels.clone(),
            english_level: text_or_empty(&row.english_level),
            total_experience: text_or_empty(&row.total_experience),
            language_requirements: row.language_requirements.clone(),
            contact_email: text_or_empty(&row.contact_email),
            application_deadline: row
                .application_deadline
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            custom_questions: row.custom_questions.clone(),
            application_type: row.application_type,
            application_link: text_or_empty(&row.application_link),
            disclaimer_accepted: false,
            notification_emails: row.notification_emails.clone(),
        }
    }

    /// Resolved opening count from the hire-count selection.
    pub fn openings(&self) -> u32 {
        if self.number_of_hires == CUSTOM_HIRES {
            self.custom_number_of_hires.trim().parse().unwrap_or(1)
        } else {
            // Presets like "10+" keep their leading number
            self.number_of_hires
                .trim_end_matches('+')
                .parse()
                .unwrap_or(1)
        }
    }

    /// Map a completed, validated form into a job row ready for insert.
    pub fn to_job_row(&self, company_id: impl Into<String>, employer_id: impl Into<String>) -> Job {
        let now = Utc::now();
        Job {
            id: JobId::new(),
            company_id: company_id.into(),
            employer_id: employer_id.into(),
            job_title: self.job_title.clone(),
            category: self.category.clone(),
            job_description: self.job_description.clone(),
            location: JobLocation {
                city: self.city.clone(),
                area: self.area.clone(),
                pincode: self.pincode.clone(),
                street_address: self.street_address.clone(),
            },
            job_type: self.job_type,
            employment_types: self.employment_types.clone(),
            schedules: self.schedules.clone(),
            openings: self.openings(),
            recruitment_timeline: opt_text(&self.recruitment_timeline),
            pay_type: self.pay_type,
            min_pay: parse_opt_i64(&self.min_pay),
            max_pay: parse_opt_i64(&self.max_pay),
            pay_amount: parse_opt_i64(&self.pay_amount),
            supplemental_pay: self.supplemental_pay.clone(),
            benefits: self.benefits.clone(),
            education_levels: self.education_levels.clone(),
            english_level: opt_text(&self.english_level),
            total_experience: opt_text(&self.total_experience),
            language_requirement: if self.language_requirements.is_empty() {
                None
            } else {
                Some(self.language_requirements.join(", "))
            },
            contact_email: opt_text(&self.contact_email),
            application_deadline: parse_opt_date(&self.application_deadline),
            custom_questions: self.custom_questions.clone(),
            notification_emails: self.notification_emails.clone(),
            application_type: self.application_type,
            application_link: opt_text(&self.application_link),
            status: JobStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Empty or whitespace-only text becomes a null column.
fn opt_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Null column becomes empty text.
fn text_or_empty(s: &Option<String>) -> String {
    s.clone().unwrap_or_default()
}

/// Numeric text input to nullable column; empty or unparseable is null.
fn parse_opt_i64(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Nullable numeric column back to text input.
fn render_opt_i64(v: Option<i64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

/// Date text input ("YYYY-MM-DD") to nullable date column.
fn parse_opt_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Whether a deadline date is strictly in the future relative to `now`.
pub fn deadline_is_future(deadline: NaiveDate, now: DateTime<Utc>) -> bool {
    deadline > now.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> JobForm {
        JobForm {
            job_title: "Store Manager".to_string(),
            category: "Retail".to_string(),
            job_description: "Run the Andheri store.".to_string(),
            city: "Mumbai".to_string(),
            area: "Andheri".to_string(),
            pincode: "400053".to_string(),
            street_address: "12 Link Road".to_string(),
            job_type: JobType::Onsite,
            employment_types: vec!["Full-time".to_string()],
            schedules: vec!["Day shift".to_string(), "Weekend availability".to_string()],
            number_of_hires: CUSTOM_HIRES.to_string(),
            custom_number_of_hires: "12".to_string(),
            recruitment_timeline: "1 to 3 days".to_string(),
            pay_type: PayType::Range,
            min_pay: "18000".to_string(),
            max_pay: "26000".to_string(),
            pay_amount: String::new(),
            supplemental_pay: vec!["Performance bonus".to_string()],
            benefits: vec!["Health insurance".to_string()],
            education_levels: vec!["Graduate".to_string()],
            english_level: "Good English".to_string(),
            total_experience: "2-4 years".to_string(),
            language_requirements: vec!["Hindi".to_string(), "English".to_string()],
            contact_email: "hiring@store.example".to_string(),
            application_deadline: "2027-01-31".to_string(),
            custom_questions: vec![CustomQuestion::text("Why retail?", true)],
            application_type: ApplicationRouting::InApp,
            application_link: String::new(),
            disclaimer_accepted: false,
            notification_emails: vec!["ops@store.example".to_string()],
        }
    }

    #[test]
    fn test_empty_form_has_no_data() {
        assert!(!JobForm::default().has_data());
    }

    #[test]
    fn test_single_field_counts_as_data() {
        let mut form = JobForm::default();
        form.city = "Mumbai".to_string();
        assert!(form.has_data());

        let mut form = JobForm::default();
        form.benefits.push("Health insurance".to_string());
        assert!(form.has_data());
    }

    #[test]
    fn test_whitespace_only_is_not_data() {
        let mut form = JobForm::default();
        form.job_title = "   ".to_string();
        assert!(!form.has_data());
    }

    #[test]
    fn test_draft_round_trip_is_lossless() {
        let form = filled_form();
        let row = form.to_draft_row("user-1");
        let restored = JobForm::from_draft_row(&row);
        assert_eq!(restored, form);
    }

    #[test]
    fn test_default_round_trip_restores_defaults() {
        let form = JobForm::default();
        let row = form.to_draft_row("user-1");
        assert!(row.min_pay.is_none());
        assert!(row.contact_email.is_none());
        assert_eq!(row.number_of_hires.as_deref(), Some("1"));

        let restored = JobForm::from_draft_row(&row);
        assert_eq!(restored, form);
    }

    #[test]
    fn test_numeric_text_maps_to_nullable_columns() {
        let mut form = JobForm::default();
        form.min_pay = "25000".to_string();
        form.max_pay = String::new();
        let row = form.to_draft_row("user-1");
        assert_eq!(row.min_pay, Some(25_000));
        assert_eq!(row.max_pay, None);

        let restored = JobForm::from_draft_row(&row);
        assert_eq!(restored.min_pay, "25000");
        assert_eq!(restored.max_pay, "");
    }

    #[test]
    fn test_unparseable_numeric_text_becomes_null() {
        let mut form = JobForm::default();
        form.min_pay = "twenty".to_string();
        let row = form.to_draft_row("user-1");
        assert_eq!(row.min_pay, None);
    }

    #[test]
    fn test_openings_resolution() {
        let mut form = JobForm::default();
        assert_eq!(form.openings(), 1);

        form.number_of_hires = "4".to_string();
        assert_eq!(form.openings(), 4);

        form.number_of_hires = "10+".to_string();
        assert_eq!(form.openings(), 10);

        form.number_of_hires = CUSTOM_HIRES.to_string();
        form.custom_number_of_hires = "25".to_string();
        assert_eq!(form.openings(), 25);

        form.custom_number_of_hires = "junk".to_string();
        assert_eq!(form.openings(), 1);
    }

    #[test]
    fn test_to_job_row_joins_languages_and_builds_location() {
        let form = filled_form();
        let job = form.to_job_row("company-9", "employer-3");
        assert_eq!(job.location.city, "Mumbai");
        assert_eq!(job.location.pincode, "400053");
        assert_eq!(job.language_requirement.as_deref(), Some("Hindi, English"));
        assert_eq!(job.openings, 12);
        assert_eq!(job.status, JobStatus::Active);
        assert_eq!(job.min_pay, Some(18_000));
        assert_eq!(
            job.application_deadline,
            NaiveDate::from_ymd_opt(2027, 1, 31)
        );
    }

    #[test]
    fn test_deadline_is_future() {
        let now = Utc::now();
        let tomorrow = now.date_naive() + chrono::Duration::days(1);
        let yesterday = now.date_naive() - chrono::Duration::days(1);
        assert!(deadline_is_future(tomorrow, now));
        assert!(!deadline_is_future(yesterday, now));
        assert!(!deadline_is_future(now.date_naive(), now));
    }
}
