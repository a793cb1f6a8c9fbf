//! The seven-step job posting wizard.
//!
//! State machine semantics: the step index is the only cursor, moving
//! strictly forward and backward. Advancing runs the current step's
//! validator and is blocked while any field fails; the summary leads into
//! payment, and submission stays blocked until checkout completion has been
//! recorded. Submission inserts exactly one job row.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use jconnect_models::{
    deadline_is_future, is_valid_email, is_valid_http_url, is_valid_pincode, ApplicationRouting,
    Company, Job, JobDraft, JobForm, PayType, Profile, CUSTOM_HIRES,
};
use jconnect_supabase::{DraftRepository, JobRepository, SupabaseClient};

use crate::error::{AppError, AppResult, FieldErrors};

/// Wizard steps in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Title, category, and location.
    Details,
    /// Employment types, schedules, and hire count.
    Employment,
    /// Pay structure.
    Compensation,
    /// Education, experience, languages, contact, deadline.
    Requirements,
    /// Screening questions and application routing.
    CustomQuestions,
    /// Read-only review of everything entered.
    Summary,
    /// Plan selection and checkout.
    Payment,
}

impl WizardStep {
    /// Every step in wizard order.
    pub const ALL: [WizardStep; 7] = [
        WizardStep::Details,
        WizardStep::Employment,
        WizardStep::Compensation,
        WizardStep::Requirements,
        WizardStep::CustomQuestions,
        WizardStep::Summary,
        WizardStep::Payment,
    ];

    /// Zero-based position in the sequence.
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    fn following(&self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn preceding(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }
}

/// In-progress job posting.
#[derive(Debug)]
pub struct JobWizard {
    form: JobForm,
    step: WizardStep,
    payment_success: bool,
    resumed_draft: Option<String>,
    company_id: String,
    employer_id: String,
}

impl JobWizard {
    /// Open the wizard for an employer.
    ///
    /// Jobs reference a company row, so the wizard refuses to open until
    /// the employer has created one.
    pub fn open(employer: &Profile, company: Option<&Company>) -> AppResult<Self> {
        let company = company.ok_or_else(|| {
            AppError::missing_precondition("create a company profile before posting a job")
        })?;
        Ok(Self {
            form: JobForm::default(),
            step: WizardStep::Details,
            payment_success: false,
            resumed_draft: None,
            company_id: company.id.as_str().to_string(),
            employer_id: employer.id.as_str().to_string(),
        })
    }

    /// Open the wizard with a saved draft loaded into the form.
    pub fn open_with_draft(
        employer: &Profile,
        company: Option<&Company>,
        draft: &JobDraft,
    ) -> AppResult<Self> {
        let mut wizard = Self::open(employer, company)?;
        wizard.form = JobForm::from_draft_row(draft);
        wizard.resumed_draft = Some(draft.id.as_str().to_string());
        Ok(wizard)
    }

    /// The step currently shown.
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Read access to the form state.
    pub fn form(&self) -> &JobForm {
        &self.form
    }

    /// Mutable access to the form state, for field edits.
    pub fn form_mut(&mut self) -> &mut JobForm {
        &mut self.form
    }

    /// Whether checkout has completed for this posting.
    pub fn payment_succeeded(&self) -> bool {
        self.payment_success
    }

    /// The draft this wizard was resumed from, when any.
    pub fn resumed_draft(&self) -> Option<&str> {
        self.resumed_draft.as_deref()
    }

    /// Run the current step's validator without moving.
    pub fn validate_current(&self) -> FieldErrors {
        match self.step {
            WizardStep::Details => validate_details(&self.form),
            WizardStep::Employment => validate_employment(&self.form),
            WizardStep::Compensation => validate_compensation(&self.form),
            WizardStep::Requirements => validate_requirements(&self.form),
            WizardStep::CustomQuestions => validate_routing(&self.form),
            WizardStep::Summary | WizardStep::Payment => FieldErrors::new(),
        }
    }

    /// Advance to the next step.
    ///
    /// When the current step fails validation the step does not move and
    /// the field errors come back in the error.
    pub fn next(&mut self) -> AppResult<WizardStep> {
        let errors = self.validate_current();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        if let Some(next) = self.step.following() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Step back without validation; a no-op on the first step.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.preceding() {
            self.step = previous;
        }
        self.step
    }

    /// Record that checkout completed; unblocks submission.
    pub fn mark_payment_success(&mut self) {
        self.payment_success = true;
    }

    /// Submit the finished posting.
    ///
    /// Requires the payment step with checkout recorded. Inserts exactly
    /// one job row; on success the draft this wizard was resumed from (if
    /// any) is deleted. A failed insert leaves the form and draft intact so
    /// the employer can retry.
    pub async fn submit(&mut self, client: &SupabaseClient) -> AppResult<Job> {
        if self.step != WizardStep::Payment {
            return Err(AppError::missing_precondition(
                "the wizard has not reached the payment step",
            ));
        }
        if !self.payment_success {
            return Err(AppError::missing_precondition(
                "payment has not completed for this posting",
            ));
        }

        let row = self
            .form
            .to_job_row(self.company_id.as_str(), self.employer_id.as_str());
        let jobs = JobRepository::new(client.clone());
        let stored = jobs.insert(&row).await?;
        info!(job_id = %stored.id, title = %stored.job_title, "Job posted");

        if let Some(draft_id) = self.resumed_draft.take() {
            let drafts = DraftRepository::new(client.clone(), self.employer_id.clone());
            if let Err(e) = drafts.delete(&draft_id).await {
                warn!(%draft_id, error = %e, "Could not clear resumed draft after posting");
            }
        }

        Ok(stored)
    }
}

// =============================================================================
// Step validators
// =============================================================================

fn validate_details(form: &JobForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if form.job_title.trim().is_empty() {
        errors.add("job_title", "Job title is required");
    }
    if form.category.trim().is_empty() {
        errors.add("category", "Category is required");
    }
    if form.city.trim().is_empty() {
        errors.add("city", "City is required");
    }
    if form.area.trim().is_empty() {
        errors.add("area", "Area is required");
    }
    if !is_valid_pincode(form.pincode.trim()) {
        errors.add("pincode", "Enter a valid 6-digit pincode");
    }
    errors
}

fn validate_employment(form: &JobForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if form.employment_types.is_empty() {
        errors.add("employment_types", "Select at least one employment type");
    }
    if form.schedules.is_empty() {
        errors.add("schedules", "Select at least one schedule");
    }
    if form.number_of_hires.trim().is_empty() {
        errors.add("number_of_hires", "Select the number of hires");
    } else if form.number_of_hires == CUSTOM_HIRES {
        match form.custom_number_of_hires.trim().parse::<u32>() {
            Ok(n) if n > 0 => {}
            _ => errors.add(
                "custom_number_of_hires",
                "Enter a positive number of hires",
            ),
        }
    }
    errors
}

fn validate_compensation(form: &JobForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match form.pay_type {
        PayType::Range => {
            let min = parse_amount(&form.min_pay);
            let max = parse_amount(&form.max_pay);
            if min.is_none() {
                errors.add("min_pay", "Minimum pay is required");
            }
            if max.is_none() {
                errors.add("max_pay", "Maximum pay is required");
            }
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    errors.add("min_pay", "Minimum pay cannot exceed maximum pay");
                }
            }
        }
        PayType::FixedAmount => {
            if parse_amount(&form.pay_amount).is_none() {
                errors.add("pay_amount", "Pay amount is required");
            }
        }
    }
    errors
}

fn validate_requirements(form: &JobForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if form.education_levels.is_empty() {
        errors.add("education_levels", "Select at least one education level");
    }
    if form.english_level.trim().is_empty() {
        errors.add("english_level", "Select an English level");
    }
    if form.total_experience.trim().is_empty() {
        errors.add("total_experience", "Select the required experience");
    }
    if !is_valid_email(form.contact_email.trim()) {
        errors.add("contact_email", "Enter a valid contact email");
    }
    let deadline = form.application_deadline.trim();
    if !deadline.is_empty() {
        match NaiveDate::parse_from_str(deadline, "%Y-%m-%d") {
            Ok(date) if deadline_is_future(date, Utc::now()) => {}
            Ok(_) => errors.add("application_deadline", "The deadline must be in the future"),
            Err(_) => errors.add("application_deadline", "Enter the deadline as YYYY-MM-DD"),
        }
    }
    errors
}

fn validate_routing(form: &JobForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if form.application_type == ApplicationRouting::ExternalLink {
        let link = form.application_link.trim();
        if link.is_empty() {
            errors.add("application_link", "Provide the external application link");
        } else if !is_valid_http_url(link) {
            errors.add(
                "application_link",
                "Enter a complete link starting with http:// or https://",
            );
        }
        if !form.disclaimer_accepted {
            errors.add(
                "disclaimer_accepted",
                "Accept the disclaimer to use an external link",
            );
        }
    }
    errors
}

/// Parse a numeric text input; empty and non-numeric both count as absent.
fn parse_amount(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}
