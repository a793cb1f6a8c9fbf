//! Employer applications board.
//!
//! Jobs and internships take applications through separate tables; the
//! board joins both with the applicant's profile and the posting title into
//! one list. Status changes are optimistic: the new value shows
//! immediately, and a failed confirmation rolls the entry back.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use jconnect_models::{ApplicationStatus, Notification};
use jconnect_supabase::{
    ApplicationRepository, InternshipRepository, JobRepository, NotificationRepository,
    ProfileRepository, SupabaseClient,
};

use crate::error::{AppError, AppResult};

/// Which posting table a board entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingKind {
    Job,
    Internship,
}

/// One application row, joined with its applicant and posting.
#[derive(Debug, Clone)]
pub struct BoardEntry {
    pub application_id: String,
    pub kind: PostingKind,
    pub posting_title: String,
    pub applicant_id: String,
    pub applicant_name: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

impl BoardEntry {
    /// Badge text for the current status.
    pub fn badge_label(&self) -> &'static str {
        self.status.label()
    }

    /// Badge color class for the current status.
    pub fn badge_color(&self) -> &'static str {
        self.status.badge_color()
    }

    fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.applicant_name.to_lowercase().contains(&query)
            || self.posting_title.to_lowercase().contains(&query)
    }
}

/// Rollup counts shown above the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardStats {
    pub total: usize,
    counts: HashMap<ApplicationStatus, usize>,
}

impl BoardStats {
    /// How many applications hold a given status.
    pub fn count_for(&self, status: ApplicationStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }
}

/// The employer's applications board.
pub struct ApplicationBoard {
    entries: Vec<BoardEntry>,
}

impl ApplicationBoard {
    /// Assemble the board for an employer.
    ///
    /// Three rounds of fetches: the employer's postings, then their
    /// applications, then the applicant profiles. The independent fetches
    /// in each round run concurrently; any failure abandons the load.
    pub async fn load(client: &SupabaseClient, employer_id: &str) -> AppResult<Self> {
        let jobs_repo = JobRepository::new(client.clone());
        let internships_repo = InternshipRepository::new(client.clone());
        let applications_repo = ApplicationRepository::new(client.clone());
        let profiles_repo = ProfileRepository::new(client.clone());

        let (jobs, internships) = tokio::try_join!(
            jobs_repo.list_for_employer(employer_id),
            internships_repo.list_for_employer(employer_id),
        )?;

        let job_ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        let internship_ids: Vec<&str> = internships.iter().map(|i| i.id.as_str()).collect();

        let (job_apps, internship_apps) = tokio::try_join!(
            applications_repo.list_for_jobs(&job_ids),
            applications_repo.list_for_internships(&internship_ids),
        )?;

        let mut applicant_ids: HashSet<&str> = HashSet::new();
        applicant_ids.extend(job_apps.iter().map(|a| a.applicant_id.as_str()));
        applicant_ids.extend(internship_apps.iter().map(|a| a.applicant_id.as_str()));
        let applicant_ids: Vec<&str> = applicant_ids.into_iter().collect();
        let applicants = profiles_repo.list_by_ids(&applicant_ids).await?;

        let names: HashMap<&str, &str> = applicants
            .iter()
            .map(|p| (p.id.as_str(), p.full_name.as_str()))
            .collect();
        let job_titles: HashMap<&str, &str> = jobs
            .iter()
            .map(|j| (j.id.as_str(), j.job_title.as_str()))
            .collect();
        let internship_titles: HashMap<&str, &str> = internships
            .iter()
            .map(|i| (i.id.as_str(), i.title.as_str()))
            .collect();

        let mut entries = Vec::with_capacity(job_apps.len() + internship_apps.len());
        for app in &job_apps {
            entries.push(BoardEntry {
                application_id: app.id.as_str().to_string(),
                kind: PostingKind::Job,
                posting_title: title_or_placeholder(&job_titles, &app.job_id),
                applicant_id: app.applicant_id.clone(),
                applicant_name: name_or_placeholder(&names, &app.applicant_id),
                status: app.status,
                applied_at: app.created_at,
            });
        }
        for app in &internship_apps {
            entries.push(BoardEntry {
                application_id: app.id.as_str().to_string(),
                kind: PostingKind::Internship,
                posting_title: title_or_placeholder(&internship_titles, &app.internship_id),
                applicant_id: app.applicant_id.clone(),
                applicant_name: name_or_placeholder(&names, &app.applicant_id),
                status: app.status,
                applied_at: app.created_at,
            });
        }
        entries.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));

        info!(
            entries = entries.len(),
            jobs = jobs.len(),
            internships = internships.len(),
            "Applications board assembled"
        );
        Ok(Self { entries })
    }

    /// Build a board from already-joined entries.
    pub fn from_entries(mut entries: Vec<BoardEntry>) -> Self {
        entries.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Self { entries }
    }

    /// All entries, newest application first.
    pub fn entries(&self) -> &[BoardEntry] {
        &self.entries
    }

    /// Entries matching a free-text search and an optional status filter.
    ///
    /// The search covers the applicant's name and the posting title,
    /// case-insensitively; an empty query matches everything.
    pub fn filtered(
        &self,
        search: &str,
        status: Option<ApplicationStatus>,
    ) -> Vec<&BoardEntry> {
        let query = search.trim();
        self.entries
            .iter()
            .filter(|e| status.map_or(true, |s| e.status == s))
            .filter(|e| e.matches(query))
            .collect()
    }

    /// Total and per-status counts over the whole board.
    pub fn stats(&self) -> BoardStats {
        let mut counts: HashMap<ApplicationStatus, usize> = HashMap::new();
        for entry in &self.entries {
            *counts.entry(entry.status).or_insert(0) += 1;
        }
        BoardStats {
            total: self.entries.len(),
            counts,
        }
    }

    /// Change an application's status.
    ///
    /// The entry updates locally before the backend confirms. When the
    /// confirmation fails, the prior status is restored and the error
    /// propagates. On success a status notification insert is attempted
    /// once; its failure never undoes the status change.
    pub async fn change_status(
        &mut self,
        client: &SupabaseClient,
        application_id: &str,
        new_status: ApplicationStatus,
    ) -> AppResult<()> {
        let position = self
            .entries
            .iter()
            .position(|e| e.application_id == application_id)
            .ok_or_else(|| {
                AppError::missing_precondition(format!(
                    "application {} is not on the board",
                    application_id
                ))
            })?;

        let prior = self.entries[position].status;
        let kind = self.entries[position].kind;
        self.entries[position].status = new_status;

        let applications = ApplicationRepository::new(client.clone());
        let confirmed = match kind {
            PostingKind::Job => applications
                .update_status(application_id, new_status)
                .await
                .map(|_| ()),
            PostingKind::Internship => applications
                .update_internship_status(application_id, new_status)
                .await
                .map(|_| ()),
        };

        if let Err(e) = confirmed {
            self.entries[position].status = prior;
            warn!(
                %application_id,
                from = prior.as_str(),
                to = new_status.as_str(),
                error = %e,
                "Status update failed; rolled back"
            );
            return Err(e.into());
        }

        // Best-effort applicant notification; the status change stands
        // whether or not this lands.
        let entry = &self.entries[position];
        let notification = Notification::for_status_change(
            entry.applicant_id.clone(),
            &entry.posting_title,
            new_status,
        );
        let notifications = NotificationRepository::new(client.clone());
        if let Err(e) = notifications.insert(&notification).await {
            warn!(%application_id, error = %e, "Status notification was not delivered");
        }

        info!(
            %application_id,
            status = new_status.as_str(),
            "Application status changed"
        );
        Ok(())
    }
}

fn title_or_placeholder(titles: &HashMap<&str, &str>, posting_id: &str) -> String {
    titles.get(posting_id).unwrap_or(&"(removed posting)").to_string()
}

fn name_or_placeholder(names: &HashMap<&str, &str>, applicant_id: &str) -> String {
    names.get(applicant_id).unwrap_or(&"Unknown applicant").to_string()
}
