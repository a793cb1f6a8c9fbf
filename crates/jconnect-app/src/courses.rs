//! Course creation, marketplace, and enrollment flows.
//!
//! Employers build courses through a six-step wizard that uploads assets to
//! storage as it goes; publishing inserts the course row plus one upload
//! row per staged file. Learners browse the marketplace, wishlist courses,
//! and enroll (directly for free courses, after checkout for priced ones).

use std::collections::HashSet;

use chrono::Utc;
use tracing::{info, warn};

use jconnect_models::{
    is_valid_http_url, video_lock_status, Course, CourseFavorite, CourseId, CourseNotification,
    CourseStatus, CourseUpload, Enrollment, Profile,
};
use jconnect_supabase::{
    CourseRepository, EnrollmentRepository, ProfileRepository, SupabaseClient,
};

use crate::error::{AppError, AppResult, FieldErrors};

/// Storage bucket holding course covers and content files.
pub const COURSE_ASSETS_BUCKET: &str = "course-assets";

/// Minimum length of a course description, in characters.
pub const MIN_DESCRIPTION_CHARS: usize = 50;

/// Course wizard steps in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStep {
    /// Title and category.
    Basics,
    /// Long description.
    Description,
    /// Cover photo upload.
    Cover,
    /// Content files or an external course link.
    Content,
    /// Free/paid and the price.
    Pricing,
    /// Read-only review before publishing.
    Review,
}

impl CourseStep {
    /// Every step in wizard order.
    pub const ALL: [CourseStep; 6] = [
        CourseStep::Basics,
        CourseStep::Description,
        CourseStep::Cover,
        CourseStep::Content,
        CourseStep::Pricing,
        CourseStep::Review,
    ];

    /// Zero-based position in the sequence.
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    fn following(&self) -> Option<CourseStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn preceding(&self) -> Option<CourseStep> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }
}

/// A file already uploaded to storage, waiting for the course row.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub file_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub file_url: String,
}

impl StagedFile {
    /// Whether the staged file is a video.
    pub fn is_video(&self) -> bool {
        self.content_type.starts_with("video/")
    }
}

/// Form state for the course wizard.
#[derive(Debug, Clone, Default)]
pub struct CourseForm {
    pub title: String,
    pub category: String,
    pub description: String,
    pub cover_photo_url: Option<String>,
    pub staged_files: Vec<StagedFile>,
    /// External course link, for content hosted elsewhere.
    pub course_link: String,
    /// Where learners land after enrolling, when not in-app.
    pub redirect_link: String,
    pub is_free: bool,
    /// Price in rupees, as typed.
    pub price: String,
    /// Gate content behind per-learner employer approval.
    pub manual_approval: bool,
}

impl CourseForm {
    /// Price parsed from the text input; absent when empty or non-numeric.
    pub fn parsed_price(&self) -> Option<i64> {
        let trimmed = self.price.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse().ok()
    }

    /// Whether at least one content source is attached.
    pub fn has_content(&self) -> bool {
        !self.staged_files.is_empty() || !self.course_link.trim().is_empty()
    }

    fn build_course(&self, employer_id: &str) -> Course {
        let now = Utc::now();
        Course {
            id: CourseId::new(),
            employer_id: employer_id.to_string(),
            title: self.title.trim().to_string(),
            category: opt_text(&self.category),
            description: self.description.clone(),
            cover_photo_url: self.cover_photo_url.clone(),
            price: if self.is_free { None } else { self.parsed_price() },
            is_free: self.is_free,
            course_link: opt_text(&self.course_link),
            redirect_link: opt_text(&self.redirect_link),
            manual_approval: self.manual_approval,
            status: CourseStatus::Published,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The six-step course creation wizard.
pub struct CourseWizard {
    form: CourseForm,
    step: CourseStep,
    employer_id: String,
}

impl CourseWizard {
    /// Open the wizard for an employer.
    pub fn new(employer_id: impl Into<String>) -> Self {
        Self {
            form: CourseForm::default(),
            step: CourseStep::Basics,
            employer_id: employer_id.into(),
        }
    }

    /// The step currently shown.
    pub fn step(&self) -> CourseStep {
        self.step
    }

    /// Read access to the form state.
    pub fn form(&self) -> &CourseForm {
        &self.form
    }

    /// Mutable access to the form state, for field edits.
    pub fn form_mut(&mut self) -> &mut CourseForm {
        &mut self.form
    }

    /// Run the current step's validator without moving.
    pub fn validate_current(&self) -> FieldErrors {
        validate_step(self.step, &self.form)
    }

    /// Advance to the next step; blocked while the current one fails.
    pub fn next(&mut self) -> AppResult<CourseStep> {
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
    pub fn back(&mut self) -> CourseStep {
        if let Some(previous) = self.step.preceding() {
            self.step = previous;
        }
        self.step
    }

    /// Upload the cover photo and record its public URL on the form.
    pub async fn upload_cover(
        &mut self,
        client: &SupabaseClient,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String> {
        let path = asset_path(&self.employer_id, file_name);
        client
            .upload_object(COURSE_ASSETS_BUCKET, &path, bytes, content_type)
            .await?;
        let url = client.public_url(COURSE_ASSETS_BUCKET, &path);
        info!(%path, "Course cover uploaded");
        self.form.cover_photo_url = Some(url.clone());
        Ok(url)
    }

    /// Upload a content file and stage it for publish.
    pub async fn upload_content(
        &mut self,
        client: &SupabaseClient,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<StagedFile> {
        let path = asset_path(&self.employer_id, file_name);
        let file_size = bytes.len() as i64;
        client
            .upload_object(COURSE_ASSETS_BUCKET, &path, bytes, content_type)
            .await?;
        let staged = StagedFile {
            file_name: file_name.to_string(),
            file_size,
            content_type: content_type.to_string(),
            file_url: client.public_url(COURSE_ASSETS_BUCKET, &path),
        };
        info!(%path, size = file_size, "Course content uploaded");
        self.form.staged_files.push(staged.clone());
        Ok(staged)
    }

    /// Publish the course: one course insert plus one upload row per
    /// staged file.
    ///
    /// Every step is re-validated first, so a course assembled out of
    /// order cannot slip through half-filled.
    pub async fn publish(&self, client: &SupabaseClient) -> AppResult<Course> {
        let mut errors = FieldErrors::new();
        for step in CourseStep::ALL {
            errors.merge(validate_step(step, &self.form));
        }
        errors.into_result()?;

        let repo = CourseRepository::new(client.clone());
        let stored = repo.insert(&self.form.build_course(&self.employer_id)).await?;

        if !self.form.staged_files.is_empty() {
            let uploads: Vec<CourseUpload> = self
                .form
                .staged_files
                .iter()
                .map(|f| {
                    CourseUpload::new(
                        stored.id.as_str(),
                        f.file_name.clone(),
                        f.file_size,
                        f.content_type.clone(),
                        f.file_url.clone(),
                    )
                })
                .collect();
            repo.insert_uploads(&uploads).await?;
        }

        info!(
            course_id = %stored.id,
            files = self.form.staged_files.len(),
            "Course published"
        );
        Ok(stored)
    }
}

fn validate_step(step: CourseStep, form: &CourseForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match step {
        CourseStep::Basics => {
            if form.title.trim().is_empty() {
                errors.add("title", "Course title is required");
            }
            if form.category.trim().is_empty() {
                errors.add("category", "Select a category");
            }
        }
        CourseStep::Description => {
            if form.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
                errors.add(
                    "description",
                    format!(
                        "Describe the course in at least {} characters",
                        MIN_DESCRIPTION_CHARS
                    ),
                );
            }
        }
        CourseStep::Cover => {
            if form.cover_photo_url.is_none() {
                errors.add("cover_photo", "Upload a cover photo");
            }
        }
        CourseStep::Content => {
            if !form.has_content() {
                errors.add(
                    "content",
                    "Add at least one content file or an external course link",
                );
            }
            let link = form.course_link.trim();
            if !link.is_empty() && !is_valid_http_url(link) {
                errors.add(
                    "course_link",
                    "Enter a complete link starting with http:// or https://",
                );
            }
        }
        CourseStep::Pricing => {
            if !form.is_free {
                match form.parsed_price() {
                    Some(price) if price > 0 => {}
                    _ => errors.add("price", "Enter a price or mark the course free"),
                }
            }
        }
        CourseStep::Review => {}
    }
    errors
}

/// Storage object path for a course asset: scoped under the employer with
/// a timestamp so re-uploads of the same file name never collide.
fn asset_path(employer_id: &str, file_name: &str) -> String {
    format!(
        "{}/{}_{}",
        employer_id,
        Utc::now().timestamp_millis(),
        file_name
    )
}

fn opt_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =============================================================================
// Marketplace
// =============================================================================

/// Marketplace price tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketplaceTab {
    #[default]
    All,
    Free,
    Paid,
}

/// The learner-facing course marketplace.
pub struct Marketplace {
    courses: Vec<Course>,
    wishlist: HashSet<String>,
}

impl Marketplace {
    /// Load published courses and the user's wishlist concurrently.
    pub async fn load(client: &SupabaseClient, user_id: &str) -> AppResult<Self> {
        let courses_repo = CourseRepository::new(client.clone());
        let enrollments_repo = EnrollmentRepository::new(client.clone());
        let (courses, favorites) = tokio::try_join!(
            courses_repo.list_published(),
            enrollments_repo.list_favorites(user_id),
        )?;
        let wishlist = favorites.into_iter().map(|f| f.course_id).collect();
        info!(courses = courses.len(), "Marketplace loaded");
        Ok(Self { courses, wishlist })
    }

    /// Build a marketplace from already-fetched rows.
    pub fn from_parts(courses: Vec<Course>, wishlist: HashSet<String>) -> Self {
        Self { courses, wishlist }
    }

    /// Every published course.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Whether a course is on the user's wishlist.
    pub fn is_wishlisted(&self, course_id: &str) -> bool {
        self.wishlist.contains(course_id)
    }

    /// Courses for a tab and search query.
    ///
    /// The search covers title and description, case-insensitively; an
    /// empty query matches everything.
    pub fn filtered(&self, tab: MarketplaceTab, search: &str) -> Vec<&Course> {
        let query = search.trim().to_lowercase();
        self.courses
            .iter()
            .filter(|c| match tab {
                MarketplaceTab::All => true,
                MarketplaceTab::Free => c.is_free,
                MarketplaceTab::Paid => !c.is_free,
            })
            .filter(|c| {
                query.is_empty()
                    || c.title.to_lowercase().contains(&query)
                    || c.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Toggle a course on the wishlist. Returns whether it is now on it.
    pub async fn toggle_wishlist(
        &mut self,
        client: &SupabaseClient,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<bool> {
        let enrollments = EnrollmentRepository::new(client.clone());
        if self.wishlist.contains(course_id) {
            enrollments.remove_favorite(course_id, user_id).await?;
            self.wishlist.remove(course_id);
            Ok(false)
        } else {
            // A duplicate insert means another device got there first;
            // either way the course ends up wishlisted.
            enrollments
                .add_favorite(&CourseFavorite::new(course_id, user_id))
                .await?;
            self.wishlist.insert(course_id.to_string());
            Ok(true)
        }
    }
}

// =============================================================================
// Enrollment
// =============================================================================

/// Enroll in a free course directly, no checkout involved.
pub async fn enroll_free(
    client: &SupabaseClient,
    course: &Course,
    user_id: &str,
) -> AppResult<Enrollment> {
    if course.effective_price() > 0 {
        return Err(AppError::missing_precondition(
            "this course requires checkout before enrollment",
        ));
    }
    enroll(client, course, user_id, false).await
}

/// Record an enrollment after a successful paid checkout.
pub async fn enroll_paid(
    client: &SupabaseClient,
    course: &Course,
    user_id: &str,
) -> AppResult<Enrollment> {
    enroll(client, course, user_id, true).await
}

async fn enroll(
    client: &SupabaseClient,
    course: &Course,
    user_id: &str,
    paid: bool,
) -> AppResult<Enrollment> {
    let repo = EnrollmentRepository::new(client.clone());
    let stored = repo
        .enroll(&Enrollment::new(course.id.as_str(), user_id, paid))
        .await?;
    info!(course_id = %course.id, paid, "Enrolled in course");

    // Best-effort dashboard event; the enrollment stands regardless.
    let event = CourseNotification::for_enrollment(course.id.as_str(), user_id, &course.title);
    if let Err(e) = repo.insert_course_notification(&event).await {
        warn!(course_id = %course.id, error = %e, "Enrollment event insert failed");
    }
    Ok(stored)
}

/// Whether an enrollment grants access to the course content right now.
///
/// Courses with manual approval stay locked until the employer approves
/// the learner; everything else unlocks on enrollment.
pub fn content_unlocked(course: &Course, enrollment: &Enrollment) -> bool {
    enrollment.is_unlocked(course.manual_approval)
}

// =============================================================================
// Uploaded content management
// =============================================================================

/// Stamp the start of the video deletion lock on a first video upload.
///
/// A no-op when the profile already carries a timestamp; the lock window
/// runs from the very first video, not the latest.
pub async fn record_first_video_upload(
    client: &SupabaseClient,
    profile: &mut Profile,
) -> AppResult<()> {
    if profile.first_video_uploaded_at.is_some() {
        return Ok(());
    }
    profile.first_video_uploaded_at = Some(Utc::now());
    let stored = ProfileRepository::new(client.clone()).update(profile).await?;
    *profile = stored;
    info!(profile_id = %profile.id, "Video deletion lock started");
    Ok(())
}

/// Delete a course upload, honoring the video deletion lock.
///
/// Videos cannot be removed while the owner's lock window is open; other
/// file types delete freely.
pub async fn delete_course_upload(
    client: &SupabaseClient,
    owner: &Profile,
    upload: &CourseUpload,
) -> AppResult<()> {
    if upload.is_video() {
        let lock = video_lock_status(owner.first_video_uploaded_at, Utc::now());
        if lock.locked {
            return Err(AppError::validation_on(
                "upload",
                format!(
                    "Videos cannot be deleted for another {} days",
                    lock.days_remaining
                ),
            ));
        }
    }
    CourseRepository::new(client.clone())
        .delete_upload(upload.id.as_str())
        .await?;
    info!(upload_id = %upload.id, "Course upload deleted");
    Ok(())
}
