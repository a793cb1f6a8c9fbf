//! Application flows for Job Connect.
//!
//! This crate provides:
//! - The root session context with lazy profile creation
//! - The seven-step job posting wizard and its draft manager
//! - The employer applications board with optimistic status updates
//! - The candidate reel browser with credit-gated profile unlocks
//! - Course creation, marketplace, enrollment, and dashboard analytics
//! - Checkout flows behind a pluggable gateway seam

pub mod analytics;
pub mod applications;
pub mod courses;
pub mod drafts;
pub mod error;
pub mod payments;
pub mod reels;
pub mod session;
pub mod wizard;

pub use analytics::{AnalyticsRange, CourseAnalytics, CourseStats};
pub use applications::{ApplicationBoard, BoardEntry, BoardStats, PostingKind};
pub use courses::{
    content_unlocked, delete_course_upload, enroll_free, enroll_paid, record_first_video_upload,
    CourseForm, CourseStep, CourseWizard, Marketplace, MarketplaceTab, StagedFile,
    COURSE_ASSETS_BUCKET, MIN_DESCRIPTION_CHARS,
};
pub use drafts::DraftManager;
pub use error::{AppError, AppResult, FieldErrors};
pub use payments::{
    job_plans, Checkout, CheckoutFlow, CheckoutGateway, GatewayOrder, RazorpayGateway,
};
pub use reels::{unlock_profile, ReelViewer, UnlockOutcome, SWIPE_THRESHOLD_PX};
pub use session::{AppSession, SignUpStatus};
pub use wizard::{JobWizard, WizardStep};
