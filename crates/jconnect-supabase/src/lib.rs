//! Supabase REST API client.
//!
//! This crate provides:
//! - A PostgREST client with session-aware auth and one re-send on token
//!   rejection
//! - GoTrue sign-up, sign-in, refresh, and sign-out
//! - Storage object upload and public URL construction
//! - Typed repositories for profiles, postings, drafts, applications,
//!   courses, reels, credits, and payments
//! - Database function calls (coupon validation, credit unlock) and edge
//!   function invocation

pub mod application_repo;
pub mod auth;
pub mod client;
pub mod company_repo;
pub mod course_repo;
pub mod credits_repo;
pub mod draft_repo;
pub mod enrollment_repo;
pub mod error;
pub mod job_repo;
pub mod metrics;
pub mod notification_repo;
pub mod payments_repo;
pub mod profile_repo;
pub mod query;
pub mod reel_repo;
pub mod session;
pub mod storage;

pub use application_repo::ApplicationRepository;
pub use auth::SignUpOutcome;
pub use client::{SupabaseClient, SupabaseConfig};
pub use company_repo::CompanyRepository;
pub use course_repo::CourseRepository;
pub use credits_repo::CreditsRepository;
pub use draft_repo::DraftRepository;
pub use enrollment_repo::EnrollmentRepository;
pub use error::{SupabaseError, SupabaseResult};
pub use job_repo::{InternshipRepository, JobRepository};
pub use notification_repo::NotificationRepository;
pub use payments_repo::PaymentsRepository;
pub use profile_repo::ProfileRepository;
pub use query::Query;
pub use reel_repo::ReelRepository;
pub use session::{AuthUser, Session, SessionStore};
