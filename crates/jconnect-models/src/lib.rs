//! Shared data models for Job Connect.
//!
//! This crate defines:
//! - Row types for every table the client touches (profiles, companies,
//!   jobs, drafts, applications, courses, enrollments, notifications,
//!   coupons, payments, credits)
//! - The wizard form state and its explicit form↔row mapping
//! - Pure domain math: coupon discounts, the video deletion lock, the plan
//!   catalog
//! - Field validation helpers

pub mod application;
pub mod company;
pub mod coupon;
pub mod course;
pub mod credits;
pub mod draft;
pub mod enrollment;
pub mod internship;
pub mod job;
pub mod job_form;
pub mod notification;
pub mod payment;
pub mod plan;
pub mod profile;
pub mod reel;
pub mod validation;
pub mod video_lock;

pub use application::{
    Application, ApplicationId, ApplicationStatus, InternshipApplication, QuestionAnswer,
};
pub use company::{Company, CompanyId};
pub use coupon::{
    compute_discount, Coupon, CouponScope, CouponUsage, CouponValidation, DiscountKind, ProductType,
};
pub use course::{Course, CourseId, CourseStatus, CourseUpload, UploadId};
pub use credits::{EmployerCredits, ProfileView, UnlockResult};
pub use draft::{DraftId, JobDraft, DRAFT_TTL_DAYS, MAX_DRAFTS_PER_USER};
pub use enrollment::{CourseFavorite, CourseView, Enrollment, EnrollmentId};
pub use internship::{Internship, InternshipId};
pub use job::{
    ApplicationRouting, CustomQuestion, Job, JobId, JobLocation, JobStatus, JobType, PayType,
    QuestionKind,
};
pub use job_form::{deadline_is_future, JobForm, CUSTOM_HIRES};
pub use notification::{CourseNotification, Notification, NotificationKind};
pub use payment::{CheckoutOrder, PaymentIntent, PaymentStatus};
pub use plan::{JobPlan, JobPlanTier, PlanTierParseError};
pub use profile::{Profile, ProfileId, Role};
pub use reel::{Reel, SavedVideo};
pub use validation::{all_valid_emails, is_valid_email, is_valid_http_url, is_valid_pincode};
pub use video_lock::{video_lock_status, VideoLockStatus, VIDEO_LOCK_DAYS};
