//! Employer credit types.
//!
//! Credits gate access to job seekers' full profiles. The balance only moves
//! through the atomic server-side unlock procedure; clients never write it
//! directly.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An employer's credit balance row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmployerCredits {
    /// Row primary key.
    pub id: String,

    /// Owning employer (profile ID).
    pub employer_id: String,

    /// Credits remaining.
    pub credits_balance: i64,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl EmployerCredits {
    /// Whether at least one unlock is affordable.
    pub fn can_unlock(&self) -> bool {
        self.credits_balance > 0
    }
}

/// Audit row for a credit-funded profile view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProfileView {
    /// Row primary key.
    pub id: String,

    /// Employer who unlocked the profile.
    pub employer_id: String,

    /// Job seeker whose profile was unlocked.
    pub job_seeker_id: String,

    /// Credits spent on this view.
    pub credits_used: i64,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl ProfileView {
    /// Record an unlock costing one credit.
    pub fn new(employer_id: impl Into<String>, job_seeker_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            employer_id: employer_id.into(),
            job_seeker_id: job_seeker_id.into(),
            credits_used: 1,
            created_at: Utc::now(),
        }
    }
}

/// Result of the atomic profile-unlock procedure.
///
/// Mirrors the JSON shape returned by `access_job_seeker_profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UnlockResult {
    /// Whether the profile is now accessible.
    pub success: bool,

    /// Rejection reason when not successful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Whether this employer had already unlocked the profile (no charge).
    #[serde(default)]
    pub already_unlocked: bool,

    /// Balance after the operation, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_credits: Option<i64>,
}

impl UnlockResult {
    /// Whether the failure was an empty balance.
    pub fn is_insufficient_credits(&self) -> bool {
        !self.success
            && self
                .message
                .as_deref()
                .map(|m| m.to_lowercase().contains("insufficient"))
                .unwrap_or(false)
    }
}
