//! User profile types.
//!
//! A profile is the application-level user record, distinct from the
//! authentication identity it links to via `auth_id`. Profiles are created
//! lazily on first login when no row exists yet.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique profile identifier (row primary key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl ProfileId {
    /// Generate a new random profile ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProfileId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProfileId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Application role attached to a profile.
///
/// A profile may hold several roles at once (a hiring manager who also
/// takes courses, for example).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Jobseeker,
    Employer,
}

impl Role {
    /// Get the role as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Jobseeker => "jobseeker",
            Role::Employer => "employer",
        }
    }

    /// Parse from string (case-insensitive). Unknown values fall back to
    /// job seeker, matching the sign-up default.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "employer" => Role::Employer,
            _ => Role::Jobseeker,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user profile row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Profile {
    /// Row primary key.
    pub id: ProfileId,

    /// Authentication identity this profile belongs to.
    pub auth_id: String,

    /// Display name.
    #[serde(default)]
    pub full_name: String,

    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    /// Roles held by this profile.
    #[serde(default = "default_roles")]
    pub roles: Vec<Role>,

    /// Uploaded resume URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,

    /// Introduction video URL shown in the reels browser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_video_url: Option<String>,

    /// Roles the job seeker is looking for.
    #[serde(default)]
    pub desired_roles: Vec<String>,

    /// Preferred work location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_location: Option<String>,

    /// Free-text experience summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    /// Skills list.
    #[serde(default)]
    pub skills: Vec<String>,

    /// Education entries.
    #[serde(default)]
    pub education: Vec<String>,

    /// Employer's company, when one has been created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,

    /// When the first course video was uploaded; starts the deletion lock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_video_uploaded_at: Option<DateTime<Utc>>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn default_roles() -> Vec<Role> {
    vec![Role::Jobseeker]
}

impl Profile {
    /// Create a minimal profile for a fresh authentication identity.
    ///
    /// Used by the lazy-create path when a login has no profile row yet.
    pub fn for_new_user(auth_id: impl Into<String>, full_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            auth_id: auth_id.into(),
            full_name: full_name.into(),
            email: None,
            phone_number: None,
            roles: default_roles(),
            resume_url: None,
            intro_video_url: None,
            desired_roles: Vec::new(),
            desired_location: None,
            experience: None,
            skills: Vec::new(),
            education: Vec::new(),
            company_id: None,
            first_video_uploaded_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this profile holds the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Whether the profile has a usable intro video for the reels browser.
    pub fn has_intro_video(&self) -> bool {
        self.intro_video_url
            .as_deref()
            .map(|u| !u.is_empty() && u != "null")
            .unwrap_or(false)
    }
}
