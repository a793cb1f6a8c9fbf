//! Reel types for the candidate video browser.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::Profile;

/// One swipeable video card in the candidate browser.
///
/// A reel is a projection of a job seeker profile with a usable intro video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Reel {
    /// Job seeker (profile ID).
    pub job_seeker_id: String,

    /// Candidate display name.
    pub full_name: String,

    /// Intro video URL.
    pub video_url: String,

    /// Roles the candidate wants.
    #[serde(default)]
    pub desired_roles: Vec<String>,

    /// Preferred location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_location: Option<String>,

    /// Experience summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    /// Skill tags shown on the card.
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Reel {
    /// Build a reel from a profile, when it has a usable intro video.
    pub fn from_profile(profile: &Profile) -> Option<Self> {
        if !profile.has_intro_video() {
            return None;
        }
        Some(Self {
            job_seeker_id: profile.id.as_str().to_string(),
            full_name: profile.full_name.clone(),
            video_url: profile.intro_video_url.clone().unwrap_or_default(),
            desired_roles: profile.desired_roles.clone(),
            desired_location: profile.desired_location.clone(),
            experience: profile.experience.clone(),
            skills: profile.skills.clone(),
        })
    }

    /// Desired roles joined for display and substring filtering.
    pub fn joined_roles(&self) -> String {
        self.desired_roles.join(", ")
    }

    /// Case-insensitive role-substring match. An empty query matches.
    pub fn matches_role(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.joined_roles()
            .to_lowercase()
            .contains(&query.to_lowercase())
    }

    /// Case-insensitive location-substring match. An empty query matches.
    pub fn matches_location(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.desired_location
            .as_deref()
            .map(|loc| loc.to_lowercase().contains(&query.to_lowercase()))
            .unwrap_or(false)
    }
}

/// Employer bookmark of a reel; unique per (employer, job seeker).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SavedVideo {
    /// Row primary key.
    pub id: String,

    /// Bookmarking employer (profile ID).
    pub employer_id: String,

    /// Bookmarked job seeker (profile ID).
    pub job_seeker_id: String,

    /// Snapshot of the video URL at save time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl SavedVideo {
    /// Bookmark a reel.
    pub fn new(employer_id: impl Into<String>, reel: &Reel) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            employer_id: employer_id.into(),
            job_seeker_id: reel.job_seeker_id.clone(),
            video_url: Some(reel.video_url.clone()),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reel_with_roles(roles: &[&str]) -> Reel {
        Reel {
            job_seeker_id: "js-1".to_string(),
            full_name: "Asha Verma".to_string(),
            video_url: "https://cdn.example.com/v.mp4".to_string(),
            desired_roles: roles.iter().map(|r| r.to_string()).collect(),
            desired_location: Some("Mumbai".to_string()),
            experience: None,
            skills: Vec::new(),
        }
    }

    #[test]
    fn test_role_filter_is_case_insensitive_substring() {
        let reel = reel_with_roles(&["Sales Executive", "Store Manager"]);
        assert!(reel.matches_role("sales"));
        assert!(reel.matches_role("MANAGER"));
        assert!(reel.matches_role("store man"));
        assert!(!reel.matches_role("engineer"));
    }

    #[test]
    fn test_empty_role_filter_matches_everything() {
        let reel = reel_with_roles(&[]);
        assert!(reel.matches_role(""));
        assert!(!reel.matches_role("sales"));
    }

    #[test]
    fn test_filter_runs_over_joined_roles() {
        // The join inserts ", " so a query spanning two roles can match
        let reel = reel_with_roles(&["Cook", "Waiter"]);
        assert_eq!(reel.joined_roles(), "Cook, Waiter");
        assert!(reel.matches_role("cook, wait"));
    }

    #[test]
    fn test_location_filter() {
        let reel = reel_with_roles(&["Cook"]);
        assert!(reel.matches_location("mum"));
        assert!(reel.matches_location(""));
        assert!(!reel.matches_location("delhi"));

        let mut nowhere = reel.clone();
        nowhere.desired_location = None;
        assert!(nowhere.matches_location(""));
        assert!(!nowhere.matches_location("mumbai"));
    }

    #[test]
    fn test_reel_from_profile_requires_video() {
        let mut profile = Profile::for_new_user("auth-1", "Ravi Kumar");
        assert!(Reel::from_profile(&profile).is_none());

        profile.intro_video_url = Some("https://cdn.example.com/intro.mp4".to_string());
        profile.desired_roles = vec!["Driver".to_string()];
        let reel = Reel::from_profile(&profile).unwrap();
        assert_eq!(reel.full_name, "Ravi Kumar");
        assert_eq!(reel.desired_roles, vec!["Driver".to_string()]);
    }
}
