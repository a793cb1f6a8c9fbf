//! Course video deletion lock.
//!
//! Uploading the first course video starts a fixed window during which
//! uploaded videos cannot be deleted, so paying learners are not stranded
//! mid-course.

use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Days the deletion lock holds after the first video upload.
pub const VIDEO_LOCK_DAYS: i64 = 20;

/// State of the deletion lock for an uploader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoLockStatus {
    /// Whether deletion is currently blocked.
    pub locked: bool,

    /// Whole days until the lock lifts; zero when unlocked.
    pub days_remaining: i64,

    /// When the lock lifts, when one is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocks_at: Option<DateTime<Utc>>,
}

impl VideoLockStatus {
    /// No lock in effect.
    pub fn unlocked() -> Self {
        Self {
            locked: false,
            days_remaining: 0,
            unlocks_at: None,
        }
    }
}

/// Compute the lock state given the first upload time, as of `now`.
///
/// No upload yet means no lock. The remaining-days figure rounds up, so a
/// lock lifting in part of a day still reports one day.
pub fn video_lock_status(
    first_video_uploaded_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> VideoLockStatus {
    let Some(first) = first_video_uploaded_at else {
        return VideoLockStatus::unlocked();
    };

    let unlocks_at = first + Duration::days(VIDEO_LOCK_DAYS);
    if now >= unlocks_at {
        return VideoLockStatus::unlocked();
    }

    let remaining = unlocks_at - now;
    let days = remaining.num_days();
    let days_remaining = if remaining - Duration::days(days) > Duration::zero() {
        days + 1
    } else {
        days
    };

    VideoLockStatus {
        locked: true,
        days_remaining,
        unlocks_at: Some(unlocks_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_upload_means_unlocked() {
        let status = video_lock_status(None, Utc::now());
        assert!(!status.locked);
        assert_eq!(status.days_remaining, 0);
        assert!(status.unlocks_at.is_none());
    }

    #[test]
    fn test_locked_inside_window() {
        let now = Utc::now();
        let status = video_lock_status(Some(now - Duration::days(5)), now);
        assert!(status.locked);
        assert_eq!(status.days_remaining, 15);
        assert_eq!(status.unlocks_at, Some(now + Duration::days(15)));
    }

    #[test]
    fn test_partial_day_rounds_up() {
        let now = Utc::now();
        let first = now - Duration::days(19) - Duration::hours(12);
        let status = video_lock_status(Some(first), now);
        assert!(status.locked);
        // Half a day left still reports one day
        assert_eq!(status.days_remaining, 1);
    }

    #[test]
    fn test_unlocks_after_window() {
        let now = Utc::now();
        let status = video_lock_status(Some(now - Duration::days(VIDEO_LOCK_DAYS)), now);
        assert!(!status.locked);

        let status = video_lock_status(Some(now - Duration::days(45)), now);
        assert!(!status.locked);
        assert_eq!(status.days_remaining, 0);
    }

    #[test]
    fn test_fresh_upload_locks_full_window() {
        let now = Utc::now();
        let status = video_lock_status(Some(now), now);
        assert!(status.locked);
        assert_eq!(status.days_remaining, VIDEO_LOCK_DAYS);
    }
}
