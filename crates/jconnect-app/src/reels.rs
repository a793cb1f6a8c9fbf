//! Candidate reel browser.
//!
//! Employers browse job seeker intro videos one at a time, like a vertical
//! video feed. Navigation is index-based and clamped: swiping past either
//! end is a no-op, and filter changes snap back to the first reel. Viewing
//! a candidate's full profile costs one credit, spent atomically
//! server-side.

use tracing::{info, warn};

use jconnect_models::{Reel, UnlockResult};
use jconnect_supabase::{CreditsRepository, ReelRepository, SupabaseClient};

use crate::error::AppResult;

/// Vertical swipe distance, in pixels, below which a gesture is ignored.
pub const SWIPE_THRESHOLD_PX: f32 = 50.0;

/// Outcome of a profile unlock attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum UnlockOutcome {
    /// The full profile is now accessible.
    Unlocked {
        /// True when a previous unlock already covered this profile; no
        /// credit was spent this time.
        already_unlocked: bool,
        /// Balance after the spend, when the server reported it.
        remaining_credits: Option<i64>,
    },
    /// The employer has no credits left; nothing was spent.
    InsufficientCredits,
    /// The server refused the unlock for another reason.
    Rejected { message: String },
}

impl UnlockOutcome {
    /// Message shown to the employer when the unlock did not go through.
    pub fn denial_message(&self) -> Option<&str> {
        match self {
            UnlockOutcome::Unlocked { .. } => None,
            UnlockOutcome::InsufficientCredits => {
                Some("You have no credits left. Purchase credits to view full profiles.")
            }
            UnlockOutcome::Rejected { message } => Some(message),
        }
    }
}

/// Swipeable reel list with filter state.
pub struct ReelViewer {
    all: Vec<Reel>,
    filtered: Vec<Reel>,
    index: usize,
    role_filter: String,
    location_filter: String,
}

impl ReelViewer {
    /// Build a viewer over already-fetched reels.
    pub fn new(reels: Vec<Reel>) -> Self {
        Self {
            filtered: reels.clone(),
            all: reels,
            index: 0,
            role_filter: String::new(),
            location_filter: String::new(),
        }
    }

    /// Fetch candidate reels and build the viewer.
    pub async fn load(client: &SupabaseClient) -> AppResult<Self> {
        let reels = ReelRepository::new(client.clone()).fetch_reels().await?;
        info!(count = reels.len(), "Candidate reels loaded");
        Ok(Self::new(reels))
    }

    /// Reels passing the current filters, in feed order.
    pub fn reels(&self) -> &[Reel] {
        &self.filtered
    }

    /// Current position in the filtered list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The reel on screen, when any survive the filters.
    pub fn current(&self) -> Option<&Reel> {
        self.filtered.get(self.index)
    }

    /// Advance one reel; a no-op on the last.
    pub fn next(&mut self) {
        if self.index + 1 < self.filtered.len() {
            self.index += 1;
        }
    }

    /// Go back one reel; a no-op on the first.
    pub fn previous(&mut self) {
        if self.index > 0 {
            self.index -= 1;
        }
    }

    /// Jump straight to a position, clamped into the list.
    pub fn jump_to(&mut self, index: usize) {
        if self.filtered.is_empty() {
            self.index = 0;
        } else {
            self.index = index.min(self.filtered.len() - 1);
        }
    }

    /// Apply a touch gesture by its vertical delta in pixels.
    ///
    /// Positive means the finger moved up (next reel), negative down
    /// (previous). Anything under [`SWIPE_THRESHOLD_PX`] is treated as a
    /// tap, not a swipe.
    pub fn swipe(&mut self, delta_y: f32) {
        if delta_y >= SWIPE_THRESHOLD_PX {
            self.next();
        } else if delta_y <= -SWIPE_THRESHOLD_PX {
            self.previous();
        }
    }

    /// Filter by desired role; empty clears. Resets to the first reel.
    pub fn set_role_filter(&mut self, query: impl Into<String>) {
        self.role_filter = query.into();
        self.apply_filters();
    }

    /// Filter by desired location; empty clears. Resets to the first reel.
    pub fn set_location_filter(&mut self, query: impl Into<String>) {
        self.location_filter = query.into();
        self.apply_filters();
    }

    fn apply_filters(&mut self) {
        self.filtered = self
            .all
            .iter()
            .filter(|r| {
                r.matches_role(&self.role_filter) && r.matches_location(&self.location_filter)
            })
            .cloned()
            .collect();
        self.index = 0;
    }

    /// Spend one credit to unlock the current reel's full profile.
    pub async fn unlock_current(
        &self,
        client: &SupabaseClient,
        employer_id: &str,
    ) -> AppResult<UnlockOutcome> {
        match self.current() {
            Some(reel) => unlock_profile(client, employer_id, &reel.job_seeker_id).await,
            None => Ok(UnlockOutcome::Rejected {
                message: "No reel selected".to_string(),
            }),
        }
    }

    /// Bookmark the current reel. Returns `false` when it was already
    /// saved or no reel is on screen.
    pub async fn save_current(
        &self,
        client: &SupabaseClient,
        employer_id: &str,
    ) -> AppResult<bool> {
        let Some(reel) = self.current() else {
            return Ok(false);
        };
        let saved = ReelRepository::new(client.clone())
            .save_video(employer_id, reel)
            .await?;
        Ok(saved)
    }

    /// Remove the current reel from the employer's bookmarks.
    pub async fn unsave_current(
        &self,
        client: &SupabaseClient,
        employer_id: &str,
    ) -> AppResult<()> {
        if let Some(reel) = self.current() {
            ReelRepository::new(client.clone())
                .unsave_video(employer_id, &reel.job_seeker_id)
                .await?;
        }
        Ok(())
    }
}

/// Unlock a job seeker's full profile by spending one credit.
///
/// The decrement and the view record happen inside one database function,
/// so two devices racing on the same employer account cannot double-spend.
/// Unlocking an already-viewed profile succeeds without spending again.
pub async fn unlock_profile(
    client: &SupabaseClient,
    employer_id: &str,
    job_seeker_id: &str,
) -> AppResult<UnlockOutcome> {
    let credits = CreditsRepository::new(client.clone());
    let result = credits.unlock_profile(employer_id, job_seeker_id).await?;
    Ok(classify_unlock(job_seeker_id, result))
}

fn classify_unlock(job_seeker_id: &str, result: UnlockResult) -> UnlockOutcome {
    if result.success {
        info!(
            %job_seeker_id,
            already_unlocked = result.already_unlocked,
            remaining = ?result.remaining_credits,
            "Profile unlocked"
        );
        UnlockOutcome::Unlocked {
            already_unlocked: result.already_unlocked,
            remaining_credits: result.remaining_credits,
        }
    } else if result.is_insufficient_credits() {
        warn!(%job_seeker_id, "Profile unlock denied: no credits left");
        UnlockOutcome::InsufficientCredits
    } else {
        UnlockOutcome::Rejected {
            message: result
                .message
                .unwrap_or_else(|| "Profile unlock failed".to_string()),
        }
    }
}
