//! Reel repository: job seeker intro videos read from the `profiles` table.

use tracing::{debug, info};

use jconnect_models::{Reel, Role, SavedVideo};

use crate::client::SupabaseClient;
use crate::error::SupabaseResult;
use crate::query::Query;

const PROFILES_TABLE: &str = "profiles";
const SAVED_VIDEOS_TABLE: &str = "saved_videos";

/// Repository for the employer-facing reel feed.
pub struct ReelRepository {
    client: SupabaseClient,
}

impl ReelRepository {
    /// Create a new reel repository.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Fetch every job seeker profile with an intro video, as reels.
    ///
    /// Role and location filtering happens in the viewer: it is a substring
    /// match, which the REST filter grammar cannot express over arrays.
    pub async fn fetch_reels(&self) -> SupabaseResult<Vec<Reel>> {
        let profiles: Vec<jconnect_models::Profile> = self
            .client
            .select(
                PROFILES_TABLE,
                Query::new()
                    .select("*")
                    .contains("roles", &[Role::Jobseeker.as_str()])
                    .not_null("intro_video_url")
                    .neq("intro_video_url", "")
                    .order("first_video_uploaded_at", true),
            )
            .await?;

        Ok(profiles.iter().filter_map(Reel::from_profile).collect())
    }

    /// Save a reel to the employer's library. Returns `false` when it was
    /// already saved.
    pub async fn save_video(&self, employer_id: &str, reel: &Reel) -> SupabaseResult<bool> {
        let row = SavedVideo::new(employer_id, reel);
        match self
            .client
            .insert::<_, SavedVideo>(SAVED_VIDEOS_TABLE, &row)
            .await
        {
            Ok(stored) => {
                info!(
                    "Employer {} saved video of job seeker {}",
                    employer_id, stored.job_seeker_id
                );
                Ok(true)
            }
            Err(e) if e.is_unique_violation() => {
                debug!(
                    "Video of job seeker {} already saved by employer {}",
                    reel.job_seeker_id, employer_id
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove a saved video from the employer's library.
    pub async fn unsave_video(&self, employer_id: &str, job_seeker_id: &str) -> SupabaseResult<()> {
        self.client
            .delete(
                SAVED_VIDEOS_TABLE,
                Query::new()
                    .eq("employer_id", employer_id)
                    .eq("job_seeker_id", job_seeker_id),
            )
            .await?;
        info!(
            "Employer {} unsaved video of job seeker {}",
            employer_id, job_seeker_id
        );
        Ok(())
    }

    /// List the employer's saved videos, newest first.
    pub async fn list_saved(&self, employer_id: &str) -> SupabaseResult<Vec<SavedVideo>> {
        self.client
            .select(
                SAVED_VIDEOS_TABLE,
                Query::new()
                    .select("*")
                    .eq("employer_id", employer_id)
                    .order("created_at", true),
            )
            .await
    }
}
