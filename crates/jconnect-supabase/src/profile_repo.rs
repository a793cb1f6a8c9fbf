//! Profile repository backed by the `profiles` table.

use chrono::Utc;
use tracing::info;

use jconnect_models::Profile;

use crate::client::SupabaseClient;
use crate::error::{SupabaseError, SupabaseResult};
use crate::query::Query;

const TABLE: &str = "profiles";

/// Repository for user profiles.
pub struct ProfileRepository {
    client: SupabaseClient,
}

impl ProfileRepository {
    /// Create a new profile repository.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Get a profile by its row id.
    pub async fn get(&self, profile_id: &str) -> SupabaseResult<Option<Profile>> {
        self.client
            .select_single(TABLE, Query::new().select("*").eq("id", profile_id))
            .await
    }

    /// Get the profile belonging to an auth user.
    pub async fn get_by_auth_id(&self, auth_id: &str) -> SupabaseResult<Option<Profile>> {
        self.client
            .select_single(TABLE, Query::new().select("*").eq("auth_id", auth_id))
            .await
    }

    /// Fetch profiles for a set of ids, e.g. the applicants on a board.
    pub async fn list_by_ids(&self, ids: &[&str]) -> SupabaseResult<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        self.client
            .select(TABLE, Query::new().select("*").in_list("id", ids))
            .await
    }

    /// Insert a new profile row.
    pub async fn create(&self, profile: &Profile) -> SupabaseResult<Profile> {
        let stored: Profile = self.client.insert(TABLE, profile).await?;
        info!("Created profile {} for auth user {}", stored.id, stored.auth_id);
        Ok(stored)
    }

    /// Replace a profile's mutable columns with the given state.
    pub async fn update(&self, profile: &Profile) -> SupabaseResult<Profile> {
        let mut patch = serde_json::to_value(profile)?;
        if let Some(obj) = patch.as_object_mut() {
            // id and auth linkage never move
            obj.remove("id");
            obj.remove("auth_id");
            obj.remove("created_at");
            obj.insert(
                "updated_at".to_string(),
                serde_json::json!(Utc::now().to_rfc3339()),
            );
        }

        let mut rows: Vec<Profile> = self
            .client
            .update(TABLE, Query::new().eq("id", profile.id.as_str()), &patch)
            .await?;
        if rows.is_empty() {
            return Err(SupabaseError::not_found(format!(
                "profile {}",
                profile.id
            )));
        }
        info!("Updated profile {}", profile.id);
        Ok(rows.remove(0))
    }
}
