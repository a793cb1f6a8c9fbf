//! Application session context.
//!
//! One [`AppSession`] lives at the root of the app. It is built at startup,
//! restored from a persisted refresh token when one exists, and torn down on
//! sign-out. Every flow that needs the signed-in user's profile goes through
//! it; nothing else holds auth state.

use tokio::sync::RwLock;
use tracing::info;

use jconnect_models::Profile;
use jconnect_supabase::{AuthUser, ProfileRepository, SignUpOutcome, SupabaseClient};

use crate::error::{AppError, AppResult};

/// Outcome of a sign-up attempt.
#[derive(Debug)]
pub enum SignUpStatus {
    /// Auto-confirm was enabled; the user is signed in with a profile.
    SignedIn(Profile),
    /// A confirmation email went out; there is no session yet.
    ConfirmationPending {
        /// Address the confirmation was sent to, when the server echoed it.
        email: Option<String>,
    },
}

/// Root session state: the Supabase client plus the signed-in profile.
///
/// Interior mutability keeps the methods on `&self` so the session can be
/// shared across concurrently running flows.
pub struct AppSession {
    client: SupabaseClient,
    profiles: ProfileRepository,
    profile: RwLock<Option<Profile>>,
}

impl AppSession {
    /// Create a session context over a client. No user is signed in yet.
    pub fn new(client: SupabaseClient) -> Self {
        let profiles = ProfileRepository::new(client.clone());
        Self {
            client,
            profiles,
            profile: RwLock::new(None),
        }
    }

    /// The underlying client, for flows that talk to the backend directly.
    pub fn client(&self) -> &SupabaseClient {
        &self.client
    }

    /// Sign in with email and password, then load the user's profile.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Profile> {
        let session = self.client.sign_in_with_password(email, password).await?;
        let profile = self.ensure_profile(&session.user).await?;
        info!(profile_id = %profile.id, "Signed in");
        Ok(profile)
    }

    /// Register a new account.
    ///
    /// When the project has email confirmation enabled there is no session
    /// until the link is clicked, so no profile row is created here; the
    /// first sign-in creates it.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> AppResult<SignUpStatus> {
        match self.client.sign_up(email, password, full_name).await? {
            SignUpOutcome::SignedIn(session) => {
                let profile = self.ensure_profile(&session.user).await?;
                info!(profile_id = %profile.id, "Signed up");
                Ok(SignUpStatus::SignedIn(profile))
            }
            SignUpOutcome::ConfirmationRequired(user) => {
                info!(user_id = %user.id, "Sign-up pending email confirmation");
                Ok(SignUpStatus::ConfirmationPending { email: user.email })
            }
        }
    }

    /// Restore a persisted session from its refresh token.
    pub async fn restore(&self, refresh_token: &str) -> AppResult<Profile> {
        let session = self.client.restore_session(refresh_token).await?;
        let profile = self.ensure_profile(&session.user).await?;
        info!(profile_id = %profile.id, "Session restored");
        Ok(profile)
    }

    /// Send a password reset email.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        self.client.reset_password_for_email(email).await?;
        Ok(())
    }

    /// Sign out and tear down local state.
    ///
    /// The cached profile is dropped along with the token cache, so a
    /// subsequent [`require_profile`](Self::require_profile) fails until
    /// someone signs in again.
    pub async fn sign_out(&self) -> AppResult<()> {
        self.client.sign_out().await?;
        *self.profile.write().await = None;
        info!("Signed out");
        Ok(())
    }

    /// The signed-in user's profile, when one is loaded.
    pub async fn profile(&self) -> Option<Profile> {
        self.profile.read().await.clone()
    }

    /// The signed-in user's profile, or a missing-precondition error.
    pub async fn require_profile(&self) -> AppResult<Profile> {
        self.profile()
            .await
            .ok_or_else(|| AppError::missing_precondition("no signed-in user"))
    }

    /// Re-read the profile row from the backend, refreshing the cache.
    ///
    /// Used after flows that write to the profile (intro video upload,
    /// resume change) so the cached copy does not go stale.
    pub async fn reload_profile(&self) -> AppResult<Profile> {
        let user = self
            .client
            .session()
            .current_user()
            .await
            .ok_or_else(|| AppError::missing_precondition("no signed-in user"))?;
        self.ensure_profile(&user).await
    }

    /// Fetch the profile for an auth identity, creating the row when the
    /// user has none yet.
    ///
    /// First logins land here without a profile; the fresh row takes its
    /// name from the auth metadata, falling back to the email local part.
    async fn ensure_profile(&self, user: &AuthUser) -> AppResult<Profile> {
        let profile = match self.profiles.get_by_auth_id(&user.id).await? {
            Some(existing) => existing,
            None => {
                let full_name = user
                    .full_name()
                    .map(str::to_string)
                    .or_else(|| default_name_from_email(user.email.as_deref()))
                    .unwrap_or_default();
                let mut fresh = Profile::for_new_user(&user.id, full_name);
                fresh.email = user.email.clone();
                let created = self.profiles.create(&fresh).await?;
                info!(profile_id = %created.id, "Created profile for first login");
                created
            }
        };
        *self.profile.write().await = Some(profile.clone());
        Ok(profile)
    }
}

/// Display name derived from an email address: everything before the `@`.
fn default_name_from_email(email: Option<&str>) -> Option<String> {
    let email = email?;
    let local = email.split('@').next()?;
    if local.is_empty() {
        None
    } else {
        Some(local.to_string())
    }
}
