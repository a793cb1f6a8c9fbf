//! GoTrue authentication endpoints.
//!
//! Sign-up, password sign-in, token refresh, and sign-out against the
//! Supabase auth service. Successful grants install the session into the
//! client's [`SessionStore`](crate::session::SessionStore).

use chrono::{DateTime, TimeZone, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::SupabaseClient;
use crate::error::{SupabaseError, SupabaseResult};
use crate::session::{AuthUser, Session};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: serde_json::Value,
}

/// Token grant response from GoTrue.
#[derive(Debug, Deserialize)]
struct TokenPayload {
    access_token: String,
    refresh_token: String,
    /// Relative expiry in seconds.
    #[serde(default)]
    expires_in: Option<i64>,
    /// Absolute expiry as a unix timestamp; newer GoTrue versions send it.
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenPayload {
    fn to_session(&self) -> Session {
        let expires_at: DateTime<Utc> = self
            .expires_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or_else(|| {
                Utc::now() + chrono::Duration::seconds(self.expires_in.unwrap_or(3600))
            });

        Session {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            expires_at,
            user: self.user.clone(),
        }
    }
}

/// Error body shape returned by GoTrue.
#[derive(Debug, Deserialize)]
struct GoTrueErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl GoTrueErrorBody {
    fn display_message(&self) -> Option<String> {
        self.error_description
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.message.clone())
            .or_else(|| self.error.clone())
    }
}

/// Outcome of a sign-up request.
///
/// When email confirmation is enabled the project returns a user without a
/// session; the account exists but cannot act until the link is clicked.
#[derive(Debug)]
pub enum SignUpOutcome {
    /// Auto-confirm is on; the user is signed in.
    SignedIn(Session),
    /// A confirmation email was sent.
    ConfirmationRequired(AuthUser),
}

// =============================================================================
// Auth Operations
// =============================================================================

impl SupabaseClient {
    /// Register a new account, recording the full name in user metadata.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> SupabaseResult<SignUpOutcome> {
        let url = format!("{}/signup", self.config.auth_url());
        let body = SignUpRequest {
            email,
            password,
            data: serde_json::json!({ "full_name": full_name }),
        };

        self.execute("sign_up", "auth", async {
            let response = self.http.post(&url).json(&body).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(auth_error_from_response(status, response).await);
            }

            let payload: serde_json::Value = response.json().await?;
            if payload.get("access_token").is_some() {
                let grant: TokenPayload = serde_json::from_value(payload)?;
                let session = grant.to_session();
                self.session.set(session.clone()).await;
                info!(user_id = %session.user.id, "Signed up and signed in");
                Ok(SignUpOutcome::SignedIn(session))
            } else {
                let user: AuthUser = serde_json::from_value(payload)?;
                info!(user_id = %user.id, "Signed up, confirmation email sent");
                Ok(SignUpOutcome::ConfirmationRequired(user))
            }
        })
        .await
    }

    /// Sign in with email and password.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> SupabaseResult<Session> {
        let url = format!("{}/token?grant_type=password", self.config.auth_url());
        let body = PasswordGrant { email, password };

        self.execute("sign_in", "auth", async {
            let response = self.http.post(&url).json(&body).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(auth_error_from_response(status, response).await);
            }

            let grant: TokenPayload = response.json().await?;
            let session = grant.to_session();
            self.session.set(session.clone()).await;
            info!(user_id = %session.user.id, "Signed in");
            Ok(session)
        })
        .await
    }

    /// Exchange a refresh token for a new session.
    ///
    /// Does not install the result; [`SessionStore::refresh_with`] does that
    /// under its lock.
    ///
    /// [`SessionStore::refresh_with`]: crate::session::SessionStore::refresh_with
    pub(crate) async fn exchange_refresh_token(
        &self,
        refresh_token: String,
    ) -> SupabaseResult<Session> {
        let url = format!(
            "{}/token?grant_type=refresh_token",
            self.config.auth_url()
        );
        let body = RefreshGrant {
            refresh_token: &refresh_token,
        };

        self.execute("refresh_token", "auth", async {
            let response = self.http.post(&url).json(&body).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(auth_error_from_response(status, response).await);
            }

            let grant: TokenPayload = response.json().await?;
            Ok(grant.to_session())
        })
        .await
    }

    /// Restore a persisted session from its refresh token.
    ///
    /// The access token is never persisted, so restoring always exchanges
    /// the refresh token for a fresh grant.
    pub async fn restore_session(&self, refresh_token: &str) -> SupabaseResult<Session> {
        let session = self
            .exchange_refresh_token(refresh_token.to_string())
            .await?;
        self.session.set(session.clone()).await;
        info!(user_id = %session.user.id, "Restored session");
        Ok(session)
    }

    /// Fetch the signed-in user from the auth service.
    pub async fn get_user(&self) -> SupabaseResult<AuthUser> {
        let url = format!("{}/user", self.config.auth_url());

        self.execute("get_user", "auth", async {
            let response = self
                .send_with_auth(|http, bearer| http.get(&url).bearer_auth(bearer))
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(auth_error_from_response(status, response).await);
            }
            Ok(response.json().await?)
        })
        .await
    }

    /// Update auth attributes (password, email, metadata) for the signed-in
    /// user.
    pub async fn update_user(&self, attributes: &serde_json::Value) -> SupabaseResult<AuthUser> {
        let url = format!("{}/user", self.config.auth_url());

        self.execute("update_user", "auth", async {
            let response = self
                .send_with_auth(|http, bearer| http.put(&url).bearer_auth(bearer).json(attributes))
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(auth_error_from_response(status, response).await);
            }
            Ok(response.json().await?)
        })
        .await
    }

    /// Send a password recovery email.
    pub async fn reset_password_for_email(&self, email: &str) -> SupabaseResult<()> {
        let url = format!("{}/recover", self.config.auth_url());
        let body = serde_json::json!({ "email": email });

        self.execute("reset_password", "auth", async {
            let response = self.http.post(&url).json(&body).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(auth_error_from_response(status, response).await);
            }
            Ok(())
        })
        .await
    }

    /// Sign out, revoking the session server-side and clearing it locally.
    ///
    /// The local session is cleared even when revocation fails; a dropped
    /// device should never stay signed in because the network flaked.
    pub async fn sign_out(&self) -> SupabaseResult<()> {
        let snapshot = self.session.snapshot().await;

        if let Some(session) = snapshot {
            let url = format!("{}/logout", self.config.auth_url());
            let result = self
                .execute("sign_out", "auth", async {
                    let response = self
                        .http
                        .post(&url)
                        .bearer_auth(&session.access_token)
                        .send()
                        .await?;
                    let status = response.status();
                    if !status.is_success() && status != StatusCode::UNAUTHORIZED {
                        return Err(auth_error_from_response(status, response).await);
                    }
                    Ok(())
                })
                .await;

            if let Err(e) = result {
                warn!("Server-side sign-out failed, clearing local session: {}", e);
            }
        }

        self.session.clear().await;
        Ok(())
    }
}

/// Map a non-success GoTrue response to an error.
async fn auth_error_from_response(
    status: StatusCode,
    response: reqwest::Response,
) -> SupabaseError {
    let retry_after: Option<u64> = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok());

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoTrueErrorBody>(&body)
        .ok()
        .and_then(|b| b.display_message())
        .unwrap_or_else(|| body.chars().take(200).collect());

    match status.as_u16() {
        429 => SupabaseError::RateLimited(retry_after.unwrap_or(1)),
        _ => SupabaseError::auth_error(message),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_json(expires_at: Option<i64>, expires_in: Option<i64>) -> TokenPayload {
        TokenPayload {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_in,
            expires_at,
            user: AuthUser {
                id: "user-1".to_string(),
                email: Some("a@b.c".to_string()),
                user_metadata: serde_json::Value::Null,
            },
        }
    }

    #[test]
    fn test_token_payload_prefers_absolute_expiry() {
        let fixed = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let session = payload_json(Some(fixed.timestamp()), Some(10)).to_session();
        assert_eq!(session.expires_at, fixed);
    }

    #[test]
    fn test_token_payload_falls_back_to_relative_expiry() {
        let before = Utc::now();
        let session = payload_json(None, Some(3600)).to_session();
        let elapsed = session.expires_at - before;
        assert!(elapsed >= chrono::Duration::seconds(3599));
        assert!(elapsed <= chrono::Duration::seconds(3601));
    }

    #[test]
    fn test_gotrue_error_body_message_priority() {
        let body: GoTrueErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(
            body.display_message(),
            Some("Invalid login credentials".to_string())
        );

        let body: GoTrueErrorBody =
            serde_json::from_str(r#"{"msg":"User already registered"}"#).unwrap();
        assert_eq!(
            body.display_message(),
            Some("User already registered".to_string())
        );

        let empty: GoTrueErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.display_message(), None);
    }

    #[test]
    fn test_token_payload_parses_gotrue_response() {
        let payload: TokenPayload = serde_json::from_str(
            r#"{
                "access_token": "jwt-here",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh-here",
                "user": {"id": "u-1", "email": "a@b.c", "user_metadata": {"full_name": "Asha"}}
            }"#,
        )
        .unwrap();
        assert_eq!(payload.access_token, "jwt-here");
        assert_eq!(payload.user.full_name(), Some("Asha"));
    }
}
