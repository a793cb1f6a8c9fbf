//! Session storage for Supabase authentication.
//!
//! Provides a thread-safe, async-aware session store with:
//! - Refresh margin to avoid token expiry during requests
//! - Single-flight pattern to prevent thundering herd on refresh
//! - Graceful fallback to existing usable token on refresh failure

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{SupabaseError, SupabaseResult};
use crate::metrics::record_session_refresh;

// =============================================================================
// Constants
// =============================================================================

/// Refresh margin: refresh the session 60 seconds before the access token
/// expires.
const SESSION_REFRESH_MARGIN: i64 = 60;

// =============================================================================
// Session Types
// =============================================================================

/// Authenticated user as returned by GoTrue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Auth user id (UUID string).
    pub id: String,
    /// Email, if the account has one.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form metadata captured at sign-up.
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    /// Full name recorded in user metadata at sign-up, if any.
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata.get("full_name").and_then(|v| v.as_str())
    }
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for API requests.
    pub access_token: String,
    /// Token used to mint a new session when the access token expires.
    pub refresh_token: String,
    /// Absolute access token expiry.
    pub expires_at: DateTime<Utc>,
    /// The signed-in user.
    pub user: AuthUser,
}

impl Session {
    /// Build a session from a token grant, converting relative expiry to
    /// absolute.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in_secs: i64,
        user: AuthUser,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
            user,
        }
    }

    /// Check if the access token is still valid with refresh margin.
    pub fn is_valid(&self) -> bool {
        Utc::now() + Duration::seconds(SESSION_REFRESH_MARGIN) < self.expires_at
    }

    /// Check if the access token is technically still usable (even if a
    /// refresh is due).
    pub fn is_usable(&self) -> bool {
        Utc::now() < self.expires_at
    }

    /// Auth user id for the session.
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

// =============================================================================
// Session Store
// =============================================================================

/// Stored session with server-side rejection tracking.
///
/// `stale` is set when the server rejects the access token (401) before its
/// local expiry, which happens when the token was revoked out of band.
struct StoredSession {
    session: Session,
    stale: bool,
}

/// Thread-safe session store with single-flight refresh.
pub struct SessionStore {
    inner: RwLock<Option<StoredSession>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create an empty session store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Install a session (after sign-in, sign-up, or restore).
    pub async fn set(&self, session: Session) {
        let mut guard = self.inner.write().await;
        *guard = Some(StoredSession {
            session,
            stale: false,
        });
    }

    /// Drop the session (after sign-out).
    pub async fn clear(&self) {
        let mut guard = self.inner.write().await;
        *guard = None;
    }

    /// Mark the current access token as rejected by the server.
    pub async fn mark_stale(&self) {
        let mut guard = self.inner.write().await;
        if let Some(stored) = guard.as_mut() {
            stored.stale = true;
        }
    }

    /// Whether any session is present (valid or not).
    pub async fn has_session(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Clone of the current session, for persistence.
    pub async fn snapshot(&self) -> Option<Session> {
        self.inner.read().await.as_ref().map(|s| s.session.clone())
    }

    /// The signed-in user, if any.
    pub async fn current_user(&self) -> Option<AuthUser> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|s| s.session.user.clone())
    }

    /// Fast path: the access token if it is present, not stale, and within
    /// the refresh margin.
    pub async fn access_token_if_valid(&self) -> Option<String> {
        let guard = self.inner.read().await;
        match guard.as_ref() {
            Some(stored) if !stored.stale && stored.session.is_valid() => {
                Some(stored.session.access_token.clone())
            }
            _ => None,
        }
    }

    /// Refresh the session using the supplied grant exchange, returning a
    /// fresh access token.
    ///
    /// This method implements the single-flight pattern:
    /// - Double-check under the write lock: another task may have refreshed
    ///   while we waited, in which case its token is returned directly
    /// - The exchange runs while the lock is held, so concurrent callers
    ///   queue instead of each spending the refresh token
    /// - Fallback: on exchange failure, use the existing token if it is
    ///   still usable and was not rejected by the server
    pub async fn refresh_with<F, Fut>(&self, exchange: F) -> SupabaseResult<String>
    where
        F: FnOnce(String) -> Fut,
        Fut: std::future::Future<Output = SupabaseResult<Session>>,
    {
        let mut guard = self.inner.write().await;

        // Double-check: another task may have refreshed while we waited
        if let Some(stored) = guard.as_ref() {
            if !stored.stale && stored.session.is_valid() {
                return Ok(stored.session.access_token.clone());
            }
        }

        let refresh_token = match guard.as_ref() {
            Some(stored) => stored.session.refresh_token.clone(),
            None => {
                return Err(SupabaseError::auth_error(
                    "No active session to refresh. Sign in first.",
                ))
            }
        };

        match exchange(refresh_token).await {
            Ok(session) => {
                let access_token = session.access_token.clone();
                *guard = Some(StoredSession {
                    session,
                    stale: false,
                });
                record_session_refresh("ok");
                debug!("Refreshed Supabase session");
                Ok(access_token)
            }
            Err(e) => {
                record_session_refresh("failed");

                // On refresh failure, check if the existing token is still usable
                if let Some(stored) = guard.as_ref() {
                    if !stored.stale && stored.session.is_usable() {
                        warn!("Session refresh failed, using existing token: {}", e);
                        return Ok(stored.session.access_token.clone());
                    }
                }

                // The refresh token was rejected; the session is gone
                *guard = None;
                Err(SupabaseError::auth_error(format!(
                    "Failed to refresh session: {}",
                    e
                )))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn test_user() -> AuthUser {
        AuthUser {
            id: "user-1".to_string(),
            email: Some("seeker@example.com".to_string()),
            user_metadata: serde_json::json!({"full_name": "Asha Rao"}),
        }
    }

    fn session_expiring_in(secs: i64) -> Session {
        Session::new("access-1", "refresh-1", secs, test_user())
    }

    #[test]
    fn test_full_name_from_metadata() {
        assert_eq!(test_user().full_name(), Some("Asha Rao"));

        let anonymous = AuthUser {
            id: "user-2".to_string(),
            email: None,
            user_metadata: serde_json::Value::Null,
        };
        assert_eq!(anonymous.full_name(), None);
    }

    #[test]
    fn test_session_validity_margin() {
        // Plenty of time left
        assert!(session_expiring_in(3600).is_valid());

        // Inside the refresh margin: usable but due for refresh
        let in_margin = session_expiring_in(30);
        assert!(!in_margin.is_valid());
        assert!(in_margin.is_usable());

        // Already expired
        let expired = session_expiring_in(-10);
        assert!(!expired.is_valid());
        assert!(!expired.is_usable());
    }

    #[tokio::test]
    async fn test_set_and_snapshot() {
        let store = SessionStore::new();
        assert!(!store.has_session().await);
        assert!(store.snapshot().await.is_none());

        let session = session_expiring_in(3600);
        store.set(session.clone()).await;
        assert!(store.has_session().await);
        assert_eq!(store.snapshot().await, Some(session));
        assert_eq!(store.current_user().await.unwrap().id, "user-1");

        store.clear().await;
        assert!(!store.has_session().await);
    }

    #[tokio::test]
    async fn test_fast_path_skips_stale_tokens() {
        let store = SessionStore::new();
        store.set(session_expiring_in(3600)).await;
        assert_eq!(
            store.access_token_if_valid().await,
            Some("access-1".to_string())
        );

        store.mark_stale().await;
        assert_eq!(store.access_token_if_valid().await, None);
        // The session itself is still there for the refresh path
        assert!(store.has_session().await);
    }

    #[tokio::test]
    async fn test_refresh_without_session_fails() {
        let store = SessionStore::new();
        let result = store
            .refresh_with(|_rt| async { Ok(session_expiring_in(3600)) })
            .await;
        assert!(matches!(result, Err(SupabaseError::AuthError(_))));
    }

    #[tokio::test]
    async fn test_refresh_installs_new_session() {
        let store = SessionStore::new();
        store.set(session_expiring_in(-10)).await;

        let token = store
            .refresh_with(|rt| async move {
                assert_eq!(rt, "refresh-1");
                Ok(Session::new("access-2", "refresh-2", 3600, test_user()))
            })
            .await
            .unwrap();
        assert_eq!(token, "access-2");

        let current = store.snapshot().await.unwrap();
        assert_eq!(current.refresh_token, "refresh-2");
        assert_eq!(
            store.access_token_if_valid().await,
            Some("access-2".to_string())
        );
    }

    #[tokio::test]
    async fn test_refresh_double_check_returns_valid_token() {
        let store = SessionStore::new();
        store.set(session_expiring_in(3600)).await;

        // Token is still valid, so the exchange must not run
        let token = store
            .refresh_with(|_rt| async {
                panic!("exchange should not be invoked for a valid session");
            })
            .await
            .unwrap();
        assert_eq!(token, "access-1");
    }

    #[tokio::test]
    async fn test_refresh_failure_falls_back_to_usable_token() {
        let store = SessionStore::new();
        // Inside the margin: refresh is due but the token still works
        store.set(session_expiring_in(30)).await;

        let token = store
            .refresh_with(|_rt| async {
                Err(SupabaseError::request_failed(503, "gateway down"))
            })
            .await
            .unwrap();
        assert_eq!(token, "access-1");
        assert!(store.has_session().await);
    }

    #[tokio::test]
    async fn test_refresh_failure_with_stale_token_clears_session() {
        let store = SessionStore::new();
        store.set(session_expiring_in(3600)).await;
        store.mark_stale().await;

        let result = store
            .refresh_with(|_rt| async {
                Err(SupabaseError::request_failed(400, "refresh token revoked"))
            })
            .await;
        assert!(matches!(result, Err(SupabaseError::AuthError(_))));
        assert!(!store.has_session().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_refresh_single_flight() {
        let store = Arc::new(SessionStore::new());
        store.set(session_expiring_in(-10)).await;
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let store = Arc::clone(&store);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                store
                    .refresh_with(|_rt| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                        Ok(Session::new("access-2", "refresh-2", 3600, test_user()))
                    })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), "access-2");
        }
        // Only the first caller performs the exchange; the rest hit the
        // double-check after the write lock is released
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
