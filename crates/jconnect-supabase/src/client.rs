//! Supabase REST API client.
//!
//! Production-grade client with:
//! - Session caching with refresh margin and single-flight refresh
//! - HTTP client tuning (pooling, timeouts)
//! - One re-send after a server-side token rejection
//! - Observability (tracing spans, metrics)

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info_span, Instrument};

use crate::error::{PostgrestErrorBody, SupabaseError, SupabaseResult};
use crate::metrics::record_request;
use crate::query::Query;
use crate::session::SessionStore;

// =============================================================================
// Configuration
// =============================================================================

/// Supabase client configuration.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Publishable anon key; doubles as the bearer before sign-in.
    pub anon_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl SupabaseConfig {
    /// Create a config pointing at the given project.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> SupabaseResult<Self> {
        let url = std::env::var("SUPABASE_URL")
            .map_err(|_| SupabaseError::auth_error("SUPABASE_URL must be set"))?;
        if url.is_empty() {
            return Err(SupabaseError::auth_error("SUPABASE_URL cannot be empty"));
        }

        let anon_key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| SupabaseError::auth_error("SUPABASE_ANON_KEY must be set"))?;
        if anon_key.is_empty() {
            return Err(SupabaseError::auth_error(
                "SUPABASE_ANON_KEY cannot be empty",
            ));
        }

        let connect_timeout_secs: u64 = std::env::var("SUPABASE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let mut config = Self::new(url, anon_key);
        config.connect_timeout = Duration::from_secs(connect_timeout_secs);
        Ok(config)
    }

    /// Base URL for the PostgREST data endpoint.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    /// Base URL for the GoTrue auth endpoint.
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url)
    }

    /// Base URL for the storage endpoint.
    pub fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.url)
    }

    /// Base URL for edge functions.
    pub fn functions_url(&self) -> String {
        format!("{}/functions/v1", self.url)
    }
}

// =============================================================================
// Client
// =============================================================================

/// Supabase REST API client.
pub struct SupabaseClient {
    pub(crate) http: Client,
    pub(crate) config: SupabaseConfig,
    pub(crate) session: Arc<SessionStore>,
}

impl Clone for SupabaseClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            session: Arc::clone(&self.session),
        }
    }
}

impl SupabaseClient {
    /// Create a new Supabase client.
    pub fn new(config: SupabaseConfig) -> SupabaseResult<Self> {
        let mut headers = HeaderMap::new();
        let apikey = HeaderValue::from_str(&config.anon_key).map_err(|_| {
            SupabaseError::auth_error("SUPABASE_ANON_KEY contains invalid header characters")
        })?;
        headers.insert("apikey", apikey);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("jconnect-supabase/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SupabaseError::Network)?;

        Ok(Self {
            http,
            config,
            session: Arc::new(SessionStore::new()),
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> SupabaseResult<Self> {
        let config = SupabaseConfig::from_env()?;
        Self::new(config)
    }

    /// The session store backing this client.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Bearer token for the next request: a valid session token, a
    /// refreshed one if the session is due, or the anon key when signed out.
    pub(crate) async fn bearer_token(&self) -> SupabaseResult<String> {
        if let Some(token) = self.session.access_token_if_valid().await {
            return Ok(token);
        }
        if self.session.has_session().await {
            return self
                .session
                .refresh_with(|rt| self.exchange_refresh_token(rt))
                .await;
        }
        Ok(self.config.anon_key.clone())
    }

    /// Send an authenticated request built by `build`.
    ///
    /// On a 401 while signed in, the access token was revoked server-side:
    /// mark it stale, refresh, and re-send exactly once. A 401 on the anon
    /// key is returned as-is.
    pub(crate) async fn send_with_auth<F>(&self, build: F) -> SupabaseResult<reqwest::Response>
    where
        F: Fn(&Client, &str) -> reqwest::RequestBuilder,
    {
        let bearer = self.bearer_token().await?;
        let response = build(&self.http, &bearer).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.session.has_session().await {
            self.session.mark_stale().await;
            let bearer = self
                .session
                .refresh_with(|rt| self.exchange_refresh_token(rt))
                .await?;
            return Ok(build(&self.http, &bearer).send().await?);
        }

        Ok(response)
    }

    /// Build a table URL with its query string.
    fn table_url(&self, table: &str, query: &Query) -> String {
        let base = format!("{}/{}", self.config.rest_url(), table);
        if query.is_empty() {
            base
        } else {
            format!("{}?{}", base, query.build())
        }
    }

    // =========================================================================
    // PostgREST Operations
    // =========================================================================

    /// Select rows from a table.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
    ) -> SupabaseResult<Vec<T>> {
        let url = self.table_url(table, &query);

        self.execute("select", table, async {
            let response = self
                .send_with_auth(|http, bearer| http.get(&url).bearer_auth(bearer))
                .await?;

            match response.status() {
                StatusCode::OK => Ok(response.json().await?),
                status => Err(self.error_from_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Select at most one row from a table.
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
    ) -> SupabaseResult<Option<T>> {
        let rows: Vec<T> = self.select(table, query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row, returning the stored representation.
    pub async fn insert<T, R>(&self, table: &str, row: &T) -> SupabaseResult<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.table_url(table, &Query::new());

        self.execute("insert", table, async {
            let response = self
                .send_with_auth(|http, bearer| {
                    http.post(&url)
                        .bearer_auth(bearer)
                        .header("Prefer", "return=representation")
                        .json(row)
                })
                .await?;

            match response.status() {
                StatusCode::OK | StatusCode::CREATED => {
                    let mut rows: Vec<R> = response.json().await?;
                    if rows.is_empty() {
                        return Err(SupabaseError::invalid_response(format!(
                            "Insert into {} returned no rows",
                            table
                        )));
                    }
                    Ok(rows.remove(0))
                }
                status => Err(self.error_from_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Insert multiple rows, returning the stored representations.
    pub async fn insert_rows<T, R>(&self, table: &str, rows: &[T]) -> SupabaseResult<Vec<R>>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        if rows.is_empty() {
            return Ok(vec![]);
        }
        let url = self.table_url(table, &Query::new());

        self.execute("insert_rows", table, async {
            let response = self
                .send_with_auth(|http, bearer| {
                    http.post(&url)
                        .bearer_auth(bearer)
                        .header("Prefer", "return=representation")
                        .json(rows)
                })
                .await?;

            match response.status() {
                StatusCode::OK | StatusCode::CREATED => Ok(response.json().await?),
                status => Err(self.error_from_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Update rows matched by `query`, returning the updated rows.
    pub async fn update<P, R>(&self, table: &str, query: Query, patch: &P) -> SupabaseResult<Vec<R>>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        if !query.has_filters() {
            return Err(SupabaseError::request_failed(
                400,
                format!("Refusing update on {} without filters", table),
            ));
        }
        let url = self.table_url(table, &query);

        self.execute("update", table, async {
            let response = self
                .send_with_auth(|http, bearer| {
                    http.patch(&url)
                        .bearer_auth(bearer)
                        .header("Prefer", "return=representation")
                        .json(patch)
                })
                .await?;

            match response.status() {
                StatusCode::OK => Ok(response.json().await?),
                status => Err(self.error_from_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Delete rows matched by `query`.
    pub async fn delete(&self, table: &str, query: Query) -> SupabaseResult<()> {
        if !query.has_filters() {
            return Err(SupabaseError::request_failed(
                400,
                format!("Refusing delete on {} without filters", table),
            ));
        }
        let url = self.table_url(table, &query);

        self.execute("delete", table, async {
            let response = self
                .send_with_auth(|http, bearer| http.delete(&url).bearer_auth(bearer))
                .await?;

            match response.status() {
                StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
                status => Err(self.error_from_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Delete rows matched by `query`, returning how many went away.
    pub async fn delete_counting(&self, table: &str, query: Query) -> SupabaseResult<usize> {
        if !query.has_filters() {
            return Err(SupabaseError::request_failed(
                400,
                format!("Refusing delete on {} without filters", table),
            ));
        }
        let url = self.table_url(table, &query);

        self.execute("delete", table, async {
            let response = self
                .send_with_auth(|http, bearer| {
                    http.delete(&url)
                        .bearer_auth(bearer)
                        .header("Prefer", "return=representation")
                })
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let rows: Vec<serde_json::Value> = response.json().await?;
                    Ok(rows.len())
                }
                StatusCode::NO_CONTENT => Ok(0),
                status => Err(self.error_from_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Call a Postgres function through the RPC endpoint.
    pub async fn rpc<A, R>(&self, function: &str, args: &A) -> SupabaseResult<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/rpc/{}", self.config.rest_url(), function);

        self.execute("rpc", function, async {
            let response = self
                .send_with_auth(|http, bearer| http.post(&url).bearer_auth(bearer).json(args))
                .await?;

            match response.status() {
                StatusCode::OK => Ok(response.json().await?),
                status => Err(self.error_from_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Invoke an edge function.
    pub async fn invoke_function<A, R>(&self, name: &str, body: &A) -> SupabaseResult<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.config.functions_url(), name);

        self.execute("invoke_function", name, async {
            let response = self
                .send_with_auth(|http, bearer| http.post(&url).bearer_auth(bearer).json(body))
                .await?;

            match response.status() {
                StatusCode::OK => Ok(response.json().await?),
                status => Err(self.error_from_response(status, &url, response).await),
            }
        })
        .await
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Execute a request with tracing and metrics.
    pub(crate) async fn execute<T, F>(
        &self,
        operation: &str,
        target: &str,
        fut: F,
    ) -> SupabaseResult<T>
    where
        F: std::future::Future<Output = SupabaseResult<T>>,
    {
        let span = info_span!("supabase_request", operation = %operation, target = %target);

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }

    /// Map a non-success response to an error, consuming the body.
    pub(crate) async fn error_from_response(
        &self,
        status: StatusCode,
        url: &str,
        response: reqwest::Response,
    ) -> SupabaseError {
        let retry_after: Option<u64> = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());

        let body = response.text().await.unwrap_or_default();
        let parsed: Option<PostgrestErrorBody> = serde_json::from_str(&body).ok();

        if let Some(b) = &parsed {
            if b.is_draft_cap() {
                return SupabaseError::DraftCapReached;
            }
            if b.is_unique_violation() {
                return SupabaseError::UniqueViolation(b.display_message());
            }
        }

        let message = parsed
            .map(|b| b.display_message())
            .unwrap_or_else(|| body.chars().take(200).collect());

        match status.as_u16() {
            401 => SupabaseError::AuthError(message),
            403 => SupabaseError::PermissionDenied(message),
            404 => SupabaseError::NotFound(message),
            429 => SupabaseError::RateLimited(retry_after.unwrap_or(1)),
            s => SupabaseError::request_failed(s, format!("{} failed: {}", url, message)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_from_env_requires_url_and_key() {
        std::env::remove_var("SUPABASE_URL");
        std::env::remove_var("SUPABASE_ANON_KEY");
        assert!(SupabaseConfig::from_env().is_err());

        std::env::set_var("SUPABASE_URL", "https://abc.supabase.co");
        assert!(SupabaseConfig::from_env().is_err());

        std::env::set_var("SUPABASE_ANON_KEY", "anon-key");
        let config = SupabaseConfig::from_env().unwrap();
        assert_eq!(config.url, "https://abc.supabase.co");
        assert_eq!(config.anon_key, "anon-key");

        std::env::remove_var("SUPABASE_URL");
        std::env::remove_var("SUPABASE_ANON_KEY");
    }

    #[test]
    #[serial]
    fn test_config_default_timeouts() {
        std::env::set_var("SUPABASE_URL", "https://abc.supabase.co");
        std::env::set_var("SUPABASE_ANON_KEY", "anon-key");
        std::env::remove_var("SUPABASE_CONNECT_TIMEOUT_SECS");

        let config = SupabaseConfig::from_env().unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));

        std::env::remove_var("SUPABASE_URL");
        std::env::remove_var("SUPABASE_ANON_KEY");
    }

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = SupabaseConfig::new("https://abc.supabase.co/", "key");
        assert_eq!(config.rest_url(), "https://abc.supabase.co/rest/v1");
        assert_eq!(config.auth_url(), "https://abc.supabase.co/auth/v1");
        assert_eq!(config.storage_url(), "https://abc.supabase.co/storage/v1");
        assert_eq!(
            config.functions_url(),
            "https://abc.supabase.co/functions/v1"
        );
    }

    #[test]
    fn test_table_url_with_and_without_query() {
        let client =
            SupabaseClient::new(SupabaseConfig::new("https://abc.supabase.co", "key")).unwrap();
        assert_eq!(
            client.table_url("jobs", &Query::new()),
            "https://abc.supabase.co/rest/v1/jobs"
        );
        assert_eq!(
            client.table_url("jobs", &Query::new().eq("status", "active")),
            "https://abc.supabase.co/rest/v1/jobs?status=eq.active"
        );
    }
}
