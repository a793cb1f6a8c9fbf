//! Supabase client error types.

use thiserror::Error;

/// Result type for Supabase operations.
pub type SupabaseResult<T> = Result<T, SupabaseError>;

/// Errors from Supabase operations.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// Authentication failed or no usable session.
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Row or resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Insert violated a unique constraint (PostgREST code 23505).
    #[error("Already exists: {0}")]
    UniqueViolation(String),

    /// The per-user draft cap rejected an insert.
    #[error("Maximum 5 drafts allowed. Please delete an existing draft first.")]
    DraftCapReached,

    /// Row-level security or grants rejected the request.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The server rejected the request.
    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// The response body was not in the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limited; retry after the given seconds.
    #[error("Rate limited, retry after {0}s")]
    RateLimited(u64),

    /// Network-level failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SupabaseError {
    /// Create an auth error.
    pub fn auth_error(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    /// Create a not-found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a request-failed error.
    pub fn request_failed(status: u16, msg: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: msg.into(),
        }
    }

    /// Create an invalid-response error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Whether this is a missing-row error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this is a unique-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Whether the draft cap rejected the write.
    pub fn is_draft_cap(&self) -> bool {
        matches!(self, Self::DraftCapReached)
    }

    /// HTTP status associated with this error, for metrics.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::AuthError(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::UniqueViolation(_) => Some(409),
            Self::DraftCapReached => Some(400),
            Self::PermissionDenied(_) => Some(403),
            Self::RequestFailed { status, .. } => Some(*status),
            Self::RateLimited(_) => Some(429),
            Self::InvalidResponse(_) | Self::Network(_) | Self::Json(_) => None,
        }
    }
}

/// Error body shape returned by PostgREST.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct PostgrestErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl PostgrestErrorBody {
    /// Best human-readable message from the body.
    pub fn display_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.details.clone())
            .or_else(|| self.hint.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }

    /// Whether this is a unique-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        self.code.as_deref() == Some("23505")
    }

    /// Whether a trigger rejected the write for the draft cap.
    ///
    /// The cap is enforced by a database trigger that raises with a fixed
    /// message; P0001 is Postgres's raise_exception code.
    pub fn is_draft_cap(&self) -> bool {
        let raised = self.code.as_deref() == Some("P0001");
        let mentions_cap = self
            .message
            .as_deref()
            .map(|m| m.contains("Maximum 5 drafts"))
            .unwrap_or(false);
        mentions_cap || (raised && self.message.as_deref().unwrap_or("").contains("draft"))
    }
}
