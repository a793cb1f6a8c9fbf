//! Error types for application flows.

use std::collections::BTreeMap;

use thiserror::Error;

use jconnect_supabase::SupabaseError;

/// Result type for application flows.
pub type AppResult<T> = Result<T, AppError>;

/// Field-keyed validation messages from a wizard step.
///
/// Keys are form field names; values are the message rendered next to the
/// field. Backed by an ordered map so error lists render in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Create an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Whether every field validated.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The message for a field, when it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether a particular field failed.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Iterate over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Absorb another error map; later messages win on key collision.
    pub fn merge(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    /// `Ok(())` when empty, otherwise a validation error carrying the map.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Errors surfaced by application flows.
#[derive(Debug, Error)]
pub enum AppError {
    /// Local validation rejected the input; fix the named fields and retry.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// A flow was entered without something it needs (no signed-in user,
    /// no company profile, payment not completed).
    #[error("missing precondition: {0}")]
    MissingPrecondition(String),

    /// A backend call failed. The operation was abandoned, not retried.
    #[error("request failed: {0}")]
    Remote(#[from] SupabaseError),
}

impl AppError {
    /// Create a validation error for a single field.
    pub fn validation_on(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        AppError::Validation(errors)
    }

    /// Create a missing-precondition error.
    pub fn missing_precondition(message: impl Into<String>) -> Self {
        AppError::MissingPrecondition(message.into())
    }

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// Check if this is a missing-precondition error.
    pub fn is_missing_precondition(&self) -> bool {
        matches!(self, AppError::MissingPrecondition(_))
    }

    /// The field error map, when this is a validation error.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Whether the backend rejected a draft save for exceeding the cap.
    pub fn is_draft_cap(&self) -> bool {
        matches!(self, AppError::Remote(e) if e.is_draft_cap())
    }

    /// Whether the backend reported a duplicate row.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, AppError::Remote(e) if e.is_unique_violation())
    }
}
