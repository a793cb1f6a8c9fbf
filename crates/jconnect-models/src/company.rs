//! Employer company types.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique company identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CompanyId(pub String);

impl CompanyId {
    /// Generate a new random company ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CompanyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CompanyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CompanyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An employer-owned company row.
///
/// Jobs and internships reference a company; the posting wizard refuses to
/// open until the employer has created one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Company {
    /// Row primary key.
    pub id: CompanyId,

    /// Owning employer (profile ID).
    pub employer_id: String,

    /// Company display name.
    pub name: String,

    /// Logo image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    /// Industry label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Headcount bracket, e.g. "11-50".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,

    /// Public website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// About-us text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Create a new company owned by the given employer.
    pub fn new(employer_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CompanyId::new(),
            employer_id: employer_id.into(),
            name: name.into(),
            logo_url: None,
            industry: None,
            company_size: None,
            website: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the industry label.
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Set the public website.
    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_builder() {
        let company = Company::new("emp-1", "Acme Talent")
            .with_industry("Recruiting")
            .with_website("https://acme.example");
        assert_eq!(company.employer_id, "emp-1");
        assert_eq!(company.industry.as_deref(), Some("Recruiting"));
        assert_eq!(company.website.as_deref(), Some("https://acme.example"));
        assert!(company.logo_url.is_none());
    }

    #[test]
    fn test_company_id_is_unique() {
        assert_ne!(CompanyId::new().as_str(), CompanyId::new().as_str());
    }
}
