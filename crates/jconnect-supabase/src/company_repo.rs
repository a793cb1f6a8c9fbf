//! Company repository backed by the `companies` table.

use chrono::Utc;
use tracing::info;

use jconnect_models::Company;

use crate::client::SupabaseClient;
use crate::error::{SupabaseError, SupabaseResult};
use crate::query::Query;

const TABLE: &str = "companies";

/// Repository for employer company records.
pub struct CompanyRepository {
    client: SupabaseClient,
}

impl CompanyRepository {
    /// Create a new company repository.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Get a company by id.
    pub async fn get(&self, company_id: &str) -> SupabaseResult<Option<Company>> {
        self.client
            .select_single(TABLE, Query::new().select("*").eq("id", company_id))
            .await
    }

    /// Get an employer's company, if they have created one.
    pub async fn get_for_employer(&self, employer_id: &str) -> SupabaseResult<Option<Company>> {
        self.client
            .select_single(
                TABLE,
                Query::new().select("*").eq("employer_id", employer_id),
            )
            .await
    }

    /// Insert a new company record.
    pub async fn create(&self, company: &Company) -> SupabaseResult<Company> {
        let stored: Company = self.client.insert(TABLE, company).await?;
        info!(
            "Created company {} ({}) for employer {}",
            stored.id, stored.name, stored.employer_id
        );
        Ok(stored)
    }

    /// Replace a company's mutable columns with the given state.
    pub async fn update(&self, company: &Company) -> SupabaseResult<Company> {
        let mut patch = serde_json::to_value(company)?;
        if let Some(obj) = patch.as_object_mut() {
            obj.remove("id");
            obj.remove("employer_id");
            obj.remove("created_at");
            obj.insert(
                "updated_at".to_string(),
                serde_json::json!(Utc::now().to_rfc3339()),
            );
        }

        let mut rows: Vec<Company> = self
            .client
            .update(TABLE, Query::new().eq("id", company.id.as_str()), &patch)
            .await?;
        if rows.is_empty() {
            return Err(SupabaseError::not_found(format!(
                "company {}",
                company.id
            )));
        }
        info!("Updated company {}", company.id);
        Ok(rows.remove(0))
    }
}
