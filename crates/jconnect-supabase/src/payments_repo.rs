//! Payment repository: coupon validation and payment intent rows.

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use jconnect_models::{CouponValidation, PaymentIntent, PaymentStatus, ProductType};

use crate::client::SupabaseClient;
use crate::error::{SupabaseError, SupabaseResult};
use crate::query::Query;

const PAYMENTS_TABLE: &str = "payments";

/// Arguments for the `validate_coupon` database function.
#[derive(Serialize)]
struct ValidateCouponArgs<'a> {
    in_code: &'a str,
    in_user_id: &'a str,
    in_product_type: &'a str,
    in_purchase_amount: i64,
}

/// Repository for checkout records.
pub struct PaymentsRepository {
    client: SupabaseClient,
}

impl PaymentsRepository {
    /// Create a new payments repository.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Validate a coupon against a purchase, server-side.
    ///
    /// Usage counting and the discount math live in the database function;
    /// an unknown code comes back as an invalid result, not an error.
    pub async fn validate_coupon(
        &self,
        code: &str,
        user_id: &str,
        product: ProductType,
        purchase_amount: i64,
    ) -> SupabaseResult<CouponValidation> {
        let args = ValidateCouponArgs {
            in_code: code,
            in_user_id: user_id,
            in_product_type: product.as_str(),
            in_purchase_amount: purchase_amount,
        };

        // Set-returning functions answer with an array; take the row.
        let value: serde_json::Value = self.client.rpc("validate_coupon", &args).await?;
        let row = match value {
            serde_json::Value::Array(mut rows) => {
                if rows.is_empty() {
                    return Ok(CouponValidation::invalid(
                        "Invalid coupon code",
                        purchase_amount,
                    ));
                }
                rows.remove(0)
            }
            other => other,
        };

        let validation: CouponValidation = serde_json::from_value(row)?;
        info!(
            "Coupon {} for user {}: valid={} final_amount={}",
            code, user_id, validation.valid, validation.final_amount
        );
        Ok(validation)
    }

    /// Record a checkout attempt.
    pub async fn create_intent(&self, intent: &PaymentIntent) -> SupabaseResult<PaymentIntent> {
        let stored: PaymentIntent = self.client.insert(PAYMENTS_TABLE, intent).await?;
        info!(
            "Created payment intent {} for user {} ({} -> {})",
            stored.id, stored.user_id, stored.base_amount, stored.final_amount
        );
        Ok(stored)
    }

    /// Settle a checkout attempt with its final status.
    pub async fn mark_intent(
        &self,
        intent_id: &str,
        status: PaymentStatus,
        gateway_order_id: Option<&str>,
    ) -> SupabaseResult<PaymentIntent> {
        let mut patch = serde_json::json!({
            "status": status.as_str(),
        });
        if let Some(order_id) = gateway_order_id {
            patch["gateway_order_id"] = serde_json::json!(order_id);
        }

        let mut rows: Vec<PaymentIntent> = self
            .client
            .update(PAYMENTS_TABLE, Query::new().eq("id", intent_id), &patch)
            .await?;
        if rows.is_empty() {
            return Err(SupabaseError::not_found(format!(
                "payment intent {}",
                intent_id
            )));
        }
        info!("Payment intent {} marked {}", intent_id, status.as_str());
        Ok(rows.remove(0))
    }

    /// List a user's checkout history, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> SupabaseResult<Vec<PaymentIntent>> {
        self.client
            .select(
                PAYMENTS_TABLE,
                Query::new()
                    .select("*")
                    .eq("user_id", user_id)
                    .order("created_at", true),
            )
            .await
    }

    /// List a user's paid purchases of one product type since a cutoff.
    pub async fn list_paid_since(
        &self,
        user_id: &str,
        product: ProductType,
        since: chrono::DateTime<Utc>,
    ) -> SupabaseResult<Vec<PaymentIntent>> {
        self.client
            .select(
                PAYMENTS_TABLE,
                Query::new()
                    .select("*")
                    .eq("user_id", user_id)
                    .eq("product_type", product.as_str())
                    .in_list(
                        "status",
                        &[PaymentStatus::Paid.as_str(), PaymentStatus::Free.as_str()],
                    )
                    .gte("created_at", since.to_rfc3339())
                    .order("created_at", true),
            )
            .await
    }
}
