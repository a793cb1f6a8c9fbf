//! Payment intent types.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coupon::ProductType;

/// Lifecycle of a payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Order created with the gateway, awaiting completion.
    #[default]
    Created,
    /// Gateway confirmed payment.
    Paid,
    /// Gateway reported failure or the user abandoned checkout.
    Failed,
    /// Zero-amount purchase that skipped the gateway entirely.
    Free,
}

impl PaymentStatus {
    /// Get status as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Created => "created",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Free => "free",
        }
    }

    /// Parse from string. Unknown values map to `Failed`.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "created" => PaymentStatus::Created,
            "paid" => PaymentStatus::Paid,
            "free" => PaymentStatus::Free,
            _ => PaymentStatus::Failed,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment intent row recording an initiated checkout.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaymentIntent {
    /// Row primary key.
    pub id: String,

    /// Paying user (profile ID).
    pub user_id: String,

    /// What is being bought.
    pub product_type: ProductType,

    /// Product row the purchase is for (job plan tier or course ID).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_ref: Option<String>,

    /// Price before discount, in rupees.
    pub base_amount: i64,

    /// Rupees taken off by a coupon.
    #[serde(default)]
    pub discount_amount: i64,

    /// Amount actually charged, in rupees.
    pub final_amount: i64,

    /// Applied coupon, when one was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_id: Option<String>,

    /// Gateway order identifier, absent for free checkouts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_order_id: Option<String>,

    /// Lifecycle status.
    #[serde(default)]
    pub status: PaymentStatus,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl PaymentIntent {
    /// Create an intent for a gateway-backed checkout.
    pub fn new(
        user_id: impl Into<String>,
        product_type: ProductType,
        base_amount: i64,
        final_amount: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            product_type,
            product_ref: None,
            base_amount,
            discount_amount: base_amount - final_amount,
            final_amount,
            coupon_id: None,
            gateway_order_id: None,
            status: PaymentStatus::Created,
            created_at: Utc::now(),
        }
    }

    /// Create an intent for a free (or fully discounted) checkout.
    pub fn free(user_id: impl Into<String>, product_type: ProductType, base_amount: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            product_type,
            product_ref: None,
            base_amount,
            discount_amount: base_amount,
            final_amount: 0,
            coupon_id: None,
            gateway_order_id: None,
            status: PaymentStatus::Free,
            created_at: Utc::now(),
        }
    }

    /// Reference the product row being purchased.
    pub fn with_product_ref(mut self, product_ref: impl Into<String>) -> Self {
        self.product_ref = Some(product_ref.into());
        self
    }

    /// Attach the applied coupon.
    pub fn with_coupon(mut self, coupon_id: impl Into<String>) -> Self {
        self.coupon_id = Some(coupon_id.into());
        self
    }

    /// Attach the applied coupon when one exists.
    pub fn with_optional_coupon(mut self, coupon_id: Option<String>) -> Self {
        self.coupon_id = coupon_id;
        self
    }

    /// Record the gateway order identifier.
    pub fn with_gateway_order(mut self, order_id: impl Into<String>) -> Self {
        self.gateway_order_id = Some(order_id.into());
        self
    }

    /// Whether this checkout skips the gateway.
    pub fn is_free_flow(&self) -> bool {
        self.final_amount == 0
    }
}

/// Order descriptor handed to a checkout gateway.
///
/// Gateways take the charge amount in paise (hundredths of a rupee).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckoutOrder {
    /// Amount to charge, in paise.
    pub amount_paise: i64,
    /// ISO currency code.
    pub currency: String,
    /// Free-form receipt reference.
    pub receipt: String,
    /// What is being bought.
    pub product_type: ProductType,
}

impl CheckoutOrder {
    /// Build an order for a rupee amount.
    pub fn for_rupees(amount_inr: i64, receipt: impl Into<String>, product_type: ProductType) -> Self {
        Self {
            amount_paise: amount_inr * 100,
            currency: "INR".to_string(),
            receipt: receipt.into(),
            product_type,
        }
    }
}
