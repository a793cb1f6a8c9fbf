//! Coupon types and discount math.
//!
//! Validation runs server-side through the `validate_coupon` procedure; the
//! same rules are implemented here as pure functions so callers can price
//! locally and tests can pin the semantics.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Product a coupon (or payment) applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    JobPost,
    Course,
}

impl ProductType {
    /// Get product type as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::JobPost => "job_post",
            ProductType::Course => "course",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a coupon can be redeemed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum CouponScope {
    /// Any product.
    #[default]
    All,
    /// Job postings only.
    JobPost,
    /// Courses only.
    Course,
}

impl CouponScope {
    /// Whether the scope covers the given product type.
    pub fn covers(&self, product: ProductType) -> bool {
        match self {
            CouponScope::All => true,
            CouponScope::JobPost => product == ProductType::JobPost,
            CouponScope::Course => product == ProductType::Course,
        }
    }
}

/// How a coupon's discount is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage of the purchase amount, floored to whole rupees.
    Percentage,
    /// Flat amount, capped at the purchase amount.
    Flat,
}

/// A coupon row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Coupon {
    /// Row primary key.
    pub id: String,

    /// Redemption code as typed by users.
    pub code: String,

    /// Discount computation kind.
    pub discount_type: DiscountKind,

    /// Percentage (0-100) or flat rupee amount, per `discount_type`.
    pub discount_value: i64,

    /// Redeemable from this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,

    /// Redeemable until this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,

    /// Total redemptions allowed across all users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<i64>,

    /// Redemptions so far.
    #[serde(default)]
    pub used_count: i64,

    /// Redemptions allowed per user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_user_limit: Option<i64>,

    /// Minimum purchase amount to qualify.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_purchase_amount: Option<i64>,

    /// Products the coupon applies to.
    #[serde(default)]
    pub applicable_to: CouponScope,

    /// Kill switch.
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Outcome of validating a coupon, mirroring the server procedure's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CouponValidation {
    /// Whether the coupon can be applied.
    pub valid: bool,

    /// Rejection reason when invalid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Matched coupon row, when valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_id: Option<String>,

    /// Rupees taken off the purchase.
    #[serde(default)]
    pub discount_amount: i64,

    /// Purchase amount after discount, never negative.
    #[serde(default)]
    pub final_amount: i64,
}

impl CouponValidation {
    /// An invalid outcome with a reason.
    pub fn invalid(message: impl Into<String>, amount: i64) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
            coupon_id: None,
            discount_amount: 0,
            final_amount: amount,
        }
    }

    /// A valid outcome for a coupon and computed discount.
    pub fn valid_for(coupon_id: impl Into<String>, discount: i64, amount: i64) -> Self {
        Self {
            valid: true,
            message: None,
            coupon_id: Some(coupon_id.into()),
            discount_amount: discount,
            final_amount: (amount - discount).max(0),
        }
    }
}

/// Compute the discount a coupon grants on `amount`.
///
/// Percentage discounts floor to whole rupees; flat discounts cap at the
/// amount so the result never exceeds what is being paid.
pub fn compute_discount(kind: DiscountKind, value: i64, amount: i64) -> i64 {
    match kind {
        DiscountKind::Percentage => amount * value / 100,
        DiscountKind::Flat => value.min(amount),
    }
}

impl Coupon {
    /// Evaluate this coupon against a purchase, applying the same rules as
    /// the server procedure. `uses_by_this_user` is the caller's prior
    /// redemption count.
    pub fn evaluate(
        &self,
        product: ProductType,
        amount: i64,
        uses_by_this_user: i64,
        now: DateTime<Utc>,
    ) -> CouponValidation {
        if !self.is_active {
            return CouponValidation::invalid("This coupon is no longer active", amount);
        }
        if let Some(from) = self.valid_from {
            if now < from {
                return CouponValidation::invalid("This coupon is not yet valid", amount);
            }
        }
        if let Some(until) = self.valid_until {
            if now > until {
                return CouponValidation::invalid("This coupon has expired", amount);
            }
        }
        if let Some(max) = self.max_uses {
            if self.used_count >= max {
                return CouponValidation::invalid("This coupon has reached its usage limit", amount);
            }
        }
        if let Some(limit) = self.per_user_limit {
            if uses_by_this_user >= limit {
                return CouponValidation::invalid(
                    "You have already used this coupon the maximum number of times",
                    amount,
                );
            }
        }
        if let Some(min) = self.min_purchase_amount {
            if amount < min {
                return CouponValidation::invalid(
                    format!("Minimum purchase amount of ₹{} required", min),
                    amount,
                );
            }
        }
        if !self.applicable_to.covers(product) {
            return CouponValidation::invalid(
                "This coupon does not apply to this product",
                amount,
            );
        }

        let discount = compute_discount(self.discount_type, self.discount_value, amount);
        CouponValidation::valid_for(self.id.clone(), discount, amount)
    }
}

/// A redemption record row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CouponUsage {
    /// Row primary key.
    pub id: String,

    /// Redeemed coupon.
    pub coupon_id: String,

    /// Redeeming user (profile ID).
    pub user_id: String,

    /// Product the redemption applied to.
    pub product_type: ProductType,

    /// Rupees discounted.
    pub discount_amount: i64,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_coupon() -> Coupon {
        let now = Utc::now();
        Coupon {
            id: "cp-1".to_string(),
            code: "WELCOME20".to_string(),
            discount_type: DiscountKind::Percentage,
            discount_value: 20,
            valid_from: Some(now - Duration::days(1)),
            valid_until: Some(now + Duration::days(30)),
            max_uses: Some(100),
            used_count: 0,
            per_user_limit: Some(1),
            min_purchase_amount: None,
            applicable_to: CouponScope::All,
            is_active: true,
            created_at: now,
        }
    }

    #[test]
    fn test_percentage_discount_floors() {
        // 20% of 1999 = 399.8, floored to 399
        assert_eq!(compute_discount(DiscountKind::Percentage, 20, 1999), 399);
        assert_eq!(compute_discount(DiscountKind::Percentage, 50, 3499), 1749);
        assert_eq!(compute_discount(DiscountKind::Percentage, 100, 500), 500);
    }

    #[test]
    fn test_flat_discount_caps_at_amount() {
        assert_eq!(compute_discount(DiscountKind::Flat, 500, 1999), 500);
        assert_eq!(compute_discount(DiscountKind::Flat, 5000, 1999), 1999);
    }

    #[test]
    fn test_valid_coupon_evaluation() {
        let coupon = sample_coupon();
        let result = coupon.evaluate(ProductType::JobPost, 1999, 0, Utc::now());
        assert!(result.valid);
        assert_eq!(result.discount_amount, 399);
        assert_eq!(result.final_amount, 1600);
        assert_eq!(result.coupon_id.as_deref(), Some("cp-1"));
    }

    #[test]
    fn test_final_amount_never_negative() {
        let mut coupon = sample_coupon();
        coupon.discount_type = DiscountKind::Flat;
        coupon.discount_value = 10_000;
        let result = coupon.evaluate(ProductType::Course, 499, 0, Utc::now());
        assert!(result.valid);
        assert_eq!(result.discount_amount, 499);
        assert_eq!(result.final_amount, 0);
    }

    #[test]
    fn test_inactive_coupon_rejected() {
        let mut coupon = sample_coupon();
        coupon.is_active = false;
        let result = coupon.evaluate(ProductType::JobPost, 1999, 0, Utc::now());
        assert!(!result.valid);
        assert_eq!(result.final_amount, 1999);
        assert!(result.message.unwrap().contains("no longer active"));
    }

    #[test]
    fn test_expired_and_not_yet_valid() {
        let now = Utc::now();
        let mut coupon = sample_coupon();
        coupon.valid_until = Some(now - Duration::days(1));
        let expired = coupon.evaluate(ProductType::JobPost, 1999, 0, now);
        assert!(!expired.valid);
        assert!(expired.message.unwrap().contains("expired"));

        let mut coupon = sample_coupon();
        coupon.valid_from = Some(now + Duration::days(1));
        let early = coupon.evaluate(ProductType::JobPost, 1999, 0, now);
        assert!(!early.valid);
        assert!(early.message.unwrap().contains("not yet valid"));
    }

    #[test]
    fn test_usage_limits() {
        let mut coupon = sample_coupon();
        coupon.max_uses = Some(10);
        coupon.used_count = 10;
        let exhausted = coupon.evaluate(ProductType::JobPost, 1999, 0, Utc::now());
        assert!(!exhausted.valid);
        assert!(exhausted.message.unwrap().contains("usage limit"));

        let coupon = sample_coupon();
        let reused = coupon.evaluate(ProductType::JobPost, 1999, 1, Utc::now());
        assert!(!reused.valid);
        assert!(reused.message.unwrap().contains("already used"));
    }

    #[test]
    fn test_minimum_purchase() {
        let mut coupon = sample_coupon();
        coupon.min_purchase_amount = Some(1000);
        let below = coupon.evaluate(ProductType::Course, 499, 0, Utc::now());
        assert!(!below.valid);
        assert!(below.message.unwrap().contains("Minimum purchase"));

        let above = coupon.evaluate(ProductType::Course, 1500, 0, Utc::now());
        assert!(above.valid);
    }

    #[test]
    fn test_scope_restriction() {
        let mut coupon = sample_coupon();
        coupon.applicable_to = CouponScope::JobPost;
        assert!(coupon.evaluate(ProductType::JobPost, 1999, 0, Utc::now()).valid);

        let course_attempt = coupon.evaluate(ProductType::Course, 499, 0, Utc::now());
        assert!(!course_attempt.valid);
        assert!(course_attempt.message.unwrap().contains("does not apply"));
    }

    #[test]
    fn test_scope_covers() {
        assert!(CouponScope::All.covers(ProductType::JobPost));
        assert!(CouponScope::All.covers(ProductType::Course));
        assert!(CouponScope::JobPost.covers(ProductType::JobPost));
        assert!(!CouponScope::JobPost.covers(ProductType::Course));
        assert!(!CouponScope::Course.covers(ProductType::JobPost));
    }
}
