//! Checkout flows: plan selection, coupon application, and the gateway
//! seam.
//!
//! The gateway sits behind a trait so the rest of the flow does not care
//! which payment widget is wired in. The production implementation calls
//! the `razorpay-payment` edge function, which creates the order
//! server-side with the caller's bearer token; the key secret never
//! reaches the client. A checkout whose final price is zero (free course,
//! 100% coupon) records its intent and never touches the gateway.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use jconnect_models::{
    CheckoutOrder, Course, CouponValidation, JobPlan, JobPlanTier, PaymentIntent, PaymentStatus,
    ProductType,
};
use jconnect_supabase::{PaymentsRepository, SupabaseClient};

use crate::error::{AppError, AppResult};

/// Order created by a checkout gateway.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GatewayOrder {
    /// Gateway-side order identifier, handed to the payment widget.
    pub id: String,
    /// Amount in paise, echoed back by the gateway.
    #[serde(default)]
    pub amount: i64,
    /// ISO currency code.
    #[serde(default)]
    pub currency: String,
}

/// Seam to the third-party payment widget.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Create a gateway order for the given amount.
    async fn create_order(&self, order: &CheckoutOrder) -> AppResult<GatewayOrder>;
}

/// Gateway backed by the `razorpay-payment` edge function.
pub struct RazorpayGateway {
    client: SupabaseClient,
}

impl RazorpayGateway {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CheckoutGateway for RazorpayGateway {
    async fn create_order(&self, order: &CheckoutOrder) -> AppResult<GatewayOrder> {
        let created: GatewayOrder = self
            .client
            .invoke_function("razorpay-payment", order)
            .await?;
        info!(
            order_id = %created.id,
            amount_paise = order.amount_paise,
            "Gateway order created"
        );
        Ok(created)
    }
}

/// A checkout in progress: the recorded intent, plus the gateway order
/// when one was needed.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub intent: PaymentIntent,
    pub gateway_order: Option<GatewayOrder>,
}

impl Checkout {
    /// Whether the purchase completed without the gateway.
    pub fn is_free(&self) -> bool {
        self.gateway_order.is_none()
    }
}

/// Drives a checkout end to end.
pub struct CheckoutFlow<'a, G: CheckoutGateway> {
    client: &'a SupabaseClient,
    gateway: &'a G,
}

impl<'a, G: CheckoutGateway> CheckoutFlow<'a, G> {
    pub fn new(client: &'a SupabaseClient, gateway: &'a G) -> Self {
        Self { client, gateway }
    }

    /// Validate a coupon against a purchase without starting a checkout.
    ///
    /// Used by the coupon field's "Apply" button; the rejection message
    /// comes back inside the validation rather than as an error.
    pub async fn apply_coupon(
        &self,
        code: &str,
        user_id: &str,
        product: ProductType,
        amount: i64,
    ) -> AppResult<CouponValidation> {
        let repo = PaymentsRepository::new(self.client.clone());
        Ok(repo.validate_coupon(code, user_id, product, amount).await?)
    }

    /// Begin a checkout for a product at a base price.
    ///
    /// A coupon, when given, is validated first; an invalid code becomes a
    /// field error on `coupon` and nothing is recorded. When the final
    /// price is zero the intent is recorded as free and the gateway is
    /// never called; otherwise a gateway order is created and recorded on
    /// the intent for the widget to pick up.
    pub async fn begin(
        &self,
        user_id: &str,
        product: ProductType,
        product_ref: Option<&str>,
        base_amount: i64,
        coupon_code: Option<&str>,
    ) -> AppResult<Checkout> {
        let repo = PaymentsRepository::new(self.client.clone());

        let (final_amount, coupon_id) = match coupon_code {
            Some(code) => {
                let validation = repo
                    .validate_coupon(code, user_id, product, base_amount)
                    .await?;
                if !validation.valid {
                    let message = validation
                        .message
                        .unwrap_or_else(|| "Invalid coupon code".to_string());
                    return Err(AppError::validation_on("coupon", message));
                }
                (validation.final_amount, validation.coupon_id)
            }
            None => (base_amount, None),
        };

        if final_amount == 0 {
            let mut intent =
                PaymentIntent::free(user_id, product, base_amount).with_optional_coupon(coupon_id);
            if let Some(reference) = product_ref {
                intent = intent.with_product_ref(reference);
            }
            let stored = repo.create_intent(&intent).await?;
            info!(intent_id = %stored.id, "Checkout completed free of charge");
            return Ok(Checkout {
                intent: stored,
                gateway_order: None,
            });
        }

        let receipt = format!("rcpt_{}", Uuid::new_v4().simple());
        let order = CheckoutOrder::for_rupees(final_amount, receipt, product);
        let gateway_order = self.gateway.create_order(&order).await?;

        let mut intent = PaymentIntent::new(user_id, product, base_amount, final_amount)
            .with_optional_coupon(coupon_id)
            .with_gateway_order(gateway_order.id.clone());
        if let Some(reference) = product_ref {
            intent = intent.with_product_ref(reference);
        }
        let stored = repo.create_intent(&intent).await?;

        Ok(Checkout {
            intent: stored,
            gateway_order: Some(gateway_order),
        })
    }

    /// Begin a job-posting checkout for a plan tier.
    pub async fn begin_job_post(
        &self,
        user_id: &str,
        tier: JobPlanTier,
        coupon_code: Option<&str>,
    ) -> AppResult<Checkout> {
        self.begin(
            user_id,
            ProductType::JobPost,
            Some(tier.as_str()),
            tier.price_inr(),
            coupon_code,
        )
        .await
    }

    /// Begin a checkout for a priced course.
    pub async fn begin_course(
        &self,
        user_id: &str,
        course: &Course,
        coupon_code: Option<&str>,
    ) -> AppResult<Checkout> {
        self.begin(
            user_id,
            ProductType::Course,
            Some(course.id.as_str()),
            course.effective_price(),
            coupon_code,
        )
        .await
    }

    /// Settle a checkout after the widget reports the outcome.
    pub async fn complete(&self, intent_id: &str, success: bool) -> AppResult<PaymentIntent> {
        let repo = PaymentsRepository::new(self.client.clone());
        let status = if success {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Failed
        };
        let settled = repo.mark_intent(intent_id, status, None).await?;
        if success {
            info!(%intent_id, "Checkout paid");
        } else {
            warn!(%intent_id, "Checkout failed or was abandoned");
        }
        Ok(settled)
    }
}

/// The posting plans shown on the wizard's payment step.
pub fn job_plans() -> Vec<JobPlan> {
    JobPlan::catalog()
}
