use crate::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Trial,
    Pro,
    Enterprise,
}

impl std::fmt::Display for SubscriptionPlan {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionPlan::Trial => write!(fmt, "trial"),
            SubscriptionPlan::Pro => write!(fmt, "pro"),
            SubscriptionPlan::Enterprise => write!(fmt, "enterprise"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    Canceled,
    Trialing,
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(fmt, "active"),
            SubscriptionStatus::Inactive => write!(fmt, "inactive"),
            SubscriptionStatus::Canceled => write!(fmt, "canceled"),
            SubscriptionStatus::Trialing => write!(fmt, "trialing"),
        }
    }
}

/// A usage cap. The backend sends a count, or `-1` for no cap; the string
/// `"unlimited"` is also accepted.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "LimitRepr", into = "LimitRepr")]
pub enum Limit {
    Count(u64),
    Unlimited,
}

impl Limit {
    /// Whether `used` more units still fit under this cap.
    pub fn allows(&self, used: u64) -> bool {
        match self {
            Limit::Count(max) => used < *max,
            Limit::Unlimited => true,
        }
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Count(count) => write!(fmt, "{count}"),
            Limit::Unlimited => write!(fmt, "unlimited"),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum LimitRepr {
    Count(i64),
    Text(String),
}

impl TryFrom<LimitRepr> for Limit {
    type Error = String;

    fn try_from(repr: LimitRepr) -> Result<Self, Self::Error> {
        match repr {
            // The backend reports unlimited as -1.
            LimitRepr::Count(count) if count < 0 => Ok(Limit::Unlimited),
            LimitRepr::Count(count) => Ok(Limit::Count(count.unsigned_abs())),
            LimitRepr::Text(text) if text == "unlimited" => Ok(Limit::Unlimited),
            LimitRepr::Text(text) => Err(format!("invalid limit: {text}")),
        }
    }
}

impl From<Limit> for LimitRepr {
    fn from(limit: Limit) -> Self {
        match limit {
            Limit::Count(count) => LimitRepr::Count(i64::try_from(count).unwrap_or(i64::MAX)),
            Limit::Unlimited => LimitRepr::Count(-1),
        }
    }
}

/// The signed-in user's subscription.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Id,
    pub user_id: Id,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_subscription_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_end: Option<DateTime<Utc>>,
    pub catalogs_limit: Limit,
    pub products_per_catalog_limit: Limit,
    pub catalogs_used_this_month: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A plan offered for purchase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_days: Option<u32>,
    pub catalogs_limit: Limit,
    pub products_limit: Limit,
    pub features: Vec<String>,
}

/// Body of `subscriptions/plans`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlansResponse {
    pub plans: Vec<Plan>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub catalogs_used: u64,
    pub catalogs_limit: Limit,
    pub products_per_catalog_limit: Limit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_end: Option<DateTime<Utc>>,
}

impl UsageStats {
    pub fn can_upload_catalog(&self) -> bool {
        self.catalogs_limit.allows(self.catalogs_used)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub plan_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Hosted checkout page to send the user to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub checkout_url: String,
    pub session_id: String,
}
