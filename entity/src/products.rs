use crate::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Analysis state of a single product.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Pending,
    Analyzing,
    Completed,
    Failed,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Pending => write!(fmt, "pending"),
            ProductStatus::Analyzing => write!(fmt, "analyzing"),
            ProductStatus::Completed => write!(fmt, "completed"),
            ProductStatus::Failed => write!(fmt, "failed"),
        }
    }
}

/// The analyzer's verdict on reselling a product.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Observe,
    Discard,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::Buy => write!(fmt, "buy"),
            Recommendation::Observe => write!(fmt, "observe"),
            Recommendation::Discard => write!(fmt, "discard"),
        }
    }
}

impl std::str::FromStr for Recommendation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Recommendation::Buy),
            "observe" => Ok(Recommendation::Observe),
            "discard" => Ok(Recommendation::Discard),
            other => Err(format!("unknown recommendation: {other}")),
        }
    }
}

/// How crowded the marketplace listing is.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for CompetitionLevel {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompetitionLevel::Low => write!(fmt, "low"),
            CompetitionLevel::Medium => write!(fmt, "medium"),
            CompetitionLevel::High => write!(fmt, "high"),
        }
    }
}

impl std::str::FromStr for CompetitionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(CompetitionLevel::Low),
            "medium" => Ok(CompetitionLevel::Medium),
            "high" => Ok(CompetitionLevel::High),
            other => Err(format!("unknown competition level: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub catalog_id: Id,
    pub sku: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub supplier_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_link: Option<String>,
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition_level: Option<CompetitionLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_justification: Option<String>,
    /// Raw marketplace data, passed through as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_data: Option<serde_json::Map<String, serde_json::Value>>,
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Product list filters, sent as query parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competition_level: Option<CompetitionLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_margin: Option<f64>,
}

/// One page of `products`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}
