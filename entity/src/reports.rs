use crate::catalogs::CatalogStatus;
use crate::products::{CompetitionLevel, Product};
use crate::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary shown on the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_catalogs: u64,
    pub total_products: u64,
    pub opportunities: u64,
    pub average_margin: f64,
    pub active_analyses: u64,
    pub recent_catalogs: Vec<RecentCatalog>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecentCatalog {
    pub id: Id,
    pub name: String,
    pub status: CatalogStatus,
    pub total_products: u32,
    pub products_analyzed: u32,
    pub progress_percentage: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionBucket {
    pub level: CompetitionLevel,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginBucket {
    /// Label of the margin range, e.g. `"10-20%"`.
    pub range: String,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    pub total_products: u64,
    pub opportunities: u64,
    pub average_margin: f64,
    pub competition_distribution: Vec<CompetitionBucket>,
    pub margin_distribution: Vec<MarginBucket>,
    pub high_potential_products: Vec<Product>,
}
