use crate::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing state of an uploaded catalog.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogStatus {
    /// Uploaded, analysis not started
    #[default]
    Pending,
    /// Products are being read out of the file
    Extracting,
    /// Extracted products are being priced
    Analyzing,
    Completed,
    Paused,
    Failed,
}

impl std::fmt::Display for CatalogStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogStatus::Pending => write!(fmt, "pending"),
            CatalogStatus::Extracting => write!(fmt, "extracting"),
            CatalogStatus::Analyzing => write!(fmt, "analyzing"),
            CatalogStatus::Completed => write!(fmt, "completed"),
            CatalogStatus::Paused => write!(fmt, "paused"),
            CatalogStatus::Failed => write!(fmt, "failed"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub id: Id,
    pub user_id: Id,
    pub name: String,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub status: CatalogStatus,
    pub tax_rate: f64,
    pub extra_costs: f64,
    pub total_products: u32,
    pub products_extracted: u32,
    pub products_analyzed: u32,
    pub progress_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Info => write!(fmt, "info"),
            LogLevel::Warning => write!(fmt, "warning"),
            LogLevel::Error => write!(fmt, "error"),
        }
    }
}

/// A processing log line of a catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogLog {
    pub id: Id,
    pub catalog_id: Id,
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A catalog file to upload, sent as a multipart form.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogUpload {
    pub file_name: String,
    /// MIME type of `contents`, when known.
    pub mime: Option<String>,
    pub contents: Vec<u8>,
    pub tax_rate: f64,
    pub extra_costs: f64,
    /// Marketplace listings to compare against. Omitted from the form when empty.
    pub ml_links: Vec<String>,
}
