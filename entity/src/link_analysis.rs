use crate::products::{CompetitionLevel, Recommendation};
use serde::{Deserialize, Serialize};

/// Batch of marketplace links priced with one cost setup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkAnalysisRequest {
    pub links: Vec<String>,
    pub cost: f64,
    pub tax_rate: f64,
    pub extra_costs: f64,
}

impl LinkAnalysisRequest {
    /// Builds a request from free text holding one link per line. Blank
    /// lines are dropped.
    pub fn from_lines(text: &str, cost: f64, tax_rate: f64, extra_costs: f64) -> Self {
        Self {
            links: text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            cost,
            tax_rate,
            extra_costs,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkAnalysisResult {
    pub link: String,
    pub product_name: String,
    pub cost: f64,
    pub market_price: f64,
    pub suggested_price: f64,
    pub net_margin: f64,
    pub roi: f64,
    pub competition_level: CompetitionLevel,
    pub recommendation: Recommendation,
    pub ai_justification: String,
}
