use serde::{Deserialize, Serialize};

use crate::aggregate::MonthlySummary;

/// Per-period statistics handed to the narrative generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempStats {
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub count: u32,
}

impl From<&MonthlySummary> for TempStats {
    fn from(summary: &MonthlySummary) -> Self {
        Self {
            average: summary.average,
            min: summary.min,
            max: summary.max,
            count: summary.count,
        }
    }
}

/// Input for one analysis run: pre-aggregated statistics plus free-text
/// observations. The core never interprets the observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Display label for the analyzed range, e.g. "June 2025".
    pub month_year: String,
    pub morning_temp_stats: TempStats,
    pub evening_temp_stats: TempStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fridge_observations: Option<String>,
}

/// The four narrative fields returned by the model, passed through opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutput {
    pub temperature_stability: String,
    pub potential_reagent_risks: String,
    pub maintenance_recommendations: String,
    pub overall_assessment: String,
}
