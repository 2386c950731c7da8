//! AI narrative contract: statistics in, four opaque text fields out.

mod types;

pub use types::{AnalysisOutput, AnalysisRequest, TempStats};

use async_trait::async_trait;

use crate::error::Result;

/// Seam for the hosted model that turns pre-aggregated statistics into
/// narrative text. Implementations own transport and retry policy; the core
/// neither validates nor parses the returned fields.
#[async_trait]
pub trait AnalysisProvider {
    async fn generate(&self, request: &AnalysisRequest) -> Result<AnalysisOutput>;
}

fn format_temp(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v}°C"))
}

/// Render the analysis prompt for a request. Deterministic, so a given month
/// of data always produces the same prompt text.
pub fn render_prompt(request: &AnalysisRequest) -> String {
    let morning = &request.morning_temp_stats;
    let evening = &request.evening_temp_stats;
    let observations = request
        .fridge_observations
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or("No specific observations provided.");

    format!(
        "You are a laboratory equipment specialist, an expert in industrial fridge maintenance and reagent storage.\n\
         Analyze the provided temperature log data and user observations for a reagent storage fridge for the month of {month_year}.\n\
         \n\
         Temperature Data:\n\
         Morning Readings ({morning_count} total):\n\
         - Average: {morning_avg}\n\
         - Minimum: {morning_min}\n\
         - Maximum: {morning_max}\n\
         \n\
         Evening Readings ({evening_count} total):\n\
         - Average: {evening_avg}\n\
         - Minimum: {evening_min}\n\
         - Maximum: {evening_max}\n\
         \n\
         User Observations:\n\
         {observations}\n\
         \n\
         Based on this information, provide a structured analysis covering the following:\n\
         1. Temperature Stability: Assess the stability. Are the fluctuations within acceptable limits for reagent storage? Is there a significant difference between min/max temperatures?\n\
         2. Potential Reagent Risks: Identify any potential risks to reagents. Common refrigerated reagents require a 2-8°C range. Highlight any deviations or concerning patterns.\n\
         3. Maintenance Recommendations: Suggest actionable maintenance based on the data and observations (e.g., defrosting, seal checks, thermostat calibration).\n\
         4. Overall Assessment: Give a concise summary of the fridge's performance for the month.\n\
         \n\
         Generate the output according to the defined schema. Be specific and practical in your advice.\n",
        month_year = request.month_year,
        morning_count = morning.count,
        morning_avg = format_temp(morning.average),
        morning_min = format_temp(morning.min),
        morning_max = format_temp(morning.max),
        evening_count = evening.count,
        evening_avg = format_temp(evening.average),
        evening_min = format_temp(evening.min),
        evening_max = format_temp(evening.max),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::MonthlySummary;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            month_year: "June 2025".to_string(),
            morning_temp_stats: TempStats {
                average: Some(3.5),
                min: Some(2.0),
                max: Some(5.0),
                count: 12,
            },
            evening_temp_stats: TempStats {
                average: None,
                min: None,
                max: None,
                count: 0,
            },
            fridge_observations: None,
        }
    }

    #[test]
    fn prompt_includes_stats_and_month() {
        let prompt = render_prompt(&request());
        assert!(prompt.contains("June 2025"));
        assert!(prompt.contains("Morning Readings (12 total)"));
        assert!(prompt.contains("- Average: 3.5°C"));
        assert!(prompt.contains("- Minimum: 2°C"));
    }

    #[test]
    fn prompt_renders_missing_stats_as_not_available() {
        let prompt = render_prompt(&request());
        assert!(prompt.contains("Evening Readings (0 total)"));
        assert!(prompt.contains("- Average: N/A"));
        assert!(prompt.contains("No specific observations provided."));
    }

    #[test]
    fn prompt_embeds_observations_verbatim() {
        let mut req = request();
        req.fridge_observations = Some("Frost buildup on the back wall.".to_string());

        let prompt = render_prompt(&req);
        assert!(prompt.contains("Frost buildup on the back wall."));
        assert!(!prompt.contains("No specific observations provided."));
    }

    #[test]
    fn wire_shapes_use_camel_case_field_names() {
        let json = serde_json::to_value(request()).unwrap();
        assert!(json.get("monthYear").is_some());
        assert!(json["morningTempStats"].get("average").is_some());
        // Absent observations are omitted entirely, not serialized as null.
        assert!(json.get("fridgeObservations").is_none());

        let output: AnalysisOutput = serde_json::from_str(
            r#"{"temperatureStability":"stable","potentialReagentRisks":"none",
                "maintenanceRecommendations":"check the door seals","overallAssessment":"ok"}"#,
        )
        .unwrap();
        assert_eq!(output.maintenance_recommendations, "check the door seals");
        assert_eq!(output.overall_assessment, "ok");
    }

    #[test]
    fn stats_come_straight_from_the_monthly_summary() {
        let summary = MonthlySummary {
            average: Some(4.2),
            min: Some(1.0),
            max: Some(7.5),
            count: 20,
        };

        let stats = TempStats::from(&summary);
        assert_eq!(stats.average, Some(4.2));
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(7.5));
        assert_eq!(stats.count, 20);
    }
}
