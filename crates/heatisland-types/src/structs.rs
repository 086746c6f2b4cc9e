//! Core structs: city profiles, annual records, and analysis results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Region;

// ---------------------------------------------------------------------------
// CityProfile
// ---------------------------------------------------------------------------

/// A city tracked by the dashboard.
///
/// Profiles are defined once in a static roster and never mutated. Only
/// `uhi_factor` and `warming_rate` affect the synthesized anomalies; the
/// rest is presentation metadata for the selector and chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CityProfile {
    /// Stable short identifier, also the key into [`AnnualRecord::city_anomalies`].
    pub id: &'static str,
    /// Name shown in the selector and legend.
    pub display_name: &'static str,
    /// Hex line colour.
    pub display_color: &'static str,
    /// Reference mean temperature in degrees Celsius (display only).
    pub base_temp: f64,
    /// Intensity of the urban heat island amplification.
    pub uhi_factor: f64,
    /// Multiplier applied to the global trend for this city.
    pub warming_rate: f64,
    /// Selector grouping.
    pub region: Region,
}

impl CityProfile {
    /// Key used for this city in a flattened chart row (`"<id>Anomaly"`).
    pub fn chart_key(&self) -> String {
        format!("{}Anomaly", self.id)
    }
}

// ---------------------------------------------------------------------------
// AnnualRecord
// ---------------------------------------------------------------------------

/// One synthesized year: the global anomaly plus one anomaly per city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AnnualRecord {
    /// Calendar year.
    pub year: i32,
    /// Global-average temperature anomaly in degrees Celsius.
    pub global_anomaly: f64,
    /// Per-city anomaly keyed by [`CityProfile::id`].
    pub city_anomalies: BTreeMap<String, f64>,
}

impl AnnualRecord {
    /// Look up a single city's anomaly.
    pub fn city_anomaly(&self, city_id: &str) -> Option<f64> {
        self.city_anomalies.get(city_id).copied()
    }

    /// Flatten into the row shape the chart library consumes:
    /// `{"year": .., "globalAnomaly": .., "<id>Anomaly": .., ...}`.
    pub fn to_chart_row(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut row = serde_json::Map::new();
        row.insert("year".to_owned(), serde_json::Value::from(self.year));
        row.insert(
            "globalAnomaly".to_owned(),
            serde_json::Value::from(self.global_anomaly),
        );
        for (id, anomaly) in &self.city_anomalies {
            row.insert(format!("{id}Anomaly"), serde_json::Value::from(*anomaly));
        }
        row
    }
}

// ---------------------------------------------------------------------------
// AnalysisResult
// ---------------------------------------------------------------------------

/// Structured narrative returned by the analysis service.
///
/// All four fields are required; a response missing any of them is treated
/// as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AnalysisResult {
    /// Short header for the analysed scenario (e.g. "2050 Business As Usual Projection").
    pub scenario_context: String,
    /// Prose summary of the trend.
    pub summary: String,
    /// Contributing factors, most important first.
    pub key_factors: Vec<String>,
    /// Policy-level recommendations, most important first.
    pub recommendations: Vec<String>,
}
