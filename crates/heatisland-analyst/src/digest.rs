//! Condensed view of a series handed to the prompt templates.
//!
//! The model never sees the full series: only the first year, the
//! present-day cutoff and, for projections, the final year.

use serde::Serialize;

use heatisland_synthesis::{FOCUS_CITY_ID, focus_city};
use heatisland_types::{AnnualRecord, PRESENT_YEAR, Scenario};

use crate::error::AnalystError;

/// A single year in the digest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DigestPoint {
    /// Calendar year.
    pub year: i32,
    /// Global anomaly in °C.
    pub global_anomaly: f64,
    /// Focus-city anomaly in °C, if the record carries it.
    pub focus_anomaly: Option<f64>,
}

impl DigestPoint {
    fn from_record(record: &AnnualRecord) -> Self {
        Self {
            year: record.year,
            global_anomaly: record.global_anomaly,
            focus_anomaly: record.city_anomaly(FOCUS_CITY_ID),
        }
    }
}

/// Template context for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisDigest {
    /// Scenario wire literal (`HISTORICAL`, `OPTIMISTIC`, `BAU`).
    pub scenario: &'static str,
    /// Human label for the scenario.
    pub scenario_label: &'static str,
    /// One-line scenario description.
    pub scenario_description: &'static str,
    /// Whether the series extends past the present day.
    pub is_projection: bool,
    /// Display name of the focus city.
    pub focus_city: &'static str,
    /// First record in the series.
    pub baseline: DigestPoint,
    /// Record at the present-day cutoff, or the last record if absent.
    pub present: DigestPoint,
    /// Final record when the scenario projects.
    pub projection: Option<DigestPoint>,
}

impl AnalysisDigest {
    /// Build a digest from a generated series.
    ///
    /// # Errors
    ///
    /// Returns [`AnalystError::EmptySeries`] if `series` has no records.
    pub fn from_series(series: &[AnnualRecord], scenario: Scenario) -> Result<Self, AnalystError> {
        let (Some(first), Some(last)) = (series.first(), series.last()) else {
            return Err(AnalystError::EmptySeries);
        };

        let present = series
            .iter()
            .find(|r| r.year == PRESENT_YEAR)
            .unwrap_or(last);

        let projection = scenario
            .is_projection()
            .then(|| DigestPoint::from_record(last));

        Ok(Self {
            scenario: scenario.as_str(),
            scenario_label: scenario.label(),
            scenario_description: scenario.description(),
            is_projection: scenario.is_projection(),
            focus_city: focus_city().map_or(FOCUS_CITY_ID, |c| c.display_name),
            baseline: DigestPoint::from_record(first),
            present: DigestPoint::from_record(present),
            projection,
        })
    }
}
