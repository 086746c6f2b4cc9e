//! Rendering of CLI output.
//!
//! Everything here writes to a `String`; `main` decides where it goes.
//! Machine-readable output always goes to stdout and logs to stderr.

use std::fmt::Write as _;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use heatisland_types::{AnalysisResult, AnnualRecord, CityProfile, Scenario};

use crate::error::AnalystError;

/// Output format for the `series` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SeriesFormat {
    /// Envelope with metadata and typed records.
    Json,
    /// One row per year, one column per city.
    Csv,
    /// Flat chart rows (`year`, `globalAnomaly`, `<id>Anomaly`, ...).
    Chart,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SeriesEnvelope<'a> {
    generated_at: String,
    scenario: Scenario,
    seed: Option<u64>,
    records: &'a [AnnualRecord],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisEnvelope<'a> {
    generated_at: String,
    scenario: Scenario,
    analysis: &'a AnalysisResult,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Render a series in the requested format.
pub fn render_series(
    records: &[AnnualRecord],
    scenario: Scenario,
    seed: Option<u64>,
    roster: &[CityProfile],
    format: SeriesFormat,
) -> Result<String, AnalystError> {
    match format {
        SeriesFormat::Json => Ok(serde_json::to_string_pretty(&SeriesEnvelope {
            generated_at: now(),
            scenario,
            seed,
            records,
        })?),
        SeriesFormat::Csv => Ok(series_csv(records, roster)),
        SeriesFormat::Chart => {
            let rows: Vec<Value> = records
                .iter()
                .map(|r| Value::Object(r.to_chart_row()))
                .collect();
            Ok(serde_json::to_string_pretty(&rows)?)
        }
    }
}

/// CSV with a `year,global,<ids...>` header in roster order. Cities missing
/// from a record leave an empty cell. No trailing newline.
pub fn series_csv(records: &[AnnualRecord], roster: &[CityProfile]) -> String {
    let mut out = String::from("year,global");
    for city in roster {
        out.push(',');
        out.push_str(city.id);
    }

    for record in records {
        let _ = write!(out, "\n{},{:.2}", record.year, record.global_anomaly);
        for city in roster {
            match record.city_anomaly(city.id) {
                Some(v) => {
                    let _ = write!(out, ",{v:.2}");
                }
                None => out.push(','),
            }
        }
    }
    out
}

/// Fixed-width roster listing.
pub fn roster_table<'a>(cities: impl IntoIterator<Item = &'a CityProfile>) -> String {
    let mut out = format!(
        "{:<10} {:<16} {:<8} {:>9} {:>5} {:>5}  {}\n",
        "id", "name", "color", "base (C)", "uhi", "rate", "region"
    );
    for city in cities {
        let _ = writeln!(
            out,
            "{:<10} {:<16} {:<8} {:>9.1} {:>5.2} {:>5.2}  {:?}",
            city.id,
            city.display_name,
            city.display_color,
            city.base_temp,
            city.uhi_factor,
            city.warming_rate,
            city.region,
        );
    }
    out
}

/// Pretty JSON envelope for a finished analysis.
pub fn render_analysis(
    scenario: Scenario,
    analysis: &AnalysisResult,
) -> Result<String, AnalystError> {
    Ok(serde_json::to_string_pretty(&AnalysisEnvelope {
        generated_at: now(),
        scenario,
        analysis,
    })?)
}
