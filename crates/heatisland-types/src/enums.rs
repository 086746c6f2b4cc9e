//! Enumeration types for the Heat Island dashboard.
//!
//! Scenario literals serialize exactly as the front-end expects them
//! (`HISTORICAL`, `OPTIMISTIC`, `BAU`), as does the analysis status.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// First year of every synthesized series.
pub const START_YEAR: i32 = 1880;

/// The present-year cutoff. Years after this use the projection branch.
pub const PRESENT_YEAR: i32 = 2023;

/// Final year of a projected (non-historical) series.
pub const PROJECTION_END_YEAR: i32 = 2050;

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// A future-trajectory assumption selecting the projection branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "bindings/")]
pub enum Scenario {
    /// Observed period only, 1880 through 2023.
    Historical,
    /// Aggressive mitigation (RCP 2.6 / Paris Agreement goals) to 2050.
    Optimistic,
    /// Business as usual (RCP 8.5) to 2050.
    Bau,
}

impl Scenario {
    /// Every scenario, in selector order.
    pub const ALL: [Self; 3] = [Self::Historical, Self::Optimistic, Self::Bau];

    /// Last year covered by a series for this scenario.
    pub const fn end_year(self) -> i32 {
        match self {
            Self::Historical => PRESENT_YEAR,
            Self::Optimistic | Self::Bau => PROJECTION_END_YEAR,
        }
    }

    /// Whether the series extends past the present-year cutoff.
    pub const fn is_projection(self) -> bool {
        !matches!(self, Self::Historical)
    }

    /// The wire literal (`HISTORICAL`, `OPTIMISTIC`, `BAU`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Historical => "HISTORICAL",
            Self::Optimistic => "OPTIMISTIC",
            Self::Bau => "BAU",
        }
    }

    /// Label shown in the scenario selector.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Historical => "Historical Data",
            Self::Optimistic => "Optimistic 2050",
            Self::Bau => "Business As Usual",
        }
    }

    /// One-line description shown under the label.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Historical => "1880 - 2023 Observed",
            Self::Optimistic => "Aggressive Mitigation",
            Self::Bau => "Current trajectory to 2050",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known scenario.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scenario: {0} (expected historical, optimistic, or bau)")]
pub struct ScenarioParseError(pub String);

impl FromStr for Scenario {
    type Err = ScenarioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "historical" => Ok(Self::Historical),
            "optimistic" => Ok(Self::Optimistic),
            "bau" | "business_as_usual" | "business-as-usual" => Ok(Self::Bau),
            _ => Err(ScenarioParseError(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Grouping tag for the city selector. The engine ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Region {
    /// East, South-East, and South Asia.
    Asia,
    /// Reference cities outside Asia.
    World,
}

/// Returned when a string does not name a known region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown region: {0} (expected asia or world)")]
pub struct RegionParseError(pub String);

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asia" => Ok(Self::Asia),
            "world" => Ok(Self::World),
            _ => Err(RegionParseError(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisStatus
// ---------------------------------------------------------------------------

/// Lifecycle of the narrative analysis request as shown in the panel badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "bindings/")]
pub enum AnalysisStatus {
    /// No request has been made for the current series.
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request returned a result.
    Success,
    /// The last request failed.
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_serializes_as_upper_case_literal() {
        let json = serde_json::to_string(&Scenario::Bau).ok();
        assert_eq!(json.as_deref(), Some("\"BAU\""));

        let parsed: Result<Scenario, _> = serde_json::from_str("\"OPTIMISTIC\"");
        assert_eq!(parsed.ok(), Some(Scenario::Optimistic));
    }

    #[test]
    fn scenario_end_years() {
        assert_eq!(Scenario::Historical.end_year(), 2023);
        assert_eq!(Scenario::Optimistic.end_year(), 2050);
        assert_eq!(Scenario::Bau.end_year(), 2050);
        assert!(!Scenario::Historical.is_projection());
        assert!(Scenario::Bau.is_projection());
    }

    #[test]
    fn scenario_from_str_is_case_insensitive() {
        assert_eq!("Historical".parse::<Scenario>(), Ok(Scenario::Historical));
        assert_eq!(" bau ".parse::<Scenario>(), Ok(Scenario::Bau));
        assert_eq!("business-as-usual".parse::<Scenario>(), Ok(Scenario::Bau));
        assert!("rcp45".parse::<Scenario>().is_err());
    }

    #[test]
    fn scenario_display_matches_wire_literal() {
        for scenario in Scenario::ALL {
            let json = serde_json::to_string(&scenario).unwrap_or_default();
            assert_eq!(json, format!("\"{scenario}\""));
        }
    }

    #[test]
    fn analysis_status_serializes_upper_case() {
        let json = serde_json::to_string(&AnalysisStatus::Loading).unwrap_or_default();
        assert_eq!(json, "\"LOADING\"");
    }

    #[test]
    fn region_parsing() {
        assert_eq!("ASIA".parse::<Region>(), Ok(Region::Asia));
        assert_eq!("world".parse::<Region>(), Ok(Region::World));
        assert_eq!(
            "europe".parse::<Region>(),
            Err(RegionParseError("europe".to_owned()))
        );
        let message = "europe".parse::<Region>().err().map(|e| e.to_string());
        assert_eq!(
            message.as_deref(),
            Some("unknown region: europe (expected asia or world)")
        );
    }
}
