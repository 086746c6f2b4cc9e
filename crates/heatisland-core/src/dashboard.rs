//! Dashboard shell state.
//!
//! Owns everything the front-end toggles: the active scenario and its
//! series, the selected cities, the global-line toggle, and the status of
//! the narrative analysis request.
//!
//! # Analysis lifecycle
//!
//! ```text
//! Idle --begin--> Loading --finish(Ok)--> Success
//!                    |   \--finish(Err)-> Error
//!                    \--finish(stale)---> Idle
//! ```
//!
//! Only one request may be in flight. Each [`AnalysisTicket`] remembers the
//! series generation it was issued for; if the scenario changes before the
//! request finishes, the outcome is discarded.

use std::fmt::Display;

use heatisland_synthesis::{FOCUS_CITY_ID, NoiseSource, find_city, generate_series};
use heatisland_types::{AnalysisResult, AnalysisStatus, AnnualRecord, CityProfile, Scenario};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::DashboardError;

/// Cities selected when the dashboard opens.
const INITIAL_CITIES: [&str; 2] = [FOCUS_CITY_ID, "tokyo"];

/// State of the narrative analysis panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisState {
    /// Nothing requested for the current series.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request succeeded.
    Success(AnalysisResult),
    /// The last request failed. No failure detail is kept.
    Error,
}

impl AnalysisState {
    /// The status badge for this state.
    pub const fn status(&self) -> AnalysisStatus {
        match self {
            Self::Idle => AnalysisStatus::Idle,
            Self::Loading => AnalysisStatus::Loading,
            Self::Success(_) => AnalysisStatus::Success,
            Self::Error => AnalysisStatus::Error,
        }
    }
}

/// Proof that an analysis was started, tied to one series generation.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an analysis ticket must be passed to `finish_analysis`"]
pub struct AnalysisTicket {
    generation: u64,
}

/// The dashboard shell.
pub struct Dashboard<N> {
    noise: N,
    scenario: Scenario,
    series: Vec<AnnualRecord>,
    generation: u64,
    selected: Vec<&'static CityProfile>,
    show_global: bool,
    analysis: AnalysisState,
}

impl<N: NoiseSource> Dashboard<N> {
    /// Open the dashboard on the historical scenario.
    pub fn new(noise: N) -> Self {
        Self::with_scenario(noise, Scenario::Historical)
    }

    /// Open the dashboard on a given scenario.
    pub fn with_scenario(mut noise: N, scenario: Scenario) -> Self {
        let series = generate_series(scenario, &mut noise);
        let selected = INITIAL_CITIES.iter().filter_map(|id| find_city(id)).collect();
        Self {
            noise,
            scenario,
            series,
            generation: 0,
            selected,
            show_global: true,
            analysis: AnalysisState::Idle,
        }
    }

    /// The active scenario.
    pub const fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// The full series for the active scenario.
    pub fn series(&self) -> &[AnnualRecord] {
        &self.series
    }

    /// Switch scenario and regenerate the whole series.
    ///
    /// Returns `false` when `scenario` is already active. A successful
    /// analysis no longer describes the new series and is cleared.
    pub fn set_scenario(&mut self, scenario: Scenario) -> bool {
        if scenario == self.scenario {
            return false;
        }

        self.series = generate_series(scenario, &mut self.noise);
        self.scenario = scenario;
        self.generation = self.generation.wrapping_add(1);

        if matches!(self.analysis, AnalysisState::Success(_)) {
            self.analysis = AnalysisState::Idle;
        }

        info!(
            scenario = %scenario,
            records = self.series.len(),
            generation = self.generation,
            "scenario changed, series regenerated"
        );
        true
    }

    /// Cities currently drawn, in selection order.
    pub fn selected_cities(&self) -> &[&'static CityProfile] {
        &self.selected
    }

    /// Whether `city_id` is currently drawn.
    pub fn is_selected(&self, city_id: &str) -> bool {
        self.selected.iter().any(|c| c.id == city_id)
    }

    /// Add or remove a city from the chart.
    ///
    /// Returns whether the city is selected afterwards. The focus city is
    /// pinned: toggling it off is ignored.
    pub fn toggle_city(&mut self, city_id: &str) -> Result<bool, DashboardError> {
        let city = find_city(city_id).ok_or_else(|| DashboardError::UnknownCity(city_id.to_owned()))?;

        if self.is_selected(city.id) {
            if city.id == FOCUS_CITY_ID {
                debug!(city = city.id, "focus city is pinned, ignoring deselect");
                return Ok(true);
            }
            self.selected.retain(|c| c.id != city.id);
            Ok(false)
        } else {
            self.selected.push(city);
            Ok(true)
        }
    }

    /// Whether the global baseline is drawn.
    pub const fn show_global(&self) -> bool {
        self.show_global
    }

    /// Flip the global baseline visibility. Returns the new value.
    pub const fn toggle_global(&mut self) -> bool {
        self.show_global = !self.show_global;
        self.show_global
    }

    /// Chart rows restricted to what is visible: `year`, `globalAnomaly`
    /// when the baseline is shown, and `<id>Anomaly` per selected city.
    pub fn visible_rows(&self) -> Vec<Map<String, Value>> {
        self.series
            .iter()
            .map(|record| {
                let mut row = Map::new();
                row.insert("year".to_owned(), Value::from(record.year));
                if self.show_global {
                    row.insert("globalAnomaly".to_owned(), Value::from(record.global_anomaly));
                }
                for city in &self.selected {
                    if let Some(anomaly) = record.city_anomaly(city.id) {
                        row.insert(city.chart_key(), Value::from(anomaly));
                    }
                }
                row
            })
            .collect()
    }

    /// Current analysis state.
    pub const fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    /// Current analysis status badge.
    pub const fn analysis_status(&self) -> AnalysisStatus {
        self.analysis.status()
    }

    /// The last successful analysis, if the panel is showing one.
    pub const fn analysis_result(&self) -> Option<&AnalysisResult> {
        match &self.analysis {
            AnalysisState::Success(result) => Some(result),
            _ => None,
        }
    }

    /// Start an analysis request for the current series.
    ///
    /// Refused while another request is in flight.
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, DashboardError> {
        if matches!(self.analysis, AnalysisState::Loading) {
            return Err(DashboardError::AnalysisInFlight);
        }
        self.analysis = AnalysisState::Loading;
        debug!(generation = self.generation, scenario = %self.scenario, "analysis started");
        Ok(AnalysisTicket {
            generation: self.generation,
        })
    }

    /// Record the outcome of a request started with [`Dashboard::begin_analysis`].
    ///
    /// Any error becomes the single terminal `Error` state. An outcome for
    /// a series that has since been replaced is dropped and the panel
    /// returns to `Idle`.
    pub fn finish_analysis<E: Display>(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<AnalysisResult, E>,
    ) -> AnalysisStatus {
        if ticket.generation != self.generation {
            debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "discarding analysis for a replaced series"
            );
            self.analysis = AnalysisState::Idle;
            return self.analysis_status();
        }

        self.analysis = match outcome {
            Ok(result) => AnalysisState::Success(result),
            Err(e) => {
                warn!(error = %e, scenario = %self.scenario, "analysis failed");
                AnalysisState::Error
            }
        };
        self.analysis_status()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use heatisland_synthesis::{MidpointNoise, RngNoise};

    use super::*;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            scenario_context: "Historical Record 1880-2023".to_owned(),
            summary: "Taipei diverges from the global line after 1950.".to_owned(),
            key_factors: vec!["basin topography".to_owned()],
            recommendations: vec!["expand green corridors".to_owned()],
        }
    }

    #[test]
    fn opens_on_historical_with_focus_and_tokyo() {
        let dashboard = Dashboard::new(MidpointNoise);
        assert_eq!(dashboard.scenario(), Scenario::Historical);
        assert_eq!(dashboard.series().len(), 144);
        let ids: Vec<&str> = dashboard.selected_cities().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["taipei", "tokyo"]);
        assert!(dashboard.show_global());
        assert_eq!(dashboard.analysis_status(), AnalysisStatus::Idle);
    }

    #[test]
    fn scenario_change_regenerates_series() {
        let mut dashboard = Dashboard::new(RngNoise::seeded(3));
        assert!(dashboard.set_scenario(Scenario::Bau));
        assert_eq!(dashboard.series().len(), 171);
        assert_eq!(dashboard.series().last().map(|r| r.year), Some(2050));
        assert!(!dashboard.set_scenario(Scenario::Bau));
        assert!(dashboard.set_scenario(Scenario::Historical));
        assert_eq!(dashboard.series().len(), 144);
    }

    #[test]
    fn focus_city_is_pinned() {
        let mut dashboard = Dashboard::new(MidpointNoise);
        assert_eq!(dashboard.toggle_city("taipei"), Ok(true));
        assert!(dashboard.is_selected("taipei"));
    }

    #[test]
    fn toggling_other_cities() {
        let mut dashboard = Dashboard::new(MidpointNoise);
        assert_eq!(dashboard.toggle_city("tokyo"), Ok(false));
        assert!(!dashboard.is_selected("tokyo"));
        assert_eq!(dashboard.toggle_city("london"), Ok(true));
        let ids: Vec<&str> = dashboard.selected_cities().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["taipei", "london"]);
    }

    #[test]
    fn unknown_city_is_rejected() {
        let mut dashboard = Dashboard::new(MidpointNoise);
        assert_eq!(
            dashboard.toggle_city("atlantis"),
            Err(DashboardError::UnknownCity("atlantis".to_owned()))
        );
    }

    #[test]
    fn visible_rows_follow_toggles() {
        let mut dashboard = Dashboard::new(MidpointNoise);
        let rows = dashboard.visible_rows();
        assert_eq!(rows.len(), 144);
        let first = rows.first().cloned().unwrap_or_default();
        assert!(first.contains_key("globalAnomaly"));
        assert!(first.contains_key("taipeiAnomaly"));
        assert!(first.contains_key("tokyoAnomaly"));
        assert!(!first.contains_key("londonAnomaly"));

        assert!(!dashboard.toggle_global());
        let first = dashboard.visible_rows().first().cloned().unwrap_or_default();
        assert!(!first.contains_key("globalAnomaly"));
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn analysis_success_then_scenario_change_resets() {
        let mut dashboard = Dashboard::new(MidpointNoise);
        let ticket = dashboard.begin_analysis().unwrap();
        assert_eq!(dashboard.analysis_status(), AnalysisStatus::Loading);

        let status = dashboard.finish_analysis::<String>(ticket, Ok(sample_result()));
        assert_eq!(status, AnalysisStatus::Success);
        assert!(dashboard.analysis_result().is_some());

        dashboard.set_scenario(Scenario::Optimistic);
        assert_eq!(dashboard.analysis_status(), AnalysisStatus::Idle);
        assert!(dashboard.analysis_result().is_none());
    }

    #[test]
    fn overlapping_analysis_is_refused() {
        let mut dashboard = Dashboard::new(MidpointNoise);
        let first = dashboard.begin_analysis();
        assert!(first.is_ok());
        assert_eq!(dashboard.begin_analysis(), Err(DashboardError::AnalysisInFlight));
    }

    #[test]
    fn failure_is_a_single_error_state_and_retry_is_allowed() {
        let mut dashboard = Dashboard::new(MidpointNoise);
        let ticket = dashboard.begin_analysis().unwrap();
        let status = dashboard.finish_analysis(ticket, Err("missing credentials"));
        assert_eq!(status, AnalysisStatus::Error);

        // Error survives a scenario change, matching the panel's retry affordance.
        dashboard.set_scenario(Scenario::Bau);
        assert_eq!(dashboard.analysis_status(), AnalysisStatus::Error);
        assert!(dashboard.begin_analysis().is_ok());
    }

    #[test]
    fn stale_outcome_is_discarded() {
        let mut dashboard = Dashboard::new(MidpointNoise);
        let ticket = dashboard.begin_analysis().unwrap();
        dashboard.set_scenario(Scenario::Bau);
        assert_eq!(dashboard.analysis_status(), AnalysisStatus::Loading);

        let status = dashboard.finish_analysis::<String>(ticket, Ok(sample_result()));
        assert_eq!(status, AnalysisStatus::Idle);
        assert!(dashboard.analysis_result().is_none());
    }
}
