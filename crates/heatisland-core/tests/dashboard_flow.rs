//! End-to-end dashboard flow: open, switch scenarios, toggle lines, and
//! run the analysis lifecycle with a stubbed outcome.

#![allow(clippy::unwrap_used)]

use heatisland_core::{Dashboard, DashboardConfig, DashboardError};
use heatisland_synthesis::{MidpointNoise, RngNoise};
use heatisland_types::{AnalysisResult, AnalysisStatus, Scenario};

fn stub_result(scenario: Scenario) -> AnalysisResult {
    AnalysisResult {
        scenario_context: format!("{} projection", scenario.label()),
        summary: "Basin topography traps heat over Taipei.".to_owned(),
        key_factors: vec![
            "basin topography".to_owned(),
            "weak ventilation".to_owned(),
            "concrete density".to_owned(),
        ],
        recommendations: vec![
            "green corridors".to_owned(),
            "cool roofs".to_owned(),
            "heat action plans".to_owned(),
        ],
    }
}

#[test]
fn historical_zero_noise_matches_direct_computation() {
    let dashboard = Dashboard::new(MidpointNoise);
    let present = dashboard.series().iter().find(|r| r.year == 2023).unwrap();
    let expected = ((0.1 * 202.3_f64.sin() + 1.2) * 100.0).round() / 100.0;
    assert!((present.global_anomaly - expected).abs() < 1e-9);
    assert!((present.global_anomaly - 1.29).abs() < 1e-9);
}

#[test]
fn configured_seed_reproduces_dashboard_series() {
    let config = DashboardConfig::parse("synthesis:\n  seed: 11\n  default_scenario: OPTIMISTIC\n").unwrap();
    let seed = config.synthesis.seed.unwrap();

    let a = Dashboard::with_scenario(RngNoise::seeded(seed), config.synthesis.default_scenario);
    let b = Dashboard::with_scenario(RngNoise::seeded(seed), config.synthesis.default_scenario);
    assert_eq!(a.series(), b.series());
    assert_eq!(a.series().len(), 171);
}

#[test]
fn full_session() {
    let mut dashboard = Dashboard::new(RngNoise::seeded(5));

    dashboard.set_scenario(Scenario::Bau);
    dashboard.toggle_city("seoul").unwrap();
    dashboard.toggle_city("tokyo").unwrap();
    assert!(dashboard.is_selected("seoul"));
    assert!(!dashboard.is_selected("tokyo"));

    let rows = dashboard.visible_rows();
    assert_eq!(rows.len(), 171);
    let last = rows.last().unwrap();
    assert_eq!(last.get("year").and_then(serde_json::Value::as_i64), Some(2050));
    assert!(last.contains_key("seoulAnomaly"));
    assert!(!last.contains_key("tokyoAnomaly"));

    let ticket = dashboard.begin_analysis().unwrap();
    assert!(matches!(dashboard.begin_analysis(), Err(DashboardError::AnalysisInFlight)));
    let status = dashboard.finish_analysis::<String>(ticket, Ok(stub_result(Scenario::Bau)));
    assert_eq!(status, AnalysisStatus::Success);
    assert_eq!(
        dashboard.analysis_result().map(|r| r.key_factors.len()),
        Some(3)
    );

    dashboard.set_scenario(Scenario::Optimistic);
    assert_eq!(dashboard.analysis_status(), AnalysisStatus::Idle);
}
