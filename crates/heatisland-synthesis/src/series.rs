//! Year-by-year series assembly.
//!
//! The run is a sequential fold over years: each year's global trend is
//! carried forward as the seed for the next projected year. Within a year
//! the global noise is drawn first, then one draw per city in roster order.

use std::collections::BTreeMap;

use heatisland_types::{AnnualRecord, CityProfile, START_YEAR, Scenario};
use tracing::debug;

use crate::noise::NoiseSource;
use crate::roster::roster;
use crate::trend::{city_anomaly, global_trend, noise_amplitude, round2};

/// Synthesize the full series for `scenario` over the built-in roster.
///
/// Yields one record per year from 1880 to [`Scenario::end_year`]
/// inclusive, in increasing order.
pub fn generate_series<N: NoiseSource + ?Sized>(
    scenario: Scenario,
    noise: &mut N,
) -> Vec<AnnualRecord> {
    generate_series_with_roster(scenario, roster(), noise)
}

/// Synthesize the full series for `scenario` over an arbitrary roster.
///
/// An empty roster yields records with only the global anomaly.
pub fn generate_series_with_roster<N: NoiseSource + ?Sized>(
    scenario: Scenario,
    cities: &[CityProfile],
    noise: &mut N,
) -> Vec<AnnualRecord> {
    let end_year = scenario.end_year();
    let year_count = usize::try_from(end_year.abs_diff(START_YEAR))
        .map_or(0, |span| span.saturating_add(1));

    let (records, _) = (START_YEAR..=end_year).fold(
        (Vec::with_capacity(year_count), 0.0_f64),
        |(mut records, previous_global_trend), year| {
            let trend = global_trend(previous_global_trend, year, scenario);
            records.push(synthesize_year(year, trend, scenario, cities, noise));
            (records, trend)
        },
    );

    debug!(
        scenario = %scenario,
        start_year = START_YEAR,
        end_year,
        records = records.len(),
        cities = cities.len(),
        "synthesized anomaly series"
    );

    records
}

/// Build one record from the year's unnoised global trend.
fn synthesize_year<N: NoiseSource + ?Sized>(
    year: i32,
    trend: f64,
    scenario: Scenario,
    cities: &[CityProfile],
    noise: &mut N,
) -> AnnualRecord {
    let global_anomaly = round2(trend + noise.uniform(noise_amplitude(year)));

    let city_anomalies: BTreeMap<String, f64> = cities
        .iter()
        .map(|city| {
            (
                city.id.to_owned(),
                city_anomaly(city, trend, year, scenario, noise),
            )
        })
        .collect();

    AnnualRecord {
        year,
        global_anomaly,
        city_anomalies,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::noise::{MidpointNoise, RngNoise};

    /// Replays a fixed list of unit values, cycling when exhausted.
    struct ScriptedNoise {
        values: Vec<f64>,
        cursor: usize,
    }

    impl NoiseSource for ScriptedNoise {
        fn next_unit(&mut self) -> f64 {
            let value = self.values.get(self.cursor).copied().unwrap_or(0.5);
            self.cursor = self.cursor.saturating_add(1) % self.values.len().max(1);
            value
        }
    }

    #[test]
    fn empty_roster_keeps_global_line() {
        let series = generate_series_with_roster(Scenario::Historical, &[], &mut MidpointNoise);
        assert_eq!(series.len(), 144);
        assert!(series.iter().all(|r| r.city_anomalies.is_empty()));
    }

    #[test]
    fn global_noise_drawn_before_city_noise() {
        // First draw of each year is the global one. Push it to the top of
        // the range and leave the cities at the midpoint.
        let mut values = vec![0.5; roster().len().saturating_add(1)];
        if let Some(first) = values.first_mut() {
            *first = 0.999_999;
        }
        let mut noise = ScriptedNoise { values, cursor: 0 };
        let noisy = generate_series(Scenario::Historical, &mut noise);
        let quiet = generate_series(Scenario::Historical, &mut MidpointNoise);

        let noisy_first = noisy.first().unwrap();
        let quiet_first = quiet.first().unwrap();
        assert!(noisy_first.global_anomaly > quiet_first.global_anomaly);
        assert_eq!(noisy_first.city_anomalies, quiet_first.city_anomalies);
    }

    #[test]
    fn seeded_runs_are_identical() {
        let a = generate_series(Scenario::Bau, &mut RngNoise::seeded(2023));
        let b = generate_series(Scenario::Bau, &mut RngNoise::seeded(2023));
        assert_eq!(a, b);
    }

    #[test]
    fn projection_carry_starts_from_last_historical_trend() {
        let series = generate_series(Scenario::Bau, &mut MidpointNoise);
        let at = |year: i32| series.iter().find(|r| r.year == year).map(|r| r.global_anomaly);
        let present = at(2023).unwrap();
        let next = at(2024).unwrap();
        // 0.04 + 0.002 on top of the 2023 trend, give or take rounding.
        assert!((next - present - 0.042).abs() <= 0.011);
    }
}
