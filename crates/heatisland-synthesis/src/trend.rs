//! Trend curves and per-city anomaly terms.
//!
//! Historical years (up to and including [`PRESENT_YEAR`]) follow a closed
//! form: a small decadal sine wobble plus a cubic acceleration reaching
//! 1.2 °C at the cutoff. Projected years accumulate onto the previous
//! year's trend:
//!
//! | Scenario   | Increment in year `2023 + n`   | Shape                  |
//! |------------|--------------------------------|------------------------|
//! | Optimistic | `0.015 * exp(-0.1 n)`          | levels off             |
//! | BAU        | `0.04 + 0.002 n`               | accelerates, unbounded |
//!
//! City anomalies scale the global trend by the city's warming rate and
//! add an urban heat island bonus driven by an urbanization factor. The
//! focus city gets an extra basin multiplier on both terms.

use heatisland_types::{CityProfile, PRESENT_YEAR, START_YEAR, Scenario};

use crate::noise::NoiseSource;
use crate::roster::FOCUS_CITY_ID;

/// Heat-trapping amplification applied only to the focus city.
pub const BASIN_MULTIPLIER: f64 = 1.15;

/// Global noise amplitude for years up to the cutoff.
pub const HISTORICAL_NOISE: f64 = 0.15;

/// Global noise amplitude for projected years.
pub const PROJECTION_NOISE: f64 = 0.02;

/// Per-city noise amplitude (draws on `[-0.1, 0.1]`).
pub const CITY_NOISE: f64 = 0.2;

/// Year urbanization starts contributing to the heat island bonus.
const URBANIZATION_START_YEAR: i32 = 1950;

/// Years from [`URBANIZATION_START_YEAR`] to full urbanization (factor 1.0).
const URBANIZATION_SPAN_YEARS: f64 = 73.0;

/// Yearly change of the urbanization factor after the cutoff.
const URBANIZATION_DRIFT: f64 = 0.005;

/// Share of the urbanization factor converted into heat island bonus.
const UHI_SCALE: f64 = 0.8;

fn years_between(from: i32, to: i32) -> f64 {
    f64::from(to) - f64::from(from)
}

/// Position of `year` on the historical axis: 0.0 at 1880, 1.0 at 2023.
pub fn normalized_time(year: i32) -> f64 {
    years_between(START_YEAR, year) / years_between(START_YEAR, PRESENT_YEAR)
}

/// Closed-form trend for a year up to the cutoff.
pub fn historical_trend(year: i32) -> f64 {
    0.1 * (f64::from(year) / 10.0).sin() + normalized_time(year).powi(3) * 1.2
}

/// Trend for a year after the cutoff, accumulated onto `previous`.
///
/// `Historical` never reaches this branch in a normal run; it takes the
/// business-as-usual increment.
pub fn project_trend(previous: f64, year: i32, scenario: Scenario) -> f64 {
    let years_past = years_between(PRESENT_YEAR, year);
    match scenario {
        Scenario::Optimistic => previous + 0.015 * (-years_past * 0.1).exp(),
        Scenario::Historical | Scenario::Bau => previous + 0.04 + years_past * 0.002,
    }
}

/// Unnoised global trend for `year`.
///
/// Historical years ignore `previous` entirely. The carry only seeds the
/// first projected year.
pub fn global_trend(previous: f64, year: i32, scenario: Scenario) -> f64 {
    if year <= PRESENT_YEAR {
        historical_trend(year)
    } else {
        project_trend(previous, year, scenario)
    }
}

/// Global noise amplitude for `year`. Quieter in projections so the
/// scenario lines read clearly.
pub fn noise_amplitude(year: i32) -> f64 {
    if year > PRESENT_YEAR {
        PROJECTION_NOISE
    } else {
        HISTORICAL_NOISE
    }
}

/// Urbanization factor feeding the heat island bonus.
///
/// Not clamped after the cutoff: far enough into an optimistic projection
/// it goes negative, which reads as the heat island effect reversing.
pub fn urbanization_factor(year: i32, scenario: Scenario) -> f64 {
    if year <= PRESENT_YEAR {
        return (years_between(URBANIZATION_START_YEAR, year) / URBANIZATION_SPAN_YEARS).max(0.0);
    }
    let drift = years_between(PRESENT_YEAR, year) * URBANIZATION_DRIFT;
    match scenario {
        Scenario::Optimistic => 1.0 - drift,
        Scenario::Historical | Scenario::Bau => 1.0 + drift,
    }
}

/// Basin multiplier for `city`: [`BASIN_MULTIPLIER`] for the focus city, else 1.0.
pub fn basin_multiplier(city: &CityProfile) -> f64 {
    if city.id == FOCUS_CITY_ID {
        BASIN_MULTIPLIER
    } else {
        1.0
    }
}

/// Unnoised, unrounded city anomaly with an explicit basin multiplier.
pub fn city_signal(
    city: &CityProfile,
    global_trend: f64,
    year: i32,
    scenario: Scenario,
    basin: f64,
) -> f64 {
    let uhi_bonus = city.uhi_factor * (urbanization_factor(year, scenario) * UHI_SCALE) * basin;
    global_trend * city.warming_rate * basin + uhi_bonus
}

/// Final city anomaly for one year: signal plus one city noise draw, rounded.
pub fn city_anomaly<N: NoiseSource + ?Sized>(
    city: &CityProfile,
    global_trend: f64,
    year: i32,
    scenario: Scenario,
    noise: &mut N,
) -> f64 {
    let signal = city_signal(city, global_trend, year, scenario, basin_multiplier(city));
    round2(signal + noise.uniform(CITY_NOISE))
}

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    // Adding positive zero turns -0.0 into 0.0.
    (value * 100.0).round() / 100.0 + 0.0
}
