//! Climate anomaly synthesis engine for the Heat Island dashboard.
//!
//! Produces a plausible-looking (not scientific) annual series of
//! temperature anomalies for a fixed roster of cities plus a global
//! baseline, under one of three [`Scenario`]s.
//!
//! # Modules
//!
//! - [`roster`] -- The fixed 13-city roster
//! - [`noise`] -- Injectable uniform noise sources
//! - [`trend`] -- Global trend curves and per-city anomaly terms
//! - [`series`] -- The year-by-year fold that assembles records
//!
//! # Determinism
//!
//! Every term except the two noise draws is a pure function of
//! `(year, scenario, city)`. Pass [`MidpointNoise`] for zero noise or
//! [`RngNoise::seeded`] for a reproducible noisy run.
//!
//! [`Scenario`]: heatisland_types::Scenario

pub mod noise;
pub mod roster;
pub mod series;
pub mod trend;

pub use noise::{MidpointNoise, NoiseSource, RngNoise};
pub use roster::{FOCUS_CITY_ID, cities_in_region, find_city, focus_city, roster};
pub use series::{generate_series, generate_series_with_roster};
pub use trend::{
    BASIN_MULTIPLIER, CITY_NOISE, HISTORICAL_NOISE, PROJECTION_NOISE, basin_multiplier,
    city_anomaly, city_signal, global_trend, historical_trend, noise_amplitude, normalized_time,
    project_trend, round2, urbanization_factor,
};
