//! Shared type definitions for the Heat Island climate dashboard.
//!
//! This crate is the single source of truth for the data model shared by
//! the synthesis engine, the dashboard shell, and the analyst. Types flow
//! downstream to `TypeScript` via `ts-rs` for the chart front-end.
//!
//! # Modules
//!
//! - [`enums`] -- Scenario, region, and analysis status enumerations
//! - [`structs`] -- City profiles, annual records, and analysis results

pub mod enums;
pub mod structs;

pub use enums::{
    AnalysisStatus, PRESENT_YEAR, PROJECTION_END_YEAR, Region, RegionParseError, START_YEAR,
    Scenario, ScenarioParseError,
};
pub use structs::{AnalysisResult, AnnualRecord, CityProfile};
