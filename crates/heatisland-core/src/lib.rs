//! Configuration and dashboard shell state for the Heat Island dashboard.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`dashboard`] -- Scenario selection, city toggles, and analysis status
//! - [`error`] -- Errors raised by the shell

pub mod config;
pub mod dashboard;
pub mod error;

pub use config::{AnalysisConfig, ConfigError, DashboardConfig, LoggingConfig, SynthesisConfig};
pub use dashboard::{AnalysisState, AnalysisTicket, Dashboard};
pub use error::DashboardError;
