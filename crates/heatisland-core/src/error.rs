//! Error types for the dashboard shell.

/// Errors raised by [`Dashboard`](crate::dashboard::Dashboard) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    /// The city id is not in the roster.
    #[error("unknown city: {0}")]
    UnknownCity(String),

    /// An analysis request is already in flight.
    #[error("an analysis request is already in flight")]
    AnalysisInFlight,
}
