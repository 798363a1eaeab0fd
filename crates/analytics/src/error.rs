use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid forecast horizon {horizon}: must be between 1 and {max}")]
    InvalidHorizon { horizon: i64, max: i64 },

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
