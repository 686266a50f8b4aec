//! Error types shared by the simulation library and its binaries.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimulationError>;

#[derive(Error, Debug)]
pub enum SimulationError {
    /// Missing parameter groups, mismatched list lengths, empty inputs.
    #[error("Invalid arguments: {0}")]
    Argument(String),

    #[error("Parameter '{parameter}' = {value} is out of range: {reason}")]
    NumericDomain {
        parameter: String,
        value: f64,
        reason: String,
    },

    #[error("Failed to construct distribution: {0}")]
    Distribution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SimulationError {
    pub fn domain(parameter: &str, value: f64, reason: impl Into<String>) -> Self {
        Self::NumericDomain {
            parameter: parameter.to_string(),
            value,
            reason: reason.into(),
        }
    }
}
