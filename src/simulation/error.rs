//! Errors raised while configuring a simulation.
//!
//! The per-tick path never fails; only construction and parameter loading do.

use thiserror::Error;

/// Errors produced while validating parameters or building a world.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A parameter is outside the range the simulation can work with.
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParams {
        /// Name of the offending parameter.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// A parameter file could not be parsed.
    #[error("malformed parameter file: {0}")]
    Config(#[from] serde_json::Error),
    /// A parameter file could not be read.
    #[error("failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),
}

impl SimulationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            field,
            reason: reason.into(),
        }
    }
}
