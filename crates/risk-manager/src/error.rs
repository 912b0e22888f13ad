//! Risk manager errors
//!
//! Limit breaches are verdicts, not errors: see [`LimitViolation`](crate::LimitViolation).

use meridian_ports::DataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid risk config: {0}")]
    InvalidConfig(String),

    #[error("Historical data unavailable: {0}")]
    Data(#[from] DataError),
}

pub type Result<T> = std::result::Result<T, RiskError>;
