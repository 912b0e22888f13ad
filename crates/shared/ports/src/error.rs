use thiserror::Error;

/// Failures raised by a broker implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Order rejected by broker: {0}")]
    Rejected(String),

    #[error("Unknown order: {0}")]
    UnknownOrder(String),

    #[error("Timeout waiting for broker response")]
    Timeout,
}

pub type BrokerResult<T> = std::result::Result<T, BrokerError>;

/// Failures raised by a historical data provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("No data for {0}")]
    NoData(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

pub type DataResult<T> = std::result::Result<T, DataError>;
