use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meridian_core::{Price, Quantity, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::DataResult;

/// One OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Quantity,
}

/// Port for historical market data
///
/// Real-time streaming is deliberately absent; the risk core only needs history.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetch bars in `[start, end]`, oldest first. `timeframe` is provider-specific ("1d", "1h")
    async fn fetch_historical(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timeframe: &str,
    ) -> DataResult<Vec<Bar>>;
}
