//! Portfolio Risk Metrics
//!
//! Statistics over historical return series: VaR, Sharpe, max drawdown, beta and
//! the cross-asset correlation matrix. Returns are plain `f64`; money stays in
//! `Decimal` everywhere else.
//!
//! The portfolio return for a period is the position-weighted sum of asset returns,
//! with weights `position / sum(positions)`. Symbols without a position get zero weight.

use crate::error::{Result, RiskError};
use chrono::{DateTime, Utc};
use log::{debug, info};
use meridian_core::{PortfolioSnapshot, Timestamp};
use meridian_ports::{Bar, DataError, DataProvider};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Standard deviations below this are treated as zero
const STD_EPSILON: f64 = 1e-12;

/// Column-major view of asset returns: one column per symbol, one row per period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    symbols: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl ReturnSeries {
    pub fn new(symbols: Vec<String>) -> Self {
        Self {
            symbols,
            rows: Vec::new(),
        }
    }

    /// Build from per-symbol columns of equal length
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let len = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        if let Some((symbol, col)) = columns.iter().find(|(_, c)| c.len() != len) {
            return Err(RiskError::InvalidArgument(format!(
                "return column {} has {} rows, expected {}",
                symbol,
                col.len(),
                len
            )));
        }

        let symbols = columns.iter().map(|(s, _)| s.clone()).collect();
        let rows = (0..len)
            .map(|i| columns.iter().map(|(_, c)| c[i]).collect())
            .collect();
        Ok(Self { symbols, rows })
    }

    pub fn push_row(&mut self, row: Vec<f64>) -> Result<()> {
        if row.len() != self.symbols.len() {
            return Err(RiskError::InvalidArgument(format!(
                "row has {} values for {} symbols",
                row.len(),
                self.symbols.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, symbol: &str) -> Option<Vec<f64>> {
        let idx = self.symbols.iter().position(|s| s == symbol)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<String>,
    /// Row-major, `symbols.len()` square
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        Some(self.values[i][j])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_value: f64,
    /// One-period 95% VaR as a return; negative means loss
    pub var_95: f64,
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline as a positive fraction
    pub max_drawdown: f64,
    pub beta: f64,
    pub correlation_matrix: Option<CorrelationMatrix>,
}

pub struct PortfolioRiskManager {
    risk_free_rate: f64,
    positions: HashMap<String, f64>,
    history: Option<ReturnSeries>,
    benchmark: Option<Vec<f64>>,
}

impl PortfolioRiskManager {
    /// `risk_free_rate` is annual; it is de-annualized over 252 trading days.
    pub fn new(risk_free_rate: f64) -> Self {
        Self {
            risk_free_rate,
            positions: HashMap::new(),
            history: None,
            benchmark: None,
        }
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn set_positions(&mut self, positions: HashMap<String, f64>) {
        self.positions = positions;
    }

    pub fn set_positions_from_snapshot(&mut self, snapshot: &PortfolioSnapshot) {
        self.positions = snapshot
            .positions
            .iter()
            .filter_map(|(symbol, value)| value.to_f64().map(|v| (symbol.clone(), v)))
            .collect();
    }

    pub fn positions(&self) -> &HashMap<String, f64> {
        &self.positions
    }

    pub fn set_historical_returns(&mut self, history: ReturnSeries) {
        self.history = Some(history);
    }

    pub fn historical_returns(&self) -> Option<&ReturnSeries> {
        self.history.as_ref()
    }

    pub fn set_benchmark_returns(&mut self, returns: Vec<f64>) {
        self.benchmark = Some(returns);
    }

    /// Load close-to-close returns for `symbols` from a data provider.
    ///
    /// Only periods present for every symbol are kept.
    pub async fn load_history(
        &mut self,
        provider: &dyn DataProvider,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timeframe: &str,
    ) -> Result<()> {
        let mut by_period: BTreeMap<Timestamp, Vec<Option<f64>>> = BTreeMap::new();

        for (idx, symbol) in symbols.iter().enumerate() {
            let bars = provider.fetch_historical(symbol, start, end, timeframe).await?;
            let returns = close_to_close(&bars);
            if returns.is_empty() {
                return Err(DataError::NoData(symbol.clone()).into());
            }
            for (ts, r) in returns {
                by_period.entry(ts).or_insert_with(|| vec![None; symbols.len()])[idx] = Some(r);
            }
        }

        let mut series = ReturnSeries::new(symbols.to_vec());
        for row in by_period.into_values() {
            if let Some(complete) = row.into_iter().collect::<Option<Vec<f64>>>() {
                series.push_row(complete)?;
            }
        }

        info!(
            "[RISK] Loaded {} return periods for {} symbols",
            series.len(),
            symbols.len()
        );
        self.history = Some(series);
        Ok(())
    }

    /// Position-weighted portfolio return per period.
    /// Empty when there is no history or the positions sum to zero.
    pub fn portfolio_returns(&self) -> Vec<f64> {
        let Some(history) = &self.history else {
            return Vec::new();
        };
        let total: f64 = self.positions.values().sum();
        if total.abs() < STD_EPSILON {
            return Vec::new();
        }

        let weights: Vec<f64> = history
            .symbols()
            .iter()
            .map(|s| self.positions.get(s).copied().unwrap_or(0.0) / total)
            .collect();

        history
            .rows()
            .iter()
            .map(|row| row.iter().zip(&weights).map(|(r, w)| r * w).sum())
            .collect()
    }

    /// Historical VaR: the `(1 - confidence)` percentile of portfolio returns,
    /// scaled by `sqrt(horizon)`. Negative means loss; 0.0 without history.
    pub fn calculate_var(&self, confidence: f64, horizon: u32) -> Result<f64> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(RiskError::InvalidArgument(format!(
                "confidence must be in (0, 1), got {}",
                confidence
            )));
        }
        if horizon == 0 {
            return Err(RiskError::InvalidArgument(
                "horizon must be at least 1 period".to_string(),
            ));
        }

        let returns = self.portfolio_returns();
        if returns.is_empty() {
            return Ok(0.0);
        }
        let var = percentile(&returns, (1.0 - confidence) * 100.0) * (horizon as f64).sqrt();
        debug!("[RISK] VaR({}, {}) = {}", confidence, horizon, var);
        Ok(var)
    }

    /// Annualized Sharpe ratio of excess returns over the daily risk-free rate.
    /// 0.0 with fewer than two periods or zero volatility.
    pub fn calculate_sharpe_ratio(&self) -> f64 {
        let returns = self.portfolio_returns();
        let Some(std) = sample_std(&returns) else {
            return 0.0;
        };
        if std < STD_EPSILON {
            return 0.0;
        }
        let daily_rf = self.risk_free_rate / TRADING_DAYS_PER_YEAR;
        let excess_mean = mean(&returns) - daily_rf;
        TRADING_DAYS_PER_YEAR.sqrt() * excess_mean / std
    }

    /// Largest peak-to-trough decline of the compounded portfolio value
    pub fn calculate_max_drawdown(&self) -> f64 {
        let mut value = 1.0_f64;
        let mut peak = 1.0_f64;
        let mut max_drawdown = 0.0_f64;
        for r in self.portfolio_returns() {
            value *= 1.0 + r;
            peak = peak.max(value);
            if peak > 0.0 {
                max_drawdown = max_drawdown.max((peak - value) / peak);
            }
        }
        max_drawdown
    }

    /// Covariance with the benchmark over benchmark variance, on the overlapping
    /// prefix of both series. 0.0 without a benchmark.
    pub fn calculate_beta(&self) -> f64 {
        let Some(benchmark) = &self.benchmark else {
            return 0.0;
        };
        let returns = self.portfolio_returns();
        let n = returns.len().min(benchmark.len());
        if n < 2 {
            return 0.0;
        }
        let (p, b) = (&returns[..n], &benchmark[..n]);
        let var_b = covariance(b, b);
        if var_b < STD_EPSILON * STD_EPSILON {
            return 0.0;
        }
        covariance(p, b) / var_b
    }

    /// Pearson correlation between every pair of symbols. `None` with fewer than
    /// two periods. Pairs involving a constant series read 0.0.
    pub fn correlation_matrix(&self) -> Option<CorrelationMatrix> {
        let history = self.history.as_ref()?;
        if history.len() < 2 {
            return None;
        }
        let columns: Vec<Vec<f64>> = history
            .symbols()
            .iter()
            .filter_map(|s| history.column(s))
            .collect();

        let values = (0..columns.len())
            .map(|i| {
                (0..columns.len())
                    .map(|j| {
                        if i == j {
                            1.0
                        } else {
                            pearson(&columns[i], &columns[j])
                        }
                    })
                    .collect()
            })
            .collect();

        Some(CorrelationMatrix {
            symbols: history.symbols().to_vec(),
            values,
        })
    }

    pub fn metrics(&self) -> Result<PortfolioMetrics> {
        Ok(PortfolioMetrics {
            total_value: self.positions.values().sum(),
            var_95: self.calculate_var(0.95, 1)?,
            sharpe_ratio: self.calculate_sharpe_ratio(),
            max_drawdown: self.calculate_max_drawdown(),
            beta: self.calculate_beta(),
            correlation_matrix: self.correlation_matrix(),
        })
    }
}

fn close_to_close(bars: &[Bar]) -> Vec<(Timestamp, f64)> {
    bars.windows(2)
        .filter_map(|w| {
            let prev = w[0].close.to_f64()?;
            let curr = w[1].close.to_f64()?;
            (prev != 0.0).then(|| (w[1].timestamp, curr / prev - 1.0))
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample (n - 1) covariance; callers guarantee at least two values
fn covariance(a: &[f64], b: &[f64]) -> f64 {
    let (ma, mb) = (mean(a), mean(b));
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - ma) * (y - mb))
        .sum::<f64>()
        / (a.len() - 1) as f64
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(covariance(values, values).sqrt())
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let denom = covariance(a, a).sqrt() * covariance(b, b).sqrt();
    if denom < STD_EPSILON {
        return 0.0;
    }
    covariance(a, b) / denom
}

/// Percentile with linear interpolation between closest ranks
fn percentile(values: &[f64], pct: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
