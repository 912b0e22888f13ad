//! Risk Manager Integration Test
//!
//! Drives the public API with a manual clock:
//! 1. Gate boundaries (daily loss inclusive, concentration exclusive)
//! 2. Daily counter rollover at the UTC date change
//! 3. Order rate and trade count limits
//! 4. Portfolio history loaded through a DataProvider

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use meridian_clock::ManualClock;
use meridian_core::{OrderType, PortfolioSnapshot, Side, TradeRequest};
use meridian_ports::{Bar, Clock, DataError, DataProvider, DataResult};
use meridian_risk_manager::{
    DayBoundary, LimitViolation, RiskError, RiskLimiter, RiskManager, SizingConfig,
    TradingLimits,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;

fn utc_limits() -> TradingLimits {
    TradingLimits {
        day_boundary: DayBoundary::Utc,
        ..Default::default()
    }
}

fn limiter_at(limits: TradingLimits, at: DateTime<Utc>) -> (RiskLimiter, Arc<ManualClock>) {
    let clock = ManualClock::new(at);
    let limiter = RiskLimiter::new(limits, clock.clone()).unwrap();
    (limiter, clock)
}

fn midday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 14, 12, 0, 0).unwrap()
}

#[test]
fn test_daily_loss_boundary_is_inclusive() {
    let _ = env_logger::try_init();
    let positions = HashMap::new();

    let (mut limiter, _) = limiter_at(utc_limits(), midday());
    limiter.record_trade(dec!(-1_999.99));
    let verdict = limiter.check_trade_allowed(dec!(1_000), dec!(100_000), "AAPL", &positions);
    assert!(verdict.approved);

    let (mut limiter, _) = limiter_at(utc_limits(), midday());
    limiter.record_trade(dec!(-2_000));
    let verdict = limiter.check_trade_allowed(dec!(1_000), dec!(100_000), "AAPL", &positions);
    assert!(!verdict.approved);
    assert_eq!(verdict.reason.as_deref(), Some("Daily loss limit reached"));
}

#[test]
fn test_daily_loss_gate_counts_profit_too() {
    let _ = env_logger::try_init();
    let (mut limiter, _) = limiter_at(utc_limits(), midday());
    limiter.record_trade(dec!(2_500));

    let verdict = limiter.check_trade_allowed(dec!(1_000), dec!(100_000), "AAPL", &HashMap::new());
    assert_eq!(verdict.violation, Some(LimitViolation::DailyLoss));
}

#[test]
fn test_concentration_boundary() {
    let _ = env_logger::try_init();
    let (mut limiter, _) = limiter_at(utc_limits(), midday());

    // 20_000 + 5_000 = exactly 25%
    let at_limit = HashMap::from([("AAPL".to_string(), dec!(20_000))]);
    let verdict = limiter.check_trade_allowed(dec!(5_000), dec!(100_000), "AAPL", &at_limit);
    assert!(verdict.approved);

    let over_limit = HashMap::from([("AAPL".to_string(), dec!(20_001))]);
    let verdict = limiter.check_trade_allowed(dec!(5_000), dec!(100_000), "AAPL", &over_limit);
    assert!(!verdict.approved);
    assert_eq!(
        verdict.reason.as_deref(),
        Some("Concentration limit exceeded for AAPL")
    );

    // Short exposure counts by magnitude
    let short = HashMap::from([("TSLA".to_string(), dec!(-30_000))]);
    let verdict = limiter.check_trade_allowed(dec!(1_000), dec!(100_000), "TSLA", &short);
    assert_eq!(
        verdict.violation,
        Some(LimitViolation::Concentration {
            symbol: "TSLA".to_string()
        })
    );
}

#[test]
fn test_counters_reset_on_new_day() {
    let _ = env_logger::try_init();
    let late = Utc.with_ymd_and_hms(2024, 5, 14, 23, 59, 0).unwrap();
    let (mut limiter, clock) = limiter_at(utc_limits(), late);

    limiter.record_trade(dec!(-3_000));
    let verdict = limiter.check_trade_allowed(dec!(1_000), dec!(100_000), "AAPL", &HashMap::new());
    assert_eq!(verdict.violation, Some(LimitViolation::DailyLoss));

    clock.advance(Duration::minutes(2));
    let verdict = limiter.check_trade_allowed(dec!(1_000), dec!(100_000), "AAPL", &HashMap::new());
    assert!(verdict.approved);

    let state = limiter.state();
    assert_eq!(state.daily_pnl, Decimal::ZERO);
    assert_eq!(state.daily_trades, 0);
    assert!(state.order_timestamps.is_empty());
    assert_eq!(state.last_reset, clock.now());
}

#[test]
fn test_default_local_boundary_resets_after_a_day() {
    let _ = env_logger::try_init();
    let (mut limiter, clock) = limiter_at(TradingLimits::default(), midday());
    assert_eq!(limiter.limits().day_boundary, DayBoundary::Local);

    limiter.record_trade(dec!(-3_000));
    let verdict = limiter.check_trade_allowed(dec!(1_000), dec!(100_000), "AAPL", &HashMap::new());
    assert_eq!(verdict.violation, Some(LimitViolation::DailyLoss));

    // 24h always moves the local calendar date forward, whatever the host zone
    clock.advance(Duration::hours(24));
    let verdict = limiter.check_trade_allowed(dec!(1_000), dec!(100_000), "AAPL", &HashMap::new());
    assert!(verdict.approved);
    assert_eq!(limiter.state().daily_pnl, Decimal::ZERO);
}

#[test]
fn test_no_reset_within_same_day() {
    let _ = env_logger::try_init();
    let (mut limiter, clock) = limiter_at(utc_limits(), midday());
    limiter.record_trade(dec!(-500));

    clock.advance(Duration::hours(11));
    limiter.check_trade_allowed(dec!(1_000), dec!(100_000), "AAPL", &HashMap::new());
    assert_eq!(limiter.state().daily_pnl, dec!(-500));
    assert_eq!(limiter.state().daily_trades, 1);
}

#[test]
fn test_order_rate_limit() {
    let _ = env_logger::try_init();
    let limits = TradingLimits {
        max_orders_per_minute: 3,
        ..utc_limits()
    };
    let (mut limiter, clock) = limiter_at(limits, midday());

    for _ in 0..3 {
        limiter.record_trade(Decimal::ZERO);
        clock.advance(Duration::seconds(5));
    }
    let verdict = limiter.check_trade_allowed(dec!(100), dec!(100_000), "AAPL", &HashMap::new());
    assert_eq!(verdict.reason.as_deref(), Some("Order rate limit exceeded"));

    clock.advance(Duration::seconds(50));
    let verdict = limiter.check_trade_allowed(dec!(100), dec!(100_000), "AAPL", &HashMap::new());
    assert!(verdict.approved);
}

#[test]
fn test_daily_trade_limit() {
    let _ = env_logger::try_init();
    let limits = TradingLimits {
        max_daily_trades: 3,
        ..utc_limits()
    };
    let (mut limiter, clock) = limiter_at(limits, midday());

    for _ in 0..3 {
        limiter.record_trade(Decimal::ZERO);
        clock.advance(Duration::minutes(5));
    }
    let verdict = limiter.check_trade_allowed(dec!(100), dec!(100_000), "AAPL", &HashMap::new());
    assert_eq!(verdict.reason.as_deref(), Some("Daily trade limit reached"));
}

#[test]
fn test_check_does_not_count_as_trade() {
    let _ = env_logger::try_init();
    let (mut limiter, _) = limiter_at(utc_limits(), midday());
    for _ in 0..20 {
        assert!(
            limiter
                .check_trade_allowed(dec!(100), dec!(100_000), "AAPL", &HashMap::new())
                .approved
        );
    }
    assert_eq!(limiter.state().daily_trades, 0);
}

#[test]
fn test_invalid_limits_rejected() {
    let limits = TradingLimits {
        concentration_limit: dec!(-0.1),
        ..Default::default()
    };
    let result = RiskLimiter::new(limits, ManualClock::starting_now());
    assert!(matches!(result, Err(RiskError::InvalidConfig(_))));
}

#[test]
fn test_manager_evaluates_request_and_records() {
    let _ = env_logger::try_init();
    let clock = ManualClock::new(midday());
    let mut rm = RiskManager::new(utc_limits(), SizingConfig::default(), 0.02, clock.clone())
        .unwrap();
    let snapshot = PortfolioSnapshot::new(dec!(100_000)).with_position("AAPL", dec!(10_000));
    let request = TradeRequest::new("AAPL", Side::Buy, dec!(40), OrderType::Market, dec!(150));

    let eval = rm.evaluate_trade(&request, &snapshot).unwrap();
    assert!(eval.approved);
    assert_eq!(eval.trade_value, dec!(6_000));

    rm.record_trade(dec!(-2_100));
    let eval = rm.evaluate_trade(&request, &snapshot).unwrap();
    assert!(!eval.approved);
    assert_eq!(eval.violation, Some(LimitViolation::DailyLoss));

    let eval = rm
        .evaluate_trade(&request, &PortfolioSnapshot::new(Decimal::ZERO))
        .unwrap();
    assert_eq!(
        eval.reason.as_deref(),
        Some("Portfolio value must be positive")
    );
}

/// Provider serving fixed daily closes
struct StaticProvider {
    closes: HashMap<String, Vec<(u32, Decimal)>>,
}

#[async_trait]
impl DataProvider for StaticProvider {
    async fn fetch_historical(
        &self,
        symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _timeframe: &str,
    ) -> DataResult<Vec<Bar>> {
        let closes = self
            .closes
            .get(symbol)
            .ok_or_else(|| DataError::NoData(symbol.to_string()))?;
        Ok(closes
            .iter()
            .map(|(day, close)| Bar {
                timestamp: Utc.with_ymd_and_hms(2024, 3, *day, 21, 0, 0).unwrap(),
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: dec!(1_000),
            })
            .collect())
    }
}

#[tokio::test]
async fn test_load_history_aligns_periods() {
    let _ = env_logger::try_init();
    let provider = StaticProvider {
        closes: HashMap::from([
            (
                "AAPL".to_string(),
                vec![(1, dec!(100)), (2, dec!(110)), (3, dec!(99)), (4, dec!(99))],
            ),
            // Missing day 3, so the day-3 period is dropped
            (
                "MSFT".to_string(),
                vec![(1, dec!(200)), (2, dec!(210)), (4, dec!(220))],
            ),
        ]),
    };

    let clock = ManualClock::new(midday());
    let mut rm = RiskManager::new(utc_limits(), SizingConfig::default(), 0.02, clock).unwrap();
    let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
    rm.portfolio_mut()
        .load_history(&provider, &symbols, midday(), midday(), "1d")
        .await
        .unwrap();

    let history = rm.portfolio().historical_returns().unwrap();
    assert_eq!(history.len(), 2);
    let aapl = history.column("AAPL").unwrap();
    assert!((aapl[0] - 0.10).abs() < 1e-9);
    assert!(aapl[1].abs() < 1e-9);

    rm.portfolio_mut()
        .set_positions_from_snapshot(&PortfolioSnapshot::new(dec!(100_000)).with_position("AAPL", dec!(5_000)));
    let metrics = rm.portfolio_metrics().unwrap();
    assert_eq!(metrics.total_value, 5_000.0);
    assert!(metrics.correlation_matrix.is_some());
}

#[tokio::test]
async fn test_load_history_missing_symbol() {
    let provider = StaticProvider {
        closes: HashMap::new(),
    };
    let clock = ManualClock::new(midday());
    let mut rm = RiskManager::new(utc_limits(), SizingConfig::default(), 0.02, clock).unwrap();

    let result = rm
        .portfolio_mut()
        .load_history(&provider, &["NVDA".to_string()], midday(), midday(), "1d")
        .await;
    assert!(matches!(result, Err(RiskError::Data(DataError::NoData(_)))));
}
