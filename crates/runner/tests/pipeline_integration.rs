//! Trade Pipeline Integration Test
//!
//! Full evaluate → route flow from a JSON config:
//! 1. Approved trades reach the best venue's broker
//! 2. Rejected trades never reach a broker
//! 3. Configured splits route one child per ratio
//! 4. Confirmed trades count against the daily trade limit

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use meridian_clock::ManualClock;
use meridian_core::{Order, OrderStatus, OrderType, PortfolioSnapshot, Side, TradeRequest};
use meridian_ports::{Broker, BrokerOutcome, BrokerResult};
use meridian_risk_manager::LimitViolation;
use meridian_router::RoutingFailure;
use meridian_runner::{PipelineOutcome, SystemConfig, TradePipeline};
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingBroker {
    submitted: Mutex<Vec<Order>>,
}

impl RecordingBroker {
    fn submitted(&self) -> Vec<Order> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Broker for RecordingBroker {
    async fn submit_order(&self, order: &Order) -> BrokerResult<BrokerOutcome> {
        self.submitted.lock().unwrap().push(order.clone());
        Ok(json!({ "status": "accepted" }))
    }

    async fn cancel_order(&self, _order_id: &str) -> BrokerResult<bool> {
        Ok(true)
    }

    async fn get_order_status(&self, order_id: &str) -> BrokerResult<BrokerOutcome> {
        Ok(json!({ "order_id": order_id, "status": "working" }))
    }
}

// NYSE outscores ARCA on every term, so it wins whatever order type both support
const VENUES: &str = r#"
    "router": { "venues": [
        { "name": "NYSE", "fee_rate": "0.001", "liquidity_score": "0.9", "latency_ms": 5,
          "supported_order_types": ["MARKET", "LIMIT"] },
        { "name": "ARCA", "fee_rate": "0.003", "liquidity_score": "0.5", "latency_ms": 20,
          "supported_order_types": ["MARKET", "STOP"] }
    ] }
"#;

fn config(extra: &str) -> SystemConfig {
    let json = if extra.is_empty() {
        format!(r#"{{ "limits": {{ "day_boundary": "utc" }}, {} }}"#, VENUES)
    } else {
        format!(r#"{{ "limits": {{ "day_boundary": "utc" }}, {}, {} }}"#, VENUES, extra)
    };
    SystemConfig::from_json(&json).unwrap()
}

fn pipeline(config: SystemConfig) -> (TradePipeline, Arc<RecordingBroker>, Arc<RecordingBroker>) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 14, 14, 30, 0).unwrap());
    let mut pipeline = TradePipeline::new(config, clock).unwrap();
    let nyse = Arc::new(RecordingBroker::default());
    let arca = Arc::new(RecordingBroker::default());
    pipeline.register_broker("NYSE", nyse.clone());
    pipeline.register_broker("ARCA", arca.clone());
    (pipeline, nyse, arca)
}

fn snapshot() -> PortfolioSnapshot {
    PortfolioSnapshot::new(dec!(100_000))
}

#[tokio::test]
async fn test_approved_trade_routes_to_best_venue() {
    let _ = env_logger::try_init();
    let (mut pipeline, nyse, arca) = pipeline(config(""));

    let request = TradeRequest::new("AAPL", Side::Buy, dec!(20), OrderType::Limit, dec!(150));
    let outcome = pipeline.evaluate_and_route(&request, &snapshot()).await.unwrap();

    assert!(outcome.fully_routed());
    let PipelineOutcome::Routed(results) = outcome else {
        panic!("expected routed outcome");
    };
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].venue.as_deref(), Some("NYSE"));

    let sent = nyse.submitted();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].price, Some(dec!(150)));
    assert_eq!(sent[0].quantity, dec!(20));
    assert!(arca.submitted().is_empty());

    let active = pipeline.executor().active_order(&results[0].order_id).unwrap();
    assert_eq!(active.status, OrderStatus::Submitted);
}

#[tokio::test]
async fn test_stop_order_goes_to_only_supporting_venue() {
    let _ = env_logger::try_init();
    let (mut pipeline, nyse, arca) = pipeline(config(""));

    let request = TradeRequest::new("AAPL", Side::Sell, dec!(10), OrderType::Stop, dec!(140));
    pipeline.evaluate_and_route(&request, &snapshot()).await.unwrap();

    assert!(nyse.submitted().is_empty());
    let sent = arca.submitted();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].stop_price, Some(dec!(140)));
}

#[tokio::test]
async fn test_rejected_trade_is_not_routed() {
    let _ = env_logger::try_init();
    let (mut pipeline, nyse, arca) = pipeline(config(""));

    // 200 * 100 = 20% of the portfolio
    let request = TradeRequest::new("AAPL", Side::Buy, dec!(200), OrderType::Market, dec!(100));
    let outcome = pipeline.evaluate_and_route(&request, &snapshot()).await.unwrap();

    let PipelineOutcome::Rejected(evaluation) = outcome else {
        panic!("expected rejection");
    };
    assert_eq!(
        evaluation.reason.as_deref(),
        Some("Position size 20.0% exceeds limit")
    );
    assert!(nyse.submitted().is_empty());
    assert!(arca.submitted().is_empty());
    assert!(pipeline.executor().router().routing_history().is_empty());
}

#[tokio::test]
async fn test_configured_split_routes_children() {
    let _ = env_logger::try_init();
    let (mut pipeline, nyse, _) = pipeline(config(r#""split_ratios": ["0.5", "0.3", "0.2"]"#));

    let request = TradeRequest::new("MSFT", Side::Buy, dec!(50), OrderType::Market, dec!(100));
    let outcome = pipeline.evaluate_and_route(&request, &snapshot()).await.unwrap();

    let PipelineOutcome::Routed(results) = outcome else {
        panic!("expected routed outcome");
    };
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.success));

    let sent = nyse.submitted();
    let quantities: Vec<_> = sent.iter().map(|o| o.quantity).collect();
    assert_eq!(quantities, vec![dec!(25), dec!(15), dec!(10)]);
    assert!(sent[0].id.ends_with("_0"));
    assert!(sent[2].id.ends_with("_2"));
    assert_eq!(pipeline.executor().router().routing_history().len(), 3);
}

#[tokio::test]
async fn test_missing_broker_yields_failed_result() {
    let _ = env_logger::try_init();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 14, 14, 30, 0).unwrap());
    let mut pipeline = TradePipeline::new(config(""), clock).unwrap();
    pipeline.register_broker("ARCA", Arc::new(RecordingBroker::default()));

    let request = TradeRequest::new("AAPL", Side::Buy, dec!(10), OrderType::Market, dec!(100));
    let outcome = pipeline.evaluate_and_route(&request, &snapshot()).await.unwrap();

    assert!(!outcome.is_rejected());
    assert!(!outcome.fully_routed());
    let PipelineOutcome::Routed(results) = outcome else {
        panic!("expected routed outcome");
    };
    assert_eq!(
        results[0].error,
        Some(RoutingFailure::BrokerUnavailable {
            venue: "NYSE".to_string()
        })
    );
    assert_eq!(
        results[0].error_message().as_deref(),
        Some("Broker not available for NYSE")
    );
    assert_eq!(pipeline.executor().active_orders().count(), 0);
}

#[tokio::test]
async fn test_confirmed_trades_count_against_daily_limit() {
    let _ = env_logger::try_init();
    let json = format!(
        r#"{{ "limits": {{ "day_boundary": "utc", "max_daily_trades": 2 }}, {} }}"#,
        VENUES
    );
    let (mut pipeline, nyse, _) = pipeline(SystemConfig::from_json(&json).unwrap());
    let request = TradeRequest::new("AAPL", Side::Buy, dec!(10), OrderType::Market, dec!(100));

    for _ in 0..2 {
        let outcome = pipeline.evaluate_and_route(&request, &snapshot()).await.unwrap();
        assert!(outcome.fully_routed());
        pipeline.confirm_trade(dec!(12.50));
    }

    let outcome = pipeline.evaluate_and_route(&request, &snapshot()).await.unwrap();
    let PipelineOutcome::Rejected(evaluation) = outcome else {
        panic!("expected rejection");
    };
    assert_eq!(evaluation.violation, Some(LimitViolation::DailyTrades));
    assert_eq!(nyse.submitted().len(), 2);
    assert_eq!(pipeline.risk().limiter().state().daily_pnl, dec!(25.00));
}
