//! The execution controller: turns an accepted [`OpportunityCandidate`]
//! into a persisted position and a submitted IOC order, running every
//! gate from §4.8 in order before committing to the exchange.

use std::sync::Arc;
use std::time::Duration;

use algo_trade_arbitrage::{ArbitrageDetector, PositionArbOpportunity, PureArbOpportunity, Side as ArbSide};
use algo_trade_core::position::{Leg, NewPosition, PositionStore};
use algo_trade_detection::{kelly_fraction, kelly_to_contracts, OpportunityCandidate};
use algo_trade_kalshi::{slippage, OrderRequest, Orderbook, Side as KalshiSide, TimeInForce};
use tracing::{info, warn};

use crate::error::ExecutionError;
use crate::gateway::ExchangeGateway;
use crate::types::{ArbExecutionResult, CandidateOutcome, ExecutionConfig, ExecutionResult};

/// Re-fetch delay after an IOC submission, before reading back the
/// actual fill (§4.8 step 10).
const FILL_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Depth requested from the exchange when pulling a book to evaluate
/// against. Deep enough to walk several levels without a second round trip.
const BOOK_DEPTH: u32 = 25;

pub struct ExecutionController<G: ExchangeGateway> {
    gateway: Arc<G>,
    store: Arc<dyn PositionStore>,
    arb_detector: ArbitrageDetector,
    config: ExecutionConfig,
}

impl<G: ExchangeGateway> ExecutionController<G> {
    #[must_use]
    pub fn new(gateway: Arc<G>, store: Arc<dyn PositionStore>, config: ExecutionConfig) -> Self {
        Self { gateway, store, arb_detector: ArbitrageDetector::new(), config }
    }

    /// Runs §4.8 steps 1-10 for one directional candidate. `leg` is the
    /// exchange contract (yes/no) the caller has already mapped
    /// `candidate.side` onto via the market's ticker convention.
    ///
    /// Step 3 queries the exchange's own reported positions rather than
    /// just the local store: a same-side remote position is a duplicate
    /// (reject), but an opposite-side remote position only blocks this
    /// leg when no pure arbitrage is available — if one is, the candidate
    /// is executed as an arbitrage pair instead of a directional entry.
    pub async fn execute_candidate(
        &self,
        candidate: &OpportunityCandidate,
        leg: Leg,
        bankroll_dollars: f64,
    ) -> Result<CandidateOutcome, ExecutionError> {
        let ticker = candidate.ticker.clone().ok_or(ExecutionError::MissingTicker)?;

        if self.store.find(&ticker, leg).await?.is_some() {
            return Err(ExecutionError::DuplicatePosition { ticker, leg: leg.as_str() });
        }

        let book = self.gateway.orderbook(&ticker, BOOK_DEPTH).await?;

        if let Some(remote) = self.gateway.positions().await?.into_iter().find(|p| p.ticker == ticker) {
            if leg_matches_side(leg, remote.side) {
                return Err(ExecutionError::RemoteDuplicate { ticker });
            }

            return match self.arb_detector.detect_pure(&book).filter(|opp| opp.ticker == ticker) {
                Some(opportunity) => {
                    let max_contracts = opportunity.max_contracts;
                    self.execute_pure_arb(
                        &opportunity,
                        candidate.game.game_id.clone(),
                        candidate.market_kind,
                        candidate.side,
                        max_contracts,
                    )
                    .await
                    .map(CandidateOutcome::Arbitrage)
                }
                None => Err(ExecutionError::ArbitrageConflict { ticker }),
            };
        }

        let wanted = kelly_to_contracts(
            candidate.kelly_fraction,
            bankroll_dollars,
            candidate.exchange_ask_prob,
            self.config.max_bet_dollars,
        );
        if wanted < self.config.min_liquidity_contracts {
            return Err(ExecutionError::BelowMinimumContracts {
                ticker,
                contracts: wanted,
                minimum: self.config.min_liquidity_contracts,
            });
        }

        let levels = match leg {
            Leg::Yes => book.yes_asks(),
            Leg::No => book.no_asks(),
        };
        let estimate = slippage::walk_book(&levels, wanted);
        if !estimate.is_acceptable(self.config.max_slippage_pct) {
            return Err(ExecutionError::SlippageExceeded { ticker });
        }

        let fill_price = estimate.avg_price_cents / 100.0;

        // Step 6: re-size at the actual fill price and take the smaller count.
        let refitted_kelly = kelly_fraction(candidate.true_probability, fill_price, self.config.kelly_fraction_config);
        let refitted = kelly_to_contracts(refitted_kelly, bankroll_dollars, fill_price, self.config.max_bet_dollars);
        let size = wanted.min(refitted);
        if size < self.config.min_liquidity_contracts {
            return Err(ExecutionError::BelowMinimumContracts {
                ticker,
                contracts: size,
                minimum: self.config.min_liquidity_contracts,
            });
        }
        let estimate = if size == wanted { estimate } else { slippage::walk_book(&levels, size) };
        let fill_price = estimate.avg_price_cents / 100.0;

        let adjusted_ev = algo_trade_detection::adjusted_ev(candidate.true_probability, fill_price);
        if adjusted_ev < self.config.ev_threshold {
            return Err(ExecutionError::EvBelowThreshold { adjusted_ev, threshold: self.config.ev_threshold });
        }

        let position = self
            .store
            .insert(NewPosition {
                game_id: candidate.game.game_id.clone(),
                market_kind: candidate.market_kind,
                semantic_side: candidate.side,
                ticker: ticker.clone(),
                leg,
                entry_price: fill_price,
                contracts: size,
            })
            .await?;

        let limit_price = (estimate.best_price_cents + 1).clamp(1, 99);
        let order = build_ioc_order(&ticker, leg, limit_price, size, position.id);

        info!(ticker = %ticker, leg = leg.as_str(), size, fill_price, "submitting execution order");

        let submitted = self.gateway.submit_order(&order).await?;
        tokio::time::sleep(FILL_SETTLE_DELAY).await;
        let settled = self.gateway.order_status(&submitted.order_id).await?;

        Ok(CandidateOutcome::Directional(fill_result(&ticker, leg, size, position.id, &settled, fill_price)))
    }

    /// Hedges an already-held position by buying the opposite leg at its
    /// derived ask, locking in the profit `detect_position` found.
    pub async fn execute_position_arb(
        &self,
        opportunity: &PositionArbOpportunity,
        game_id: String,
        market_kind: algo_trade_core::MarketKind,
        semantic_side: algo_trade_core::SemanticSide,
        held_contracts: u32,
    ) -> Result<ExecutionResult, ExecutionError> {
        let ticker = opportunity.ticker.clone();
        let leg = match opportunity.held_side {
            ArbSide::Yes => Leg::No,
            ArbSide::No => Leg::Yes,
        };

        if self.store.find(&ticker, leg).await?.is_some() {
            return Err(ExecutionError::DuplicatePosition { ticker, leg: leg.as_str() });
        }

        let book = self.gateway.orderbook(&ticker, BOOK_DEPTH).await?;
        let levels = match leg {
            Leg::Yes => book.yes_asks(),
            Leg::No => book.no_asks(),
        };

        let estimate = slippage::walk_book(&levels, held_contracts);
        if estimate.filled == 0 {
            return Err(ExecutionError::SlippageExceeded { ticker });
        }

        let fill_price = estimate.avg_price_cents / 100.0;
        let position = self
            .store
            .insert(NewPosition {
                game_id,
                market_kind,
                semantic_side,
                ticker: ticker.clone(),
                leg,
                entry_price: fill_price,
                contracts: estimate.filled,
            })
            .await?;

        let limit_price = (estimate.best_price_cents + 1).clamp(1, 99);
        let order = build_ioc_order(&ticker, leg, limit_price, estimate.filled, position.id);
        let submitted = self.gateway.submit_order(&order).await?;
        tokio::time::sleep(FILL_SETTLE_DELAY).await;
        let settled = self.gateway.order_status(&submitted.order_id).await?;

        info!(ticker = %ticker, leg = leg.as_str(), "hedge executed against held position");

        Ok(fill_result(&ticker, leg, estimate.filled, position.id, &settled, fill_price))
    }

    /// Buys both the yes and no leg of a pure arbitrage pair (§4.3),
    /// capping size at the smaller of the detected depth and the caller's
    /// own budget cap. The yes leg is submitted first; if it fails, the
    /// no leg is never attempted (no sense opening one unmatched leg).
    pub async fn execute_pure_arb(
        &self,
        opportunity: &PureArbOpportunity,
        game_id: String,
        market_kind: algo_trade_core::MarketKind,
        semantic_side: algo_trade_core::SemanticSide,
        max_contracts: u32,
    ) -> Result<ArbExecutionResult, ExecutionError> {
        let size = opportunity.max_contracts.min(max_contracts);
        if size == 0 {
            return Err(ExecutionError::ZeroSize);
        }

        let yes = self
            .execute_arb_leg(
                &opportunity.ticker,
                Leg::Yes,
                size,
                game_id.clone(),
                market_kind,
                semantic_side,
            )
            .await?;

        let no = match self
            .execute_arb_leg(&opportunity.ticker, Leg::No, size, game_id, market_kind, semantic_side)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                warn!(ticker = %opportunity.ticker, error = %err, "no leg failed after yes leg filled, position is one-sided");
                return Err(err);
            }
        };

        Ok(ArbExecutionResult { yes, no })
    }

    async fn execute_arb_leg(
        &self,
        ticker: &str,
        leg: Leg,
        size: u32,
        game_id: String,
        market_kind: algo_trade_core::MarketKind,
        semantic_side: algo_trade_core::SemanticSide,
    ) -> Result<ExecutionResult, ExecutionError> {
        let book = self.gateway.orderbook(ticker, BOOK_DEPTH).await?;
        let levels = match leg {
            Leg::Yes => book.yes_asks(),
            Leg::No => book.no_asks(),
        };
        let estimate = slippage::walk_book(&levels, size);
        if estimate.filled == 0 {
            return Err(ExecutionError::SlippageExceeded { ticker: ticker.to_string() });
        }
        let fill_price = estimate.avg_price_cents / 100.0;

        let position = self
            .store
            .insert(NewPosition {
                game_id,
                market_kind,
                semantic_side,
                ticker: ticker.to_string(),
                leg,
                entry_price: fill_price,
                contracts: estimate.filled,
            })
            .await?;

        let limit_price = (estimate.best_price_cents + 1).clamp(1, 99);
        let order = build_ioc_order(ticker, leg, limit_price, estimate.filled, position.id);
        let submitted = self.gateway.submit_order(&order).await?;
        tokio::time::sleep(FILL_SETTLE_DELAY).await;
        let settled = self.gateway.order_status(&submitted.order_id).await?;

        Ok(fill_result(ticker, leg, estimate.filled, position.id, &settled, fill_price))
    }
}

/// Whether the exchange's reported `side` on a remote position is the same
/// contract this candidate would submit for `leg`.
fn leg_matches_side(leg: Leg, side: KalshiSide) -> bool {
    matches!((leg, side), (Leg::Yes, KalshiSide::Yes) | (Leg::No, KalshiSide::No))
}

fn build_ioc_order(ticker: &str, leg: Leg, limit_price_cents: u32, count: u32, position_id: i64) -> OrderRequest {
    let base = match leg {
        Leg::Yes => OrderRequest::buy_yes(ticker, limit_price_cents, count),
        Leg::No => OrderRequest::buy_no(ticker, limit_price_cents, count),
    };
    base.with_time_in_force(TimeInForce::ImmediateOrCancel)
        .with_client_order_id(format!("pos-{position_id}"))
}

fn fill_result(
    ticker: &str,
    leg: Leg,
    requested: u32,
    position_id: i64,
    order: &algo_trade_kalshi::Order,
    fallback_price: f64,
) -> ExecutionResult {
    use rust_decimal::prelude::ToPrimitive;

    let avg_fill_price = order
        .avg_fill_price
        .and_then(|p| p.to_f64())
        .map(|cents| cents / 100.0)
        .unwrap_or(fallback_price);

    ExecutionResult {
        ticker: ticker.to_string(),
        leg,
        requested_contracts: requested,
        filled_contracts: order.filled_count,
        avg_fill_price,
        order_id: order.order_id.clone(),
        position_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algo_trade_core::domain::{GameIdentity, MarketKind, SemanticSide};
    use algo_trade_core::position::{Position, PositionStoreError};
    use algo_trade_kalshi::{Action, KalshiError, Order, OrderStatus, OrderType, PriceLevel, Side};
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Mutex;

    struct FakeStore {
        next_id: Mutex<i64>,
        rows: Mutex<HashMap<(String, &'static str), Position>>,
    }

    impl FakeStore {
        fn new() -> Self {
            Self { next_id: Mutex::new(1), rows: Mutex::new(HashMap::new()) }
        }
    }

    #[async_trait::async_trait]
    impl PositionStore for FakeStore {
        async fn insert(&self, position: NewPosition) -> Result<Position, PositionStoreError> {
            let key = (position.ticker.clone(), position.leg.as_str());
            let mut rows = self.rows.lock().await;
            if rows.contains_key(&key) {
                return Err(PositionStoreError::Duplicate { ticker: key.0, leg: key.1 });
            }
            let mut next_id = self.next_id.lock().await;
            let id = *next_id;
            *next_id += 1;
            let row = Position {
                id,
                game_id: position.game_id,
                market_kind: position.market_kind,
                semantic_side: position.semantic_side,
                ticker: position.ticker,
                leg: position.leg,
                entry_price: position.entry_price,
                contracts: position.contracts,
                created_at: Utc::now(),
            };
            rows.insert(key, row.clone());
            Ok(row)
        }

        async fn find(&self, ticker: &str, leg: Leg) -> Result<Option<Position>, PositionStoreError> {
            Ok(self.rows.lock().await.get(&(ticker.to_string(), leg.as_str())).cloned())
        }

        async fn all_open(&self) -> Result<Vec<Position>, PositionStoreError> {
            Ok(self.rows.lock().await.values().cloned().collect())
        }
    }

    struct FakeGateway {
        book: Orderbook,
        remote_positions: Vec<algo_trade_kalshi::Position>,
        submitted: StdMutex<Vec<OrderRequest>>,
    }

    fn no_bid_book(levels: Vec<(u32, u32)>) -> Orderbook {
        Orderbook {
            ticker: "KXNBA-TEST".to_string(),
            yes_bids: vec![],
            no_bids: levels.into_iter().map(|(price, count)| PriceLevel { price, count }).collect(),
            timestamp: Utc::now(),
        }
    }

    fn two_sided_book(yes_bids: Vec<(u32, u32)>, no_bids: Vec<(u32, u32)>) -> Orderbook {
        Orderbook {
            ticker: "KXNBA-TEST".to_string(),
            yes_bids: yes_bids.into_iter().map(|(price, count)| PriceLevel { price, count }).collect(),
            no_bids: no_bids.into_iter().map(|(price, count)| PriceLevel { price, count }).collect(),
            timestamp: Utc::now(),
        }
    }

    fn remote_position(side: Side) -> algo_trade_kalshi::Position {
        algo_trade_kalshi::Position {
            ticker: "KXNBA-TEST".to_string(),
            side,
            count: 10,
            avg_price: rust_decimal::Decimal::from(40),
            market_price: None,
            unrealized_pnl: None,
            realized_pnl: None,
        }
    }

    #[async_trait::async_trait]
    impl ExchangeGateway for FakeGateway {
        async fn orderbook(&self, _ticker: &str, _depth: u32) -> crate::gateway::GatewayResult<Orderbook> {
            Ok(self.book.clone())
        }

        async fn positions(&self) -> crate::gateway::GatewayResult<Vec<algo_trade_kalshi::Position>> {
            Ok(self.remote_positions.clone())
        }

        async fn submit_order(&self, order: &OrderRequest) -> crate::gateway::GatewayResult<Order> {
            self.submitted.lock().unwrap().push(order.clone());
            Ok(Order {
                order_id: "order-1".to_string(),
                client_order_id: order.client_order_id.clone(),
                ticker: order.ticker.clone(),
                side: order.side,
                action: Action::Buy,
                order_type: OrderType::Limit,
                status: OrderStatus::Filled,
                count: order.count,
                filled_count: order.count,
                remaining_count: 0,
                price: order.yes_price.or(order.no_price),
                avg_fill_price: order.yes_price.or(order.no_price).map(|p| rust_decimal::Decimal::from(p)),
                created_time: Some(Utc::now()),
                updated_time: Some(Utc::now()),
            })
        }

        async fn order_status(&self, order_id: &str) -> crate::gateway::GatewayResult<Order> {
            if order_id == "missing" {
                return Err(KalshiError::order_not_found(order_id));
            }
            Ok(Order {
                order_id: order_id.to_string(),
                client_order_id: None,
                ticker: "KXNBA-TEST".to_string(),
                side: Side::Yes,
                action: Action::Buy,
                order_type: OrderType::Limit,
                status: OrderStatus::Filled,
                count: 10,
                filled_count: 10,
                remaining_count: 0,
                price: Some(60),
                avg_fill_price: Some(rust_decimal::Decimal::from(60)),
                created_time: Some(Utc::now()),
                updated_time: Some(Utc::now()),
            })
        }
    }

    fn game() -> GameIdentity {
        GameIdentity {
            game_id: "g1".to_string(),
            home_team: "LAL".to_string(),
            away_team: "BOS".to_string(),
            start_time: Utc::now(),
        }
    }

    fn candidate(ticker: &str) -> OpportunityCandidate {
        OpportunityCandidate {
            game: game(),
            player: None,
            market_kind: MarketKind::Moneyline,
            side: SemanticSide::Home,
            true_probability: 0.58,
            exchange_ask_prob: 0.50,
            raw_ev: 0.08,
            adjusted_ev: 0.0625,
            kelly_fraction: 0.0423,
            book_count: 6,
            ticker: Some(ticker.to_string()),
        }
    }

    fn config() -> ExecutionConfig {
        ExecutionConfig {
            ev_threshold: 0.03,
            max_slippage_pct: 0.10,
            min_liquidity_contracts: 5,
            max_bet_dollars: None,
            kelly_fraction_config: 0.25,
        }
    }

    #[tokio::test]
    async fn missing_ticker_is_rejected() {
        let gateway = Arc::new(FakeGateway {
            book: no_bid_book(vec![(40, 100)]),
            remote_positions: vec![],
            submitted: StdMutex::new(vec![]),
        });
        let store: Arc<dyn PositionStore> = Arc::new(FakeStore::new());
        let controller = ExecutionController::new(gateway, store, config());

        let mut c = candidate("KXNBA-TEST");
        c.ticker = None;
        let result = controller.execute_candidate(&c, Leg::Yes, 10_000.0).await;
        assert!(matches!(result, Err(ExecutionError::MissingTicker)));
    }

    #[tokio::test]
    async fn happy_path_executes_and_persists() {
        let gateway = Arc::new(FakeGateway {
            book: no_bid_book(vec![(40, 1_000)]),
            remote_positions: vec![],
            submitted: StdMutex::new(vec![]),
        });
        let store: Arc<dyn PositionStore> = Arc::new(FakeStore::new());
        let controller = ExecutionController::new(gateway.clone(), store.clone(), config());

        let outcome = controller
            .execute_candidate(&candidate("KXNBA-TEST"), Leg::Yes, 10_000.0)
            .await
            .expect("expected execution to succeed");

        let result = match outcome {
            CandidateOutcome::Directional(result) => result,
            CandidateOutcome::Arbitrage(_) => panic!("expected a directional fill, got an arbitrage pair"),
        };
        assert_eq!(result.ticker, "KXNBA-TEST");
        assert!(result.filled_contracts > 0);
        assert_eq!(gateway.submitted.lock().unwrap().len(), 1);
        assert!(store.find("KXNBA-TEST", Leg::Yes).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn local_duplicate_is_rejected() {
        let gateway = Arc::new(FakeGateway {
            book: no_bid_book(vec![(40, 100)]),
            remote_positions: vec![],
            submitted: StdMutex::new(vec![]),
        });
        let store: Arc<dyn PositionStore> = Arc::new(FakeStore::new());
        store
            .insert(NewPosition {
                game_id: "g1".to_string(),
                market_kind: MarketKind::Moneyline,
                semantic_side: SemanticSide::Home,
                ticker: "KXNBA-TEST".to_string(),
                leg: Leg::Yes,
                entry_price: 0.40,
                contracts: 10,
            })
            .await
            .unwrap();
        let controller = ExecutionController::new(gateway, store, config());

        let result = controller.execute_candidate(&candidate("KXNBA-TEST"), Leg::Yes, 10_000.0).await;
        assert!(matches!(result, Err(ExecutionError::DuplicatePosition { .. })));
    }

    #[tokio::test]
    async fn remote_same_side_duplicate_is_rejected() {
        let gateway = Arc::new(FakeGateway {
            book: no_bid_book(vec![(40, 100)]),
            remote_positions: vec![remote_position(Side::Yes)],
            submitted: StdMutex::new(vec![]),
        });
        let store: Arc<dyn PositionStore> = Arc::new(FakeStore::new());
        let controller = ExecutionController::new(gateway, store, config());

        let result = controller.execute_candidate(&candidate("KXNBA-TEST"), Leg::Yes, 10_000.0).await;
        assert!(matches!(result, Err(ExecutionError::RemoteDuplicate { .. })));
    }

    #[tokio::test]
    async fn remote_opposite_side_with_pure_arb_switches_to_arbitrage() {
        // Remote holds NO while this candidate wants YES; yes ask = 45,
        // no ask = 47, combined 92c is a clean pure arb, so execution
        // should switch to the arbitrage path instead of rejecting.
        let gateway = Arc::new(FakeGateway {
            book: two_sided_book(vec![(53, 100)], vec![(55, 100)]),
            remote_positions: vec![remote_position(Side::No)],
            submitted: StdMutex::new(vec![]),
        });
        let store: Arc<dyn PositionStore> = Arc::new(FakeStore::new());
        let controller = ExecutionController::new(gateway.clone(), store, config());

        let outcome = controller
            .execute_candidate(&candidate("KXNBA-TEST"), Leg::Yes, 10_000.0)
            .await
            .expect("expected the arbitrage pair to execute");

        match outcome {
            CandidateOutcome::Arbitrage(arb) => {
                assert_eq!(arb.yes.ticker, "KXNBA-TEST");
                assert_eq!(arb.no.ticker, "KXNBA-TEST");
            }
            CandidateOutcome::Directional(_) => panic!("expected an arbitrage pair, got a directional fill"),
        }
        assert_eq!(gateway.submitted.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn remote_opposite_side_without_pure_arb_is_conflict() {
        // Remote holds NO; no yes_bids means detect_pure can't derive a
        // no ask at all, so there's no arb to switch into and the
        // candidate must be rejected rather than doubling up the ticker.
        let gateway = Arc::new(FakeGateway {
            book: no_bid_book(vec![(40, 100)]),
            remote_positions: vec![remote_position(Side::No)],
            submitted: StdMutex::new(vec![]),
        });
        let store: Arc<dyn PositionStore> = Arc::new(FakeStore::new());
        let controller = ExecutionController::new(gateway, store, config());

        let result = controller.execute_candidate(&candidate("KXNBA-TEST"), Leg::Yes, 10_000.0).await;
        assert!(matches!(result, Err(ExecutionError::ArbitrageConflict { .. })), "{result:?}");
    }

    #[tokio::test]
    async fn insufficient_liquidity_is_rejected() {
        // Plenty of book depth, but a bankroll too small for Kelly sizing
        // to clear the minimum contract count.
        let gateway = Arc::new(FakeGateway {
            book: no_bid_book(vec![(40, 100)]),
            remote_positions: vec![],
            submitted: StdMutex::new(vec![]),
        });
        let store: Arc<dyn PositionStore> = Arc::new(FakeStore::new());
        let controller = ExecutionController::new(gateway, store, config());

        let result = controller.execute_candidate(&candidate("KXNBA-TEST"), Leg::Yes, 50.0).await;
        assert!(matches!(result, Err(ExecutionError::BelowMinimumContracts { .. })), "{result:?}");
    }

    #[tokio::test]
    async fn steep_slippage_is_rejected_outright() {
        // Best level thin (5 contracts), deep tail at a much worse price:
        // the full requested size can't fill within the slippage budget,
        // and the controller must reject rather than quietly shrinking.
        let gateway = Arc::new(FakeGateway {
            book: no_bid_book(vec![(40, 5), (10, 200)]),
            remote_positions: vec![],
            submitted: StdMutex::new(vec![]),
        });
        let store: Arc<dyn PositionStore> = Arc::new(FakeStore::new());
        let mut cfg = config();
        cfg.max_slippage_pct = 0.01;
        let controller = ExecutionController::new(gateway, store, cfg);

        let result = controller.execute_candidate(&candidate("KXNBA-TEST"), Leg::Yes, 10_000.0).await;
        assert!(matches!(result, Err(ExecutionError::SlippageExceeded { .. })), "{result:?}");
    }
}
