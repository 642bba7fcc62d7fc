//! The scan loop: one periodic tick per `poll_interval`, implementing
//! §4.9 end to end. `main.rs` owns process lifetime; this module owns
//! everything that happens while the process is alive.

use std::sync::Arc;

use algo_trade_arbitrage::ArbitrageDetector;
use algo_trade_core::position::Leg;
use algo_trade_core::{
    is_maintenance_window, normalize_and_match, Alert, AlertDeduper, AppConfig, BookQuote, Game,
    GameIdentity, GamesCache, MarketKind, PlayerIdentity, PlayerPropQuote, PositionStore,
    PropType, ScanSummary, SemanticSide,
};
use algo_trade_data::SqlitePositionStore;
use algo_trade_detection::{evaluate, DetectionConfig, OpportunityCandidate};
use algo_trade_execution::{CandidateOutcome, ExecutionConfig, ExecutionController};
use algo_trade_kalshi::{KalshiClientConfig, KalshiExecutor, KalshiExecutorConfig, Market};
use algo_trade_odds_client::{OddsClient, OddsClientConfig};
use algo_trade_web_api::{ApiServer, HealthState};
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Games-slate cache TTL and duplicate-order-id suffix both live here
/// rather than in `core`, since they're scan-loop concerns rather than
/// shared domain state.
const ALERT_CLEANUP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(600);
const MIN_LEAD: chrono::Duration = chrono::Duration::minutes(1);
const EXCHANGE_TZ: &str = "America/New_York";

const GAME_SERIES: [MarketKind; 1] = [MarketKind::Moneyline];
const PROP_TYPES: [PropType; 6] = [
    PropType::Points,
    PropType::Rebounds,
    PropType::Assists,
    PropType::Threes,
    PropType::Steals,
    PropType::Blocks,
];

/// Builds every collaborator from validated config and runs the scan
/// loop until `shutdown` fires.
pub async fn run(config: AppConfig, shutdown: CancellationToken) -> anyhow::Result<()> {
    let odds_client = OddsClient::new(OddsClientConfig::new(config.credentials.sportsbook_api_key.clone()))?;

    let kalshi_client_config = if config.engine.demo_mode {
        KalshiClientConfig::demo()
    } else {
        KalshiClientConfig::production()
    };
    let executor = Arc::new(KalshiExecutor::with_credentials(
        KalshiExecutorConfig::demo().with_client_config(kalshi_client_config),
        &config.credentials.exchange_key_id,
        &config.credentials.exchange_private_key_pem,
    )?);

    let store: Arc<dyn PositionStore> = Arc::new(SqlitePositionStore::connect(&config.database.path).await?);
    let games_cache = GamesCache::new(std::time::Duration::from_secs(
        config.engine.games_cache_ttl_secs.max(0) as u64,
    ));
    let alert_deduper = AlertDeduper::new(std::time::Duration::from_secs(config.engine.alert_cooldown_secs.max(0) as u64));
    let health = Arc::new(HealthState::new());

    let exec_config = ExecutionConfig::from(&config.engine);
    let controller = ExecutionController::new(executor.clone(), store.clone(), exec_config);
    let arb_detector = ArbitrageDetector::new();

    let exchange_tz: chrono_tz::Tz = EXCHANGE_TZ.parse().unwrap_or(chrono_tz::UTC);

    let server_addr = format!("{}:{}", config.server.host, config.server.port);
    let max_staleness = (config.engine.poll_interval.as_secs() as i64 * 5).max(30);
    let poll_interval = config.engine.poll_interval;

    let health_for_server = health.clone();
    let server_shutdown = shutdown.clone();
    let server_handle = tokio::spawn(async move {
        let server = ApiServer::new(health_for_server, max_staleness);
        if let Err(err) = server.serve(&server_addr, server_shutdown.cancelled_owned()).await {
            warn!(error = %err, "health endpoint exited with error");
        }
    });

    let engine = Engine {
        odds_client,
        executor,
        store,
        games_cache,
        alert_deduper,
        health,
        controller,
        arb_detector,
        exchange_tz,
        config: config.engine,
    };

    let mut scan_ticker = interval(poll_interval);
    let mut cleanup_ticker = interval(ALERT_CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                info!("shutdown signal received, stopping scan loop");
                break;
            }
            _ = scan_ticker.tick() => {
                if let Err(err) = engine.run_tick().await {
                    warn!(error = %err, "scan tick failed");
                }
            }
            _ = cleanup_ticker.tick() => {
                engine.alert_deduper.cleanup();
                debug!(pending = engine.alert_deduper.len(), "alert deduper cleanup ran");
            }
        }
    }

    server_handle.await.ok();
    Ok(())
}

struct Engine {
    odds_client: OddsClient,
    executor: Arc<KalshiExecutor>,
    store: Arc<dyn PositionStore>,
    games_cache: GamesCache,
    alert_deduper: AlertDeduper,
    health: Arc<HealthState>,
    controller: ExecutionController<KalshiExecutor>,
    arb_detector: ArbitrageDetector,
    exchange_tz: chrono_tz::Tz,
    config: algo_trade_core::EngineConfig,
}

impl Engine {
    /// Runs one full scan tick (§4.9 steps 1-9).
    async fn run_tick(&self) -> anyhow::Result<()> {
        let now = Utc::now();

        if is_maintenance_window(now, self.exchange_tz) {
            debug!("in exchange maintenance window, skipping tick");
            return Ok(());
        }

        let date = now.format("%Y-%m-%d").to_string();
        let games = self.fetch_games(&date, now).await?;

        let (balance_cents, degraded) = match self.executor.client().get_balance().await {
            Ok(balance) => (balance.available_balance, false),
            Err(err) => {
                self.alert_deduper.send(Alert::warn(
                    "balance-unreachable",
                    format!("could not fetch exchange balance, degrading to alert-only: {err}"),
                ));
                (0, true)
            }
        };
        let bankroll_dollars = balance_cents as f64 / 100.0;

        let market_map = self.fetch_tradeable_markets().await;

        let mut summary = ScanSummary::new(balance_cents);
        let mut candidates = Vec::new();

        for game in &games {
            if !game.is_scannable(now, MIN_LEAD) {
                continue;
            }
            summary.games_scanned += 1;

            match self.scan_game(game, &market_map, now).await {
                Ok(mut found) => candidates.append(&mut found),
                Err(err) => {
                    warn!(game_id = %game.game_id, error = %err, "failed to scan game");
                }
            }
        }

        candidates.sort_by(|a: &OpportunityCandidate, b: &OpportunityCandidate| {
            b.adjusted_ev.partial_cmp(&a.adjusted_ev).unwrap_or(std::cmp::Ordering::Equal)
        });
        summary.candidates_found = candidates.len() as u32;

        let mut remaining_bankroll = bankroll_dollars;
        if !degraded && self.config.auto_execute {
            for candidate in &candidates {
                let leg = side_to_leg(candidate.side);
                match self.controller.execute_candidate(candidate, leg, remaining_bankroll).await {
                    Ok(CandidateOutcome::Directional(result)) => {
                        remaining_bankroll -= result.filled_contracts as f64 * result.avg_fill_price;
                        summary.orders_submitted += 1;
                        self.alert_deduper.send(Alert::info(
                            format!("executed-{}", result.ticker),
                            format!(
                                "filled {} of {} {} contracts on {} at {:.2}",
                                result.filled_contracts,
                                result.requested_contracts,
                                result.leg.as_str(),
                                result.ticker,
                                result.avg_fill_price
                            ),
                        ));
                    }
                    Ok(CandidateOutcome::Arbitrage(arb)) => {
                        remaining_bankroll -= arb.yes.filled_contracts as f64 * arb.yes.avg_fill_price;
                        remaining_bankroll -= arb.no.filled_contracts as f64 * arb.no.avg_fill_price;
                        summary.orders_submitted += 2;
                        self.alert_deduper.send(Alert::info(
                            format!("executed-arb-{}", arb.yes.ticker),
                            format!(
                                "switched to pure arb on {}: yes {} @ {:.2}, no {} @ {:.2}",
                                arb.yes.ticker,
                                arb.yes.filled_contracts,
                                arb.yes.avg_fill_price,
                                arb.no.filled_contracts,
                                arb.no.avg_fill_price
                            ),
                        ));
                    }
                    Err(err) => {
                        debug!(ticker = ?candidate.ticker, error = %err, "candidate rejected at execution");
                    }
                }
            }
        } else if !candidates.is_empty() {
            for candidate in &candidates {
                self.alert_deduper.send(Alert::info(
                    format!("candidate-{}-{}", candidate.game.game_id, candidate.market_kind),
                    format!(
                        "edge found: {} {} adjusted_ev={:.4} kelly={:.4} (alert-only)",
                        candidate.market_kind, candidate.side, candidate.adjusted_ev, candidate.kelly_fraction
                    ),
                ));
            }
        }

        summary.bankroll_after_cents = (remaining_bankroll * 100.0).round() as i64;

        self.sweep_hedges(degraded).await;

        self.alert_deduper.send(Alert::info(
            "scan-summary",
            format!(
                "scanned {} games, {} candidates, {} orders",
                summary.games_scanned, summary.candidates_found, summary.orders_submitted
            ),
        ));
        self.health.record_tick(summary);

        Ok(())
    }

    async fn fetch_games(&self, date: &str, now: chrono::DateTime<Utc>) -> anyhow::Result<Vec<Game>> {
        let naive_date = now.date_naive();
        if let Some(cached) = self.games_cache.get(naive_date, now) {
            return Ok(cached);
        }
        let games = self.odds_client.get_games(date).await?;
        self.games_cache.put(naive_date, games.clone(), now);
        Ok(games)
    }

    /// Fetches every tradeable market for the day's game and prop series,
    /// keyed by ticker (tickers are globally unique by construction).
    async fn fetch_tradeable_markets(&self) -> Vec<Market> {
        let mut markets = Vec::new();
        let game_prefixes = GAME_SERIES
            .iter()
            .map(|kind| algo_trade_core::ticker::TickerSeries::from_market_kind(*kind).code())
            .chain(["KXNBASPREAD", "KXNBATOTAL"]);
        let prop_prefixes = PROP_TYPES
            .iter()
            .map(|p| algo_trade_core::ticker::TickerSeries::Prop(*p).code());

        for prefix in game_prefixes.chain(prop_prefixes) {
            match self.executor.client().get_tradeable_markets(prefix).await {
                Ok(mut found) => markets.append(&mut found),
                Err(err) => warn!(prefix, error = %err, "failed to fetch tradeable markets"),
            }
        }
        markets
    }

    /// Builds consensus and evaluates both sides for every market of one
    /// game: moneyline, spread, total, and every player prop.
    async fn scan_game(
        &self,
        game: &Game,
        markets: &[Market],
        now: chrono::DateTime<Utc>,
    ) -> anyhow::Result<Vec<OpportunityCandidate>> {
        let identity = GameIdentity {
            game_id: game.game_id.clone(),
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            start_time: game.start_time,
        };

        let quotes = self.odds_client.get_game_odds(&game.game_id).await?;
        let prop_quotes = self.odds_client.get_player_props(&game.game_id).await?;

        let freshness = self.config.book_freshness_secs.map(chrono::Duration::seconds);

        let mut candidates = Vec::new();

        if let Some(found) =
            self.evaluate_game_market(&identity, MarketKind::Moneyline, &quotes, markets, freshness, now)
        {
            candidates.extend(found);
        }
        if let Some(market) = find_line_market(markets, "KXNBASPREAD", &identity) {
            if let Some(line) = market_target_line(market) {
                if let Some(found) =
                    self.evaluate_game_market(&identity, MarketKind::Spread(line), &quotes, markets, freshness, now)
                {
                    candidates.extend(found);
                }
            }
        }
        if let Some(market) = find_line_market(markets, "KXNBATOTAL", &identity) {
            if let Some(line) = market_target_line(market) {
                if let Some(found) =
                    self.evaluate_game_market(&identity, MarketKind::Total(line), &quotes, markets, freshness, now)
                {
                    candidates.extend(found);
                }
            }
        }

        candidates.extend(self.evaluate_props(&identity, &prop_quotes, markets));

        Ok(candidates)
    }

    fn evaluate_game_market(
        &self,
        identity: &GameIdentity,
        kind: MarketKind,
        quotes: &[BookQuote],
        markets: &[Market],
        freshness: Option<chrono::Duration>,
        now: chrono::DateTime<Utc>,
    ) -> Option<Vec<OpportunityCandidate>> {
        let ticker = algo_trade_core::build_ticker(kind, identity.start_time, &identity.away_team, &identity.home_team);
        let market = markets.iter().find(|m| m.ticker == ticker)?;
        let exchange_raw_prob_a = ask_prob(market.yes_ask)?;

        let consensus = algo_trade_consensus::build_game_consensus(quotes, kind, exchange_raw_prob_a, freshness, now)
            .map_err(|err| debug!(%ticker, error = %err, "no game consensus"))
            .ok()?;

        let detection_config = DetectionConfig {
            ev_threshold: self.config.ev_threshold,
            kelly_fraction: self.config.kelly_fraction,
            min_book_count: self.config.min_book_count,
            max_bet_dollars: self.config.max_bet_dollars,
        };

        let mut found = Vec::new();
        for side in [side_a_of(kind), side_a_of(kind).opposite()] {
            let price = match side_to_leg(side) {
                Leg::Yes => ask_prob(market.yes_ask),
                Leg::No => ask_prob(market.no_ask),
            };
            let Some(price) = price else { continue };
            if let Some(mut candidate) = evaluate(&consensus, identity.clone(), side, price, &detection_config, 0.0) {
                candidate.ticker = Some(ticker.clone());
                found.push(candidate);
            }
        }
        Some(found)
    }

    /// Groups player-prop quotes by (player, prop type), resolves each
    /// group's exchange market by fuzzy name matching against the
    /// market's title/subtitle, and evaluates both over/under sides.
    fn evaluate_props(
        &self,
        identity: &GameIdentity,
        quotes: &[PlayerPropQuote],
        markets: &[Market],
    ) -> Vec<OpportunityCandidate> {
        let mut seen: Vec<(String, PropType)> = Vec::new();
        let mut out = Vec::new();

        for quote in quotes {
            let key = (quote.player.player_id.clone(), quote.prop_type);
            if seen.contains(&key) {
                continue;
            }
            seen.push(key.clone());

            let Some(market) = find_prop_market(markets, &quote.player, quote.prop_type) else { continue };
            let Some(target_line) = market_target_line(market) else { continue };
            let Some(exchange_raw_prob_a) = ask_prob(market.yes_ask) else { continue };

            let consensus = match algo_trade_consensus::build_prop_consensus(
                quotes,
                quote.player.clone(),
                quote.prop_type,
                target_line,
                exchange_raw_prob_a,
            ) {
                Ok(c) => c,
                Err(err) => {
                    debug!(player = %quote.player.name, prop = %quote.prop_type, error = %err, "no prop consensus");
                    continue;
                }
            };

            let detection_config = DetectionConfig {
                ev_threshold: self.config.ev_threshold,
                kelly_fraction: self.config.kelly_fraction,
                min_book_count: self.config.min_book_count,
                max_bet_dollars: self.config.max_bet_dollars,
            };

            for side in [SemanticSide::Over, SemanticSide::Under] {
                let price = match side_to_leg(side) {
                    Leg::Yes => ask_prob(market.yes_ask),
                    Leg::No => ask_prob(market.no_ask),
                };
                let Some(price) = price else { continue };
                if let Some(mut candidate) =
                    evaluate(&consensus, identity.clone(), side, price, &detection_config, 0.0)
                {
                    candidate.ticker = Some(market.ticker.clone());
                    candidate.player = Some(quote.player.clone());
                    out.push(candidate);
                }
            }
        }
        out
    }

    /// Sweeps every open position for a hedge opportunity against its
    /// current book (§4.9 step 8, §4.7).
    async fn sweep_hedges(&self, degraded: bool) {
        let positions = match self.store.all_open().await {
            Ok(p) => p,
            Err(err) => {
                warn!(error = %err, "failed to list open positions for hedge sweep");
                return;
            }
        };

        for position in positions {
            let book = match self.executor.client().get_orderbook(&position.ticker, 25).await {
                Ok(book) => book,
                Err(err) => {
                    debug!(ticker = %position.ticker, error = %err, "failed to fetch book for hedge sweep");
                    continue;
                }
            };
            let arb_side = leg_to_arb_side(position.leg);
            let Some(opportunity) = self.arb_detector.detect_position(&book, arb_side, position.entry_price) else {
                continue;
            };

            if !degraded && self.config.auto_execute {
                match self
                    .controller
                    .execute_position_arb(
                        &opportunity,
                        position.game_id.clone(),
                        position.market_kind,
                        position.semantic_side,
                        position.contracts,
                    )
                    .await
                {
                    Ok(result) => info!(ticker = %result.ticker, "hedged open position"),
                    Err(err) => warn!(ticker = %position.ticker, error = %err, "failed to execute hedge"),
                }
            } else {
                self.alert_deduper.send(Alert::info(
                    format!("hedge-{}", position.ticker),
                    format!(
                        "hedge available on {}: profit {:.2}c ({:.2}%) (alert-only)",
                        position.ticker,
                        opportunity.profit_cents,
                        opportunity.profit_pct * 100.0
                    ),
                ));
            }
        }
    }
}

/// `true_prob_a` always corresponds to the home/over side; which label
/// applies depends on the market kind (moneyline/spread use home/away,
/// total uses over/under). Props are handled separately via
/// `Over`/`Under` in [`Engine::evaluate_props`].
fn side_a_of(kind: MarketKind) -> SemanticSide {
    match kind {
        MarketKind::Total(_) => SemanticSide::Over,
        MarketKind::Moneyline | MarketKind::Spread(_) | MarketKind::Prop { .. } => SemanticSide::Home,
    }
}

/// Maps the odds-aggregator's semantic side onto the exchange's yes/no
/// contract: home/over is always side A, which this engine's ticker and
/// consensus conventions treat as the `yes` contract.
fn side_to_leg(side: SemanticSide) -> Leg {
    match side {
        SemanticSide::Home | SemanticSide::Over => Leg::Yes,
        SemanticSide::Away | SemanticSide::Under => Leg::No,
    }
}

fn leg_to_arb_side(leg: Leg) -> algo_trade_arbitrage::Side {
    match leg {
        Leg::Yes => algo_trade_arbitrage::Side::Yes,
        Leg::No => algo_trade_arbitrage::Side::No,
    }
}

/// Converts a cents-denominated ask price into a validated (0,1)
/// probability, rejecting missing or out-of-range quotes.
fn ask_prob(cents: Option<rust_decimal::Decimal>) -> Option<f64> {
    let cents = cents?.to_f64()?;
    if !(0.0..100.0).contains(&cents) {
        return None;
    }
    Some(cents / 100.0)
}

/// Reads the exchange's own target line back off the matched market,
/// since game-level tickers never encode it (§6).
fn market_target_line(market: &Market) -> Option<f64> {
    market.strike_value.and_then(|d| d.to_f64())
}

fn find_line_market<'a>(markets: &'a [Market], prefix: &str, identity: &GameIdentity) -> Option<&'a Market> {
    let date = algo_trade_core::ticker::date_component(identity.start_time);
    markets.iter().find(|m| {
        m.ticker.starts_with(prefix)
            && m.ticker.contains(&date)
            && m.ticker.to_uppercase().contains(&identity.away_team.to_uppercase())
            && m.ticker.to_uppercase().contains(&identity.home_team.to_uppercase())
    })
}

/// Resolves a player-prop's exchange market by prop-type series prefix
/// plus fuzzy name matching against the market's title/subtitle — the
/// exchange has no shared player-id scheme with the odds aggregator.
fn find_prop_market<'a>(markets: &'a [Market], player: &PlayerIdentity, prop_type: PropType) -> Option<&'a Market> {
    let series = algo_trade_core::ticker::TickerSeries::Prop(prop_type);
    let prefix = series.code();
    markets.iter().find(|m| {
        m.ticker.starts_with(prefix)
            && (normalize_and_match(&m.title, &player.name)
                || m.subtitle.as_deref().is_some_and(|s| normalize_and_match(s, &player.name)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn side_to_leg_maps_home_and_over_to_yes() {
        assert_eq!(side_to_leg(SemanticSide::Home), Leg::Yes);
        assert_eq!(side_to_leg(SemanticSide::Over), Leg::Yes);
        assert_eq!(side_to_leg(SemanticSide::Away), Leg::No);
        assert_eq!(side_to_leg(SemanticSide::Under), Leg::No);
    }

    #[test]
    fn ask_prob_rejects_out_of_range_and_missing() {
        assert_eq!(ask_prob(None), None);
        assert_eq!(ask_prob(Some(dec!(0))), None);
        assert_eq!(ask_prob(Some(dec!(100))), None);
        assert_eq!(ask_prob(Some(dec!(45))), Some(0.45));
    }

    #[test]
    fn market_target_line_reads_strike_value() {
        let mut market = sample_market();
        market.strike_value = Some(dec!(-3.5));
        assert_eq!(market_target_line(&market), Some(-3.5));
        market.strike_value = None;
        assert_eq!(market_target_line(&market), None);
    }

    fn sample_market() -> Market {
        Market {
            ticker: "KXNBA-26FEB02LALBOS".to_string(),
            event_ticker: "KXNBA-26FEB02LALBOS".to_string(),
            title: "Lakers vs Celtics".to_string(),
            subtitle: None,
            status: algo_trade_kalshi::MarketStatus::Open,
            yes_bid: None,
            yes_ask: None,
            no_bid: None,
            no_ask: None,
            last_price: None,
            volume_24h: None,
            open_interest: None,
            close_time: None,
            expiration_time: None,
            strike_value: None,
            category: None,
        }
    }
}
