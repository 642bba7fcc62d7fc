//! Data models for Kalshi exchange integration.
//!
//! All financial values use `rust_decimal::Decimal` for precision.
//! Kalshi uses cents (1-99) for prices.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Market Types
// =============================================================================

/// A Kalshi market (event contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Market ticker (e.g., "KXNBA-26FEB02-B100000").
    pub ticker: String,

    /// Event ticker this market belongs to.
    pub event_ticker: String,

    /// Market title/question.
    pub title: String,

    /// Market subtitle (often describes the condition).
    pub subtitle: Option<String>,

    /// Whether the market is currently open for trading.
    pub status: MarketStatus,

    /// Yes bid price in cents (1-99).
    pub yes_bid: Option<Decimal>,

    /// Yes ask price in cents (1-99).
    pub yes_ask: Option<Decimal>,

    /// No bid price in cents (1-99).
    pub no_bid: Option<Decimal>,

    /// No ask price in cents (1-99).
    pub no_ask: Option<Decimal>,

    /// Last trade price in cents.
    pub last_price: Option<Decimal>,

    /// 24h volume in contracts.
    pub volume_24h: Option<i64>,

    /// Open interest (total outstanding contracts).
    pub open_interest: Option<i64>,

    /// Market close time.
    pub close_time: Option<DateTime<Utc>>,

    /// Expiration/settlement time.
    pub expiration_time: Option<DateTime<Utc>>,

    /// Strike value for the market (e.g., 100000 for "$100,000").
    pub strike_value: Option<Decimal>,

    /// Category (e.g., "Crypto").
    pub category: Option<String>,
}

impl Market {
    /// Returns the yes mid price in cents.
    #[must_use]
    pub fn yes_mid(&self) -> Option<Decimal> {
        match (self.yes_bid, self.yes_ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            (Some(bid), None) => Some(bid),
            (None, Some(ask)) => Some(ask),
            (None, None) => self.last_price,
        }
    }

    /// Returns the no mid price in cents.
    #[must_use]
    pub fn no_mid(&self) -> Option<Decimal> {
        match (self.no_bid, self.no_ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            (Some(bid), None) => Some(bid),
            (None, Some(ask)) => Some(ask),
            (None, None) => self.last_price.map(|p| Decimal::from(100) - p),
        }
    }

    /// Returns true if the market is currently tradeable.
    #[must_use]
    pub fn is_tradeable(&self) -> bool {
        self.status == MarketStatus::Open
    }

    /// Returns the yes-no spread in cents.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        match (self.yes_bid, self.yes_ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }
}

/// Market status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStatus {
    /// Market is open for trading.
    Open,
    /// Market is closed (no trading).
    Closed,
    /// Market has settled.
    Settled,
    /// Market is paused.
    Paused,
}

// =============================================================================
// Order Types
// =============================================================================

/// Side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy YES contracts.
    Yes,
    /// Buy NO contracts.
    No,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    /// Returns the API string representation.
    #[must_use]
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

/// Order action (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Buy contracts.
    Buy,
    /// Sell contracts.
    Sell,
}

impl Action {
    /// Returns the API string representation.
    #[must_use]
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Market order (fill at best available).
    Market,
    /// Limit order (fill at specified price or better).
    Limit,
}

/// Time-in-force instruction for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeInForce {
    /// Good-till-cancelled: rests on the book until filled or cancelled.
    GoodTillCancelled,
    /// Immediate-or-cancel: fills what it can at submission, cancels the rest.
    /// The execution controller (§4.8) always submits limit-IOC orders so a
    /// partial book never leaves a resting order behind.
    ImmediateOrCancel,
}

/// Request to submit an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    /// Market ticker.
    pub ticker: String,

    /// Side (yes/no).
    pub side: Side,

    /// Action (buy/sell).
    pub action: Action,

    /// Order type.
    pub order_type: OrderType,

    /// Number of contracts.
    pub count: u32,

    /// Price in cents (1-99) for limit orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_price: Option<u32>,

    /// Price in cents (1-99) for limit orders (alternative).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_price: Option<u32>,

    /// Client-specified order ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,

    /// Time-in-force expiration time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_ts: Option<i64>,

    /// Time-in-force instruction. Defaults to [`TimeInForce::GoodTillCancelled`]
    /// for the constructors below; the execution controller overrides this to
    /// [`TimeInForce::ImmediateOrCancel`] via [`OrderRequest::with_time_in_force`].
    pub time_in_force: TimeInForce,
}

impl OrderRequest {
    /// Creates a new limit buy order for YES contracts.
    pub fn buy_yes(ticker: impl Into<String>, price_cents: u32, count: u32) -> Self {
        Self {
            ticker: ticker.into(),
            side: Side::Yes,
            action: Action::Buy,
            order_type: OrderType::Limit,
            count,
            yes_price: Some(price_cents),
            no_price: None,
            client_order_id: None,
            expiration_ts: None,
            time_in_force: TimeInForce::GoodTillCancelled,
        }
    }

    /// Creates a new limit buy order for NO contracts.
    pub fn buy_no(ticker: impl Into<String>, price_cents: u32, count: u32) -> Self {
        Self {
            ticker: ticker.into(),
            side: Side::No,
            action: Action::Buy,
            order_type: OrderType::Limit,
            count,
            yes_price: None,
            no_price: Some(price_cents),
            client_order_id: None,
            expiration_ts: None,
            time_in_force: TimeInForce::GoodTillCancelled,
        }
    }

    /// Creates a new market buy order.
    pub fn market_buy(ticker: impl Into<String>, side: Side, count: u32) -> Self {
        Self {
            ticker: ticker.into(),
            side,
            action: Action::Buy,
            order_type: OrderType::Market,
            count,
            yes_price: None,
            no_price: None,
            client_order_id: None,
            expiration_ts: None,
            time_in_force: TimeInForce::GoodTillCancelled,
        }
    }

    /// Sets a client order ID.
    #[must_use]
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    /// Sets the time-in-force instruction.
    #[must_use]
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Sets an expiration timestamp.
    #[must_use]
    pub fn with_expiration(mut self, ts: i64) -> Self {
        self.expiration_ts = Some(ts);
        self
    }

    /// Returns the order value in cents.
    #[must_use]
    pub fn order_value_cents(&self) -> u64 {
        let price = self.yes_price.or(self.no_price).unwrap_or(50) as u64;
        price * self.count as u64
    }
}

/// Status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order is pending (not yet on book).
    Pending,
    /// Order is resting on the book.
    Resting,
    /// Order was fully filled.
    Filled,
    /// Order was cancelled.
    Cancelled,
    /// Order was partially filled then cancelled.
    PartialFilled,
    /// Order was rejected.
    Rejected,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Cancelled | Self::PartialFilled | Self::Rejected
        )
    }

    /// Returns true if the order has any fills.
    #[must_use]
    pub fn has_fills(self) -> bool {
        matches!(self, Self::Filled | Self::PartialFilled)
    }
}

/// Response from order submission or status query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Order ID assigned by Kalshi.
    pub order_id: String,

    /// Client order ID if provided.
    pub client_order_id: Option<String>,

    /// Market ticker.
    pub ticker: String,

    /// Side (yes/no).
    pub side: Side,

    /// Action (buy/sell).
    pub action: Action,

    /// Order type.
    pub order_type: OrderType,

    /// Order status.
    pub status: OrderStatus,

    /// Original order quantity.
    pub count: u32,

    /// Filled quantity.
    pub filled_count: u32,

    /// Remaining quantity.
    pub remaining_count: u32,

    /// Limit price in cents (if limit order).
    pub price: Option<u32>,

    /// Average fill price in cents.
    pub avg_fill_price: Option<Decimal>,

    /// Order creation time.
    pub created_time: Option<DateTime<Utc>>,

    /// Last update time.
    pub updated_time: Option<DateTime<Utc>>,
}

impl Order {
    /// Returns true if the order is fully filled.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }

    /// Returns true if the order is partially filled.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.status == OrderStatus::PartialFilled
            || (self.filled_count > 0 && self.remaining_count > 0)
    }

    /// Returns the fill rate (0.0 to 1.0).
    #[must_use]
    pub fn fill_rate(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.filled_count as f64 / self.count as f64
    }

    /// Returns the filled value in cents.
    #[must_use]
    pub fn filled_value_cents(&self) -> Decimal {
        match self.avg_fill_price {
            Some(price) => price * Decimal::from(self.filled_count),
            None => Decimal::ZERO,
        }
    }
}

// =============================================================================
// Position Types
// =============================================================================

/// A position in a market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Market ticker.
    pub ticker: String,

    /// Side (yes/no contracts held).
    pub side: Side,

    /// Number of contracts held.
    pub count: u32,

    /// Average entry price in cents.
    pub avg_price: Decimal,

    /// Current market price in cents.
    pub market_price: Option<Decimal>,

    /// Unrealized P&L in cents.
    pub unrealized_pnl: Option<Decimal>,

    /// Realized P&L in cents.
    pub realized_pnl: Option<Decimal>,
}

impl Position {
    /// Returns the position value at entry in cents.
    #[must_use]
    pub fn entry_value_cents(&self) -> Decimal {
        self.avg_price * Decimal::from(self.count)
    }

    /// Returns the current position value in cents (if market price known).
    #[must_use]
    pub fn current_value_cents(&self) -> Option<Decimal> {
        self.market_price.map(|p| p * Decimal::from(self.count))
    }
}

// =============================================================================
// Orderbook Types
// =============================================================================

/// A price level in the orderbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price in cents.
    pub price: u32,

    /// Total contracts at this level.
    pub count: u32,
}

/// Orderbook for a binary market.
///
/// Kalshi's wire format only ever carries resting bids: a yes bid book and
/// a no bid book. An ask on one side is nothing but the complement of a bid
/// on the other (`ask_price = 100 - bid_price`), so asks are never stored —
/// they're derived on every access from whichever bid book they mirror.
/// This keeps the two books from drifting out of sync with each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orderbook {
    /// Market ticker.
    pub ticker: String,

    /// Yes bid levels (sorted by price descending).
    pub yes_bids: Vec<PriceLevel>,

    /// No bid levels (sorted by price descending).
    pub no_bids: Vec<PriceLevel>,

    /// Timestamp of the snapshot.
    pub timestamp: DateTime<Utc>,
}

impl Orderbook {
    /// Derives the yes ask book (sorted by price ascending) from the no
    /// bid book: `yes_ask_price = 100 - no_bid_price`.
    #[must_use]
    pub fn yes_asks(&self) -> Vec<PriceLevel> {
        let mut levels: Vec<PriceLevel> = self
            .no_bids
            .iter()
            .map(|l| PriceLevel { price: 100 - l.price, count: l.count })
            .collect();
        levels.sort_by_key(|l| l.price);
        levels
    }

    /// Derives the no ask book (sorted by price ascending) from the yes
    /// bid book: `no_ask_price = 100 - yes_bid_price`.
    #[must_use]
    pub fn no_asks(&self) -> Vec<PriceLevel> {
        let mut levels: Vec<PriceLevel> = self
            .yes_bids
            .iter()
            .map(|l| PriceLevel { price: 100 - l.price, count: l.count })
            .collect();
        levels.sort_by_key(|l| l.price);
        levels
    }

    /// Returns the best yes bid price.
    #[must_use]
    pub fn best_yes_bid(&self) -> Option<u32> {
        self.yes_bids.first().map(|l| l.price)
    }

    /// Returns the best yes ask price (100 - best no bid).
    #[must_use]
    pub fn best_yes_ask(&self) -> Option<u32> {
        self.best_no_bid_raw().map(|p| 100 - p)
    }

    /// Returns the best no bid price.
    #[must_use]
    pub fn best_no_bid(&self) -> Option<u32> {
        self.best_no_bid_raw()
    }

    /// Returns the best no ask price (100 - best yes bid).
    #[must_use]
    pub fn best_no_ask(&self) -> Option<u32> {
        self.best_yes_bid().map(|p| 100 - p)
    }

    fn best_no_bid_raw(&self) -> Option<u32> {
        self.no_bids.first().map(|l| l.price)
    }

    /// Returns the yes bid-ask spread in cents.
    #[must_use]
    pub fn yes_spread(&self) -> Option<u32> {
        match (self.best_yes_bid(), self.best_yes_ask()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Returns total liquidity on yes bid side.
    #[must_use]
    pub fn yes_bid_depth(&self) -> u32 {
        self.yes_bids.iter().map(|l| l.count).sum()
    }

    /// Returns total liquidity on yes ask side (mirrors no bid depth).
    #[must_use]
    pub fn yes_ask_depth(&self) -> u32 {
        self.no_bids.iter().map(|l| l.count).sum()
    }

    /// Returns total liquidity on no bid side.
    #[must_use]
    pub fn no_bid_depth(&self) -> u32 {
        self.no_bids.iter().map(|l| l.count).sum()
    }

    /// Returns total liquidity on no ask side (mirrors yes bid depth).
    #[must_use]
    pub fn no_ask_depth(&self) -> u32 {
        self.yes_bids.iter().map(|l| l.count).sum()
    }
}

// =============================================================================
// Exchange Status
// =============================================================================

/// The exchange's own active/trading flags (§6), distinct from the
/// maintenance-window check — the exchange can declare itself degraded
/// outside the scheduled weekly window too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeStatus {
    pub exchange_active: bool,
    pub trading_active: bool,
}

impl ExchangeStatus {
    /// Whether the scan loop should attempt execution this tick.
    #[must_use]
    pub fn is_tradeable(&self) -> bool {
        self.exchange_active && self.trading_active
    }
}

// =============================================================================
// Balance Types
// =============================================================================

/// Account balance information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    /// Total balance in cents.
    pub balance: i64,

    /// Available balance for trading in cents.
    pub available_balance: i64,

    /// Balance reserved for open orders in cents.
    pub reserved_balance: i64,
}

impl Balance {
    /// Returns available balance as Decimal.
    #[must_use]
    pub fn available_decimal(&self) -> Decimal {
        Decimal::from(self.available_balance)
    }

    /// Returns total balance as Decimal.
    #[must_use]
    pub fn total_decimal(&self) -> Decimal {
        Decimal::from(self.balance)
    }
}

// =============================================================================
// API Response Types
// =============================================================================

/// Wrapper for paginated API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    /// The data items.
    pub data: Vec<T>,

    /// Cursor for next page.
    pub cursor: Option<String>,
}

/// API response for market data.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsResponse {
    /// List of markets.
    pub markets: Vec<Market>,

    /// Cursor for pagination.
    pub cursor: Option<String>,
}

/// API response for order submission.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    /// The submitted order.
    pub order: Order,
}

/// API response for balance query.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    /// Account balance.
    pub balance: i64,
}
