//! The subset of exchange operations the execution controller needs,
//! abstracted behind a trait so it can be driven by a fake in tests
//! without standing up a signed HTTP client (mirrors
//! [`algo_trade_core::PositionStore`]'s seam for the same reason).

use algo_trade_kalshi::{KalshiExecutor, Order, OrderRequest, Orderbook, Position as ExchangePosition};
use async_trait::async_trait;

pub type GatewayResult<T> = Result<T, algo_trade_kalshi::KalshiError>;

#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    async fn orderbook(&self, ticker: &str, depth: u32) -> GatewayResult<Orderbook>;
    async fn positions(&self) -> GatewayResult<Vec<ExchangePosition>>;
    async fn submit_order(&self, order: &OrderRequest) -> GatewayResult<Order>;
    async fn order_status(&self, order_id: &str) -> GatewayResult<Order>;
}

#[async_trait]
impl ExchangeGateway for KalshiExecutor {
    async fn orderbook(&self, ticker: &str, depth: u32) -> GatewayResult<Orderbook> {
        self.client().get_orderbook(ticker, depth).await
    }

    async fn positions(&self) -> GatewayResult<Vec<ExchangePosition>> {
        self.client().get_positions().await
    }

    async fn submit_order(&self, order: &OrderRequest) -> GatewayResult<Order> {
        self.execute_order(order).await
    }

    async fn order_status(&self, order_id: &str) -> GatewayResult<Order> {
        self.get_order(order_id).await
    }
}
