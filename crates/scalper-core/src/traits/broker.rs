//! Broker trait definition.

use crate::error::BrokerError;
use crate::types::{AccountInfo, Bar, OrderRequest, OrderResult, Position, Quote, Timeframe};
use async_trait::async_trait;

/// Trait for the broker terminal connection.
///
/// Brokers deliver market data, execute orders and manage open positions.
/// Failures are reported as [`BrokerError`]; callers decide which ones are fatal.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Establish the terminal connection. Failure here is fatal at startup.
    async fn initialize(&self) -> Result<(), BrokerError>;

    /// Fetch the most recent `count` bars, ordered oldest to newest.
    ///
    /// An empty vector means no data is available right now.
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<Vec<Bar>, BrokerError>;

    /// Current best bid/ask.
    async fn quote(&self, symbol: &str) -> Result<Quote, BrokerError>;

    /// Account snapshot (equity, balance).
    async fn account(&self) -> Result<AccountInfo, BrokerError>;

    /// All open positions on `symbol`.
    async fn positions(&self, symbol: &str) -> Result<Vec<Position>, BrokerError>;

    /// Submit a market order.
    ///
    /// # Returns
    /// The terminal's result when the request is done; rejections are
    /// reported as [`BrokerError::Rejected`] carrying the return code.
    async fn submit_order(&self, request: OrderRequest) -> Result<OrderResult, BrokerError>;

    /// Move the stop-loss of an open position, keeping its take-profit.
    async fn modify_stop_loss(
        &self,
        position: &Position,
        stop_loss: f64,
    ) -> Result<OrderResult, BrokerError>;

    /// Get the broker name.
    fn name(&self) -> &str;
}
