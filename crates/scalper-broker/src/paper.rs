//! Paper broker for replay and simulation.
//!
//! Replays a bar history one bar per `fetch_bars` call, quotes around the
//! latest close, fills market orders at the quote and closes positions when a
//! bar touches their stop or target.

use async_trait::async_trait;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use scalper_core::error::BrokerError;
use scalper_core::traits::Broker;
use scalper_core::types::{
    AccountInfo, Bar, OrderRequest, OrderResult, Position, Quote, Side, Timeframe, RETCODE_DONE,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Return code for invalid stop levels.
pub const RETCODE_INVALID_STOPS: u32 = 10016;
/// Return code for an invalid volume.
pub const RETCODE_INVALID_VOLUME: u32 = 10014;

#[derive(Debug)]
struct PaperState {
    bars: Vec<Bar>,
    /// Bars `[..cursor]` are visible.
    cursor: usize,
    balance: Decimal,
    positions: BTreeMap<u64, Position>,
    next_ticket: u64,
    order_rejection: Option<(u32, String)>,
    modify_rejection: Option<(u32, String)>,
    account_available: bool,
    modify_calls: usize,
}

impl PaperState {
    fn last_bar(&self) -> Option<&Bar> {
        self.cursor.checked_sub(1).and_then(|i| self.bars.get(i))
    }

    /// Close positions whose stop or target lies inside `bar`.
    ///
    /// When both are inside the same bar the stop wins.
    fn settle(&mut self, bar: Bar, contract_value: Decimal) {
        let mut closed = Vec::new();
        for (ticket, position) in &self.positions {
            let (stop_hit, target_hit) = match position.side {
                Side::Buy => (
                    position.stop_loss > 0.0 && bar.low <= position.stop_loss,
                    position.take_profit > 0.0 && bar.high >= position.take_profit,
                ),
                Side::Sell => (
                    position.stop_loss > 0.0 && bar.high >= position.stop_loss,
                    position.take_profit > 0.0 && bar.low <= position.take_profit,
                ),
            };
            let exit = if stop_hit {
                position.stop_loss
            } else if target_hit {
                position.take_profit
            } else {
                continue;
            };
            closed.push((*ticket, exit));
        }

        for (ticket, exit) in closed {
            if let Some(position) = self.positions.remove(&ticket) {
                let pnl = profit(&position, exit, contract_value);
                self.balance += pnl;
                info!(ticket, exit, %pnl, "Paper position closed");
            }
        }
    }
}

fn profit(position: &Position, exit: f64, contract_value: Decimal) -> Decimal {
    let moved = Decimal::from_f64(position.favourable_move(exit)).unwrap_or(Decimal::ZERO);
    moved * position.volume * contract_value
}

/// Paper trading broker.
#[derive(Clone)]
pub struct PaperBroker {
    state: Arc<Mutex<PaperState>>,
    symbol: String,
    spread: f64,
    contract_value: Decimal,
}

impl PaperBroker {
    /// Broker with a fixed history; every bar is visible and nothing advances.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>, initial_balance: Decimal) -> Self {
        let cursor = bars.len();
        Self::with_cursor(symbol, bars, initial_balance, cursor)
    }

    /// Broker that reveals `start` bars, then one more per `fetch_bars` call.
    pub fn replay(
        symbol: impl Into<String>,
        bars: Vec<Bar>,
        initial_balance: Decimal,
        start: usize,
    ) -> Self {
        let start = start.min(bars.len());
        Self::with_cursor(symbol, bars, initial_balance, start)
    }

    fn with_cursor(
        symbol: impl Into<String>,
        bars: Vec<Bar>,
        initial_balance: Decimal,
        cursor: usize,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(PaperState {
                bars,
                cursor,
                balance: initial_balance,
                positions: BTreeMap::new(),
                next_ticket: 1,
                order_rejection: None,
                modify_rejection: None,
                account_available: true,
                modify_calls: 0,
            })),
            symbol: symbol.into(),
            spread: 0.20,
            contract_value: dec!(10),
        }
    }

    /// Set the simulated bid/ask spread.
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    /// Account-currency value of a one-unit price move per lot.
    pub fn with_contract_value(mut self, value: Decimal) -> Self {
        self.contract_value = value;
        self
    }

    fn state(&self) -> Result<MutexGuard<'_, PaperState>, BrokerError> {
        self.state
            .lock()
            .map_err(|_| BrokerError::ApiError("paper broker state poisoned".into()))
    }

    /// Reject every following order with `code`.
    pub fn reject_orders(&self, code: u32, message: &str) {
        if let Ok(mut state) = self.state() {
            state.order_rejection = Some((code, message.to_string()));
        }
    }

    /// Reject every following stop modification with `code`.
    pub fn reject_modifications(&self, code: u32, message: &str) {
        if let Ok(mut state) = self.state() {
            state.modify_rejection = Some((code, message.to_string()));
        }
    }

    /// Accept modifications again.
    pub fn accept_modifications(&self) {
        if let Ok(mut state) = self.state() {
            state.modify_rejection = None;
        }
    }

    /// Make `account()` fail, as when the terminal is logged out.
    pub fn set_account_available(&self, available: bool) {
        if let Ok(mut state) = self.state() {
            state.account_available = available;
        }
    }

    /// Place a position directly, bypassing order checks.
    pub fn open_position(
        &self,
        side: Side,
        volume: Decimal,
        price_open: f64,
        stop_loss: f64,
        take_profit: f64,
    ) -> u64 {
        let Ok(mut state) = self.state() else {
            return 0;
        };
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.positions.insert(
            ticket,
            Position {
                ticket,
                symbol: self.symbol.clone(),
                side,
                volume,
                price_open,
                stop_loss,
                take_profit,
            },
        );
        ticket
    }

    /// Number of stop modification requests received.
    pub fn modify_calls(&self) -> usize {
        self.state().map(|s| s.modify_calls).unwrap_or(0)
    }

    /// Snapshot of open positions.
    pub fn open_positions(&self) -> Vec<Position> {
        self.state()
            .map(|s| s.positions.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether the replay has revealed every bar.
    pub fn is_exhausted(&self) -> bool {
        self.state()
            .map(|s| s.cursor >= s.bars.len())
            .unwrap_or(true)
    }

    fn quote_for(&self, state: &PaperState, symbol: &str) -> Result<Quote, BrokerError> {
        if symbol != self.symbol {
            return Err(BrokerError::NoQuote(symbol.to_string()));
        }
        let bar = state
            .last_bar()
            .ok_or_else(|| BrokerError::NoQuote(symbol.to_string()))?;
        let half = self.spread / 2.0;
        Ok(Quote {
            symbol: symbol.to_string(),
            bid: bar.close - half,
            ask: bar.close + half,
            timestamp: bar.timestamp,
        })
    }

    fn floating(&self, state: &PaperState) -> Decimal {
        let Ok(quote) = self.quote_for(state, &self.symbol) else {
            return Decimal::ZERO;
        };
        state
            .positions
            .values()
            .map(|p| profit(p, quote.exit_price(p.side), self.contract_value))
            .sum()
    }
}

fn stops_valid(side: Side, price: f64, stop_loss: f64, take_profit: f64) -> bool {
    match side {
        Side::Buy => stop_loss < price && take_profit > price,
        Side::Sell => stop_loss > price && take_profit < price,
    }
}

#[async_trait]
impl Broker for PaperBroker {
    async fn initialize(&self) -> Result<(), BrokerError> {
        let state = self.state()?;
        info!(symbol = %self.symbol, bars = state.bars.len(), "Paper broker ready");
        Ok(())
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        count: usize,
    ) -> Result<Vec<Bar>, BrokerError> {
        if symbol != self.symbol {
            return Ok(vec![]);
        }
        let mut state = self.state()?;

        let end = state.cursor;
        let start = end.saturating_sub(count);
        let bars = state.bars[start..end].to_vec();

        // Reveal the next bar for the following call.
        if state.cursor < state.bars.len() {
            let next = state.bars[state.cursor];
            state.cursor += 1;
            state.settle(next, self.contract_value);
        }

        Ok(bars)
    }

    async fn quote(&self, symbol: &str) -> Result<Quote, BrokerError> {
        let state = self.state()?;
        self.quote_for(&state, symbol)
    }

    async fn account(&self) -> Result<AccountInfo, BrokerError> {
        let state = self.state()?;
        if !state.account_available {
            return Err(BrokerError::AccountUnavailable);
        }
        Ok(AccountInfo {
            balance: state.balance,
            equity: state.balance + self.floating(&state),
            currency: "USD".to_string(),
        })
    }

    async fn positions(&self, symbol: &str) -> Result<Vec<Position>, BrokerError> {
        let state = self.state()?;
        Ok(state
            .positions
            .values()
            .filter(|p| p.symbol == symbol)
            .cloned()
            .collect())
    }

    async fn submit_order(&self, request: OrderRequest) -> Result<OrderResult, BrokerError> {
        let mut state = self.state()?;

        if let Some((code, message)) = &state.order_rejection {
            return Err(BrokerError::Rejected {
                code: *code,
                message: message.clone(),
            });
        }
        if request.volume <= Decimal::ZERO {
            return Err(BrokerError::Rejected {
                code: RETCODE_INVALID_VOLUME,
                message: "Invalid volume".into(),
            });
        }

        let quote = self.quote_for(&state, &request.symbol)?;
        let price = quote.entry_price(request.side);
        if !stops_valid(request.side, price, request.stop_loss, request.take_profit) {
            return Err(BrokerError::Rejected {
                code: RETCODE_INVALID_STOPS,
                message: "Invalid stops".into(),
            });
        }

        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.positions.insert(
            ticket,
            Position {
                ticket,
                symbol: request.symbol.clone(),
                side: request.side,
                volume: request.volume,
                price_open: price,
                stop_loss: request.stop_loss,
                take_profit: request.take_profit,
            },
        );
        debug!(ticket, side = %request.side, price, volume = %request.volume, "Paper fill");

        Ok(OrderResult {
            ticket,
            retcode: RETCODE_DONE,
            price,
            volume: request.volume,
            comment: "Request executed".to_string(),
        })
    }

    async fn modify_stop_loss(
        &self,
        position: &Position,
        stop_loss: f64,
    ) -> Result<OrderResult, BrokerError> {
        let mut state = self.state()?;
        state.modify_calls += 1;

        if let Some((code, message)) = &state.modify_rejection {
            return Err(BrokerError::Rejected {
                code: *code,
                message: message.clone(),
            });
        }

        let quote = self.quote_for(&state, &position.symbol)?;
        let current = quote.exit_price(position.side);
        let stop_ok = match position.side {
            Side::Buy => stop_loss < current,
            Side::Sell => stop_loss > current,
        };
        if !stop_ok {
            return Err(BrokerError::Rejected {
                code: RETCODE_INVALID_STOPS,
                message: "Invalid stops".into(),
            });
        }

        let stored = state
            .positions
            .get_mut(&position.ticket)
            .ok_or(BrokerError::PositionNotFound(position.ticket))?;
        stored.stop_loss = stop_loss;

        Ok(OrderResult {
            ticket: stored.ticket,
            retcode: RETCODE_DONE,
            price: stored.price_open,
            volume: stored.volume,
            comment: "Request executed".to_string(),
        })
    }

    fn name(&self) -> &str {
        "Paper"
    }
}
