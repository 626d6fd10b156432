//! HTTP bridge to the trading terminal.
//!
//! The terminal itself runs elsewhere; a small bridge process exposes it as
//! JSON over HTTP:
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET  | `/health` | terminal connected? |
//! | GET  | `/bars?symbol=&timeframe=&count=` | recent bars |
//! | GET  | `/tick/{symbol}` | bid/ask |
//! | GET  | `/account` | balance/equity |
//! | GET  | `/positions?symbol=` | open positions |
//! | POST | `/orders` | market order |
//! | POST | `/positions/{ticket}/sl` | move stop-loss |

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use rust_decimal::Decimal;
use scalper_core::error::BrokerError;
use scalper_core::traits::Broker;
use scalper_core::types::{
    AccountInfo, Bar, OrderRequest, OrderResult, Position, Quote, Side, Timeframe, RETCODE_DONE,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Bridge connection settings.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl BridgeConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

#[derive(Debug, Deserialize)]
struct BridgeHealth {
    connected: bool,
    #[serde(default)]
    terminal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BridgeBar {
    /// Unix seconds
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    tick_volume: f64,
}

#[derive(Debug, Deserialize)]
struct BridgeBarsResponse {
    bars: Vec<BridgeBar>,
}

#[derive(Debug, Deserialize)]
struct BridgeTick {
    bid: f64,
    ask: f64,
    /// Unix seconds
    time: i64,
}

#[derive(Debug, Deserialize)]
struct BridgeAccount {
    balance: Decimal,
    equity: Decimal,
    #[serde(default)]
    currency: String,
}

#[derive(Debug, Deserialize)]
struct BridgePosition {
    ticket: u64,
    symbol: String,
    #[serde(rename = "type")]
    side: Side,
    volume: Decimal,
    price_open: f64,
    #[serde(default)]
    sl: f64,
    #[serde(default)]
    tp: f64,
}

#[derive(Debug, Deserialize)]
struct BridgePositionsResponse {
    positions: Vec<BridgePosition>,
}

#[derive(Debug, Serialize)]
struct StopLossRequest<'a> {
    symbol: &'a str,
    sl: f64,
    tp: f64,
}

#[derive(Debug, Deserialize)]
struct BridgeTradeResult {
    retcode: u32,
    #[serde(default, alias = "order", alias = "deal")]
    ticket: u64,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    volume: Decimal,
    #[serde(default)]
    comment: String,
}

impl From<BridgeTradeResult> for OrderResult {
    fn from(r: BridgeTradeResult) -> Self {
        OrderResult {
            ticket: r.ticket,
            retcode: r.retcode,
            price: r.price,
            volume: r.volume,
            comment: r.comment,
        }
    }
}

/// Broker backed by the terminal bridge.
pub struct BridgeBroker {
    config: BridgeConfig,
    client: Client,
}

impl BridgeBroker {
    /// Create a new bridge client.
    pub fn new(config: BridgeConfig) -> Result<Self, BrokerError> {
        let mut headers = header::HeaderMap::new();
        if let Some(key) = &config.api_key {
            headers.insert(
                "X-API-Key",
                header::HeaderValue::from_str(key)
                    .map_err(|e| BrokerError::Configuration(e.to_string()))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn check(resp: Response) -> Result<Response, BrokerError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        Err(BrokerError::ApiError(format!("{}: {}", status, text)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BrokerError> {
        let resp = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| BrokerError::NetworkError(e.to_string()))?;

        Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| BrokerError::ApiError(e.to_string()))
    }

    /// POST a trade request; a non-done retcode becomes [`BrokerError::Rejected`].
    async fn post_trade<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<OrderResult, BrokerError> {
        let resp = self
            .client
            .post(self.url(path))
            .header("X-Request-Id", Uuid::new_v4().to_string())
            .json(body)
            .send()
            .await
            .map_err(|e| BrokerError::NetworkError(e.to_string()))?;

        let result: BridgeTradeResult = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| BrokerError::ApiError(e.to_string()))?;

        if result.retcode != RETCODE_DONE {
            return Err(BrokerError::Rejected {
                code: result.retcode,
                message: result.comment,
            });
        }
        Ok(result.into())
    }
}

#[async_trait]
impl Broker for BridgeBroker {
    async fn initialize(&self) -> Result<(), BrokerError> {
        let health: BridgeHealth = self
            .get_json("/health", &[])
            .await
            .map_err(|e| BrokerError::Initialization(e.to_string()))?;

        if !health.connected {
            return Err(BrokerError::Initialization(
                "terminal reports disconnected".into(),
            ));
        }
        info!(
            url = %self.config.base_url,
            terminal = health.terminal.as_deref().unwrap_or("unknown"),
            "Connected to terminal bridge"
        );
        Ok(())
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<Vec<Bar>, BrokerError> {
        let data: BridgeBarsResponse = self
            .get_json(
                "/bars",
                &[
                    ("symbol", symbol.to_string()),
                    ("timeframe", timeframe.to_string()),
                    ("count", count.to_string()),
                ],
            )
            .await?;

        let mut bars: Vec<Bar> = data
            .bars
            .into_iter()
            .map(|b| Bar::new(b.time * 1000, b.open, b.high, b.low, b.close, b.tick_volume))
            .collect();
        bars.sort_by_key(|b| b.timestamp);
        debug!(symbol, count = bars.len(), "Fetched bars");
        Ok(bars)
    }

    async fn quote(&self, symbol: &str) -> Result<Quote, BrokerError> {
        let tick: BridgeTick = self
            .get_json(&format!("/tick/{}", symbol), &[])
            .await
            .map_err(|e| {
                warn!(symbol, error = %e, "Tick unavailable");
                BrokerError::NoQuote(symbol.to_string())
            })?;

        Ok(Quote {
            symbol: symbol.to_string(),
            bid: tick.bid,
            ask: tick.ask,
            timestamp: tick.time * 1000,
        })
    }

    async fn account(&self) -> Result<AccountInfo, BrokerError> {
        let account: BridgeAccount = self.get_json("/account", &[]).await.map_err(|e| {
            debug!(error = %e, "Account request failed");
            BrokerError::AccountUnavailable
        })?;

        Ok(AccountInfo {
            balance: account.balance,
            equity: account.equity,
            currency: account.currency,
        })
    }

    async fn positions(&self, symbol: &str) -> Result<Vec<Position>, BrokerError> {
        let data: BridgePositionsResponse = self
            .get_json("/positions", &[("symbol", symbol.to_string())])
            .await?;

        Ok(data
            .positions
            .into_iter()
            .filter(|p| p.symbol == symbol)
            .map(|p| Position {
                ticket: p.ticket,
                symbol: p.symbol,
                side: p.side,
                volume: p.volume,
                price_open: p.price_open,
                stop_loss: p.sl,
                take_profit: p.tp,
            })
            .collect())
    }

    async fn submit_order(&self, request: OrderRequest) -> Result<OrderResult, BrokerError> {
        debug!(?request, "Submitting order");
        let result = self.post_trade("/orders", &request).await?;
        info!(
            ticket = result.ticket,
            side = %request.side,
            volume = %request.volume,
            price = result.price,
            "Order filled"
        );
        Ok(result)
    }

    async fn modify_stop_loss(
        &self,
        position: &Position,
        stop_loss: f64,
    ) -> Result<OrderResult, BrokerError> {
        let body = StopLossRequest {
            symbol: &position.symbol,
            sl: stop_loss,
            tp: position.take_profit,
        };
        self.post_trade(&format!("/positions/{}/sl", position.ticket), &body)
            .await
    }

    fn name(&self) -> &str {
        "Bridge"
    }
}
