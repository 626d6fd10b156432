//! Builds brokers and notifiers from configuration.

use anyhow::{Context, Result};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use scalper_broker::{BridgeBroker, BridgeConfig, PaperBroker};
use scalper_config::{AppConfig, BrokerKind};
use scalper_core::{Bar, Broker};
use scalper_data::load_csv;
use scalper_monitor::{LogNotifier, Notifier, TelegramNotifier};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How a paper broker presents its history.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PaperMode {
    /// Reveal one bar per fetch, for the trading loop
    Replay,
    /// Every bar visible at once; a missing history is tolerated
    Static,
}

/// Broker selected by the config file, or the paper broker when forced.
pub fn broker(
    config: &AppConfig,
    force_paper: bool,
    data: Option<&Path>,
    mode: PaperMode,
) -> Result<Arc<dyn Broker>> {
    if force_paper || config.broker.kind == BrokerKind::Paper {
        return paper_broker(config, data, mode);
    }

    let api_key = std::env::var(&config.broker.api_key_env).ok();
    if api_key.is_none() {
        warn!(var = %config.broker.api_key_env, "Bridge API key not set");
    }
    let bridge = BridgeConfig {
        timeout: Duration::from_secs(config.broker.timeout_secs),
        ..BridgeConfig::new(&config.broker.base_url)
    }
    .with_api_key(api_key);

    info!(url = %bridge.base_url, "Using terminal bridge");
    Ok(Arc::new(BridgeBroker::new(bridge)?))
}

fn paper_broker(
    config: &AppConfig,
    data: Option<&Path>,
    mode: PaperMode,
) -> Result<Arc<dyn Broker>> {
    let history: Option<PathBuf> = data
        .map(Path::to_path_buf)
        .or_else(|| config.broker.history_file.as_ref().map(PathBuf::from));

    let bars: Vec<Bar> = match (&history, mode) {
        (Some(path), _) => load_csv(path)
            .with_context(|| format!("Failed to load bar history from {}", path.display()))?,
        (None, PaperMode::Static) => vec![],
        (None, PaperMode::Replay) => anyhow::bail!(
            "The paper broker needs a bar history: pass --data or set broker.history_file"
        ),
    };

    let equity = Decimal::from_f64(config.broker.initial_equity)
        .context("broker.initial_equity is not a valid amount")?;
    let symbol = config.trading.symbol.clone();

    info!(bars = bars.len(), %equity, "Using paper broker");
    let broker = match mode {
        PaperMode::Replay => {
            let start = config.trading.history_bars.min(bars.len());
            PaperBroker::replay(symbol, bars, equity, start)
        }
        PaperMode::Static => PaperBroker::new(symbol, bars, equity),
    };
    Ok(Arc::new(
        broker
            .with_spread(config.broker.spread)
            .with_contract_value(config.risk.pip_value),
    ))
}

/// Telegram when both credentials are in the environment, the log otherwise.
pub fn notifier(config: &AppConfig) -> Result<Arc<dyn Notifier>> {
    let token = std::env::var(&config.alerts.bot_token_env).ok();
    let chat_id = std::env::var(&config.alerts.chat_id_env).ok();

    match (token, chat_id) {
        (Some(token), Some(chat_id)) => Ok(Arc::new(TelegramNotifier::new(
            &config.alerts.telegram_api_url,
            token,
            chat_id,
        )?)),
        _ => {
            info!("Telegram credentials not set, alerts go to the log");
            Ok(Arc::new(LogNotifier))
        }
    }
}
