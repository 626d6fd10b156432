//! Validate configuration command.

use anyhow::Result;
use scalper_config::{AppConfig, ConfigError};
use std::path::Path;

pub async fn run(config_path: &Path, loaded: Result<AppConfig, ConfigError>) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Broker: {:?}", config.broker.kind);
    println!("Symbol: {} ({})", config.trading.symbol, config.trading.timeframe);
    println!("Poll interval: {}s", config.trading.poll_interval_secs);
    println!("Risk per trade: {}%", config.risk.risk_percent);
    println!("TP/SL multiplier: {}", config.risk.tp_sl_multiplier);
    println!("Lot bounds: {} - {}", config.risk.min_lot, config.risk.max_lot);
    println!(
        "Alert threshold: {}% (cooldown {}s)",
        config.alerts.threshold, config.alerts.cooldown_secs
    );

    Ok(())
}
