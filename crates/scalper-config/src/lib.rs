//! Configuration management.

mod settings;

pub use settings::{
    AlertSettings, AppConfig, AppSettings, BrokerKind, BrokerSettings, DashboardSettings,
    JournalSettings, LoggingConfig, TradingSettings,
};

pub use config::ConfigError;

use config::{Config, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables override the file: `SCALPER__TRADING__SYMBOL=XAGUSD`
/// sets `trading.symbol`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("SCALPER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = write_config(
            r#"
[trading]
symbol = "XAUUSD"
timeframe = "M5"

[risk]
risk_percent = 2
tp_sl_multiplier = 2.0

[sweep]
outcome = "barrier"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.trading.timeframe, scalper_core::Timeframe::M5);
        assert_eq!(config.trading.history_bars, 1000);
        assert_eq!(config.risk.risk_percent, rust_decimal_macros::dec!(2));
        assert_eq!(config.risk.max_lot, rust_decimal_macros::dec!(5.0));
        assert_eq!(config.sweep.outcome, scalper_backtest::Outcome::Barrier);
        assert_eq!(config.sweep.warmup, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_override() {
        let file = write_config("[dashboard]\nrefresh_secs = 5\n");
        std::env::set_var("SCALPER__DASHBOARD__TRADES", "9");

        let config = load_config(file.path()).unwrap();
        std::env::remove_var("SCALPER__DASHBOARD__TRADES");

        assert_eq!(config.dashboard.refresh_secs, 5);
        assert_eq!(config.dashboard.trades, 9);
    }

    #[test]
    fn test_missing_file() {
        assert!(load_config(Path::new("/nonexistent/scalper.toml")).is_err());
    }
}
