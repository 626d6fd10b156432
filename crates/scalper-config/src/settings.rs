//! Configuration structures.

use scalper_backtest::SweepConfig;
use scalper_core::{ScalperError, ScalperResult, Timeframe};
use scalper_indicators::IndicatorSettings;
use scalper_risk::RiskParams;
use scalper_strategy::SignalRules;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub broker: BrokerSettings,
    #[serde(default)]
    pub trading: TradingSettings,
    #[serde(default)]
    pub indicators: IndicatorSettings,
    #[serde(default)]
    pub signals: SignalRules,
    #[serde(default)]
    pub risk: RiskParams,
    #[serde(default)]
    pub alerts: AlertSettings,
    #[serde(default)]
    pub journal: JournalSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl AppConfig {
    /// Sanity-check values that deserialize fine but cannot run.
    pub fn validate(&self) -> ScalperResult<()> {
        self.trading.validate()?;
        self.indicators.validate()?;
        self.signals.validate()?;
        self.risk.validate()?;
        self.alerts.validate()?;
        self.broker.validate()?;

        if self.dashboard.refresh_secs == 0 {
            return Err(ScalperError::Config(
                "dashboard.refresh_secs must be positive".into(),
            ));
        }
        if self.sweep.multipliers().is_empty() {
            return Err(ScalperError::Config(
                "sweep range is empty (check start, end and step)".into(),
            ));
        }
        if self.sweep.horizon == 0 {
            return Err(ScalperError::Config("sweep.horizon must be positive".into()));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ScalperError::Config(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "xau-scalper".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Daily-rolling log file, in addition to stdout
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Which broker implementation to connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokerKind {
    /// In-memory simulation over a bar history
    #[default]
    Paper,
    /// HTTP bridge to the trading terminal
    Bridge,
}

/// Broker connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerSettings {
    pub kind: BrokerKind,
    /// Bridge base URL
    pub base_url: String,
    /// Environment variable holding the bridge API key
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Bar history replayed by the paper broker
    pub history_file: Option<String>,
    pub initial_equity: f64,
    /// Paper broker bid/ask spread
    pub spread: f64,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            kind: BrokerKind::Paper,
            base_url: "http://127.0.0.1:8765".to_string(),
            api_key_env: "SCALPER_BRIDGE_KEY".to_string(),
            timeout_secs: 10,
            history_file: None,
            initial_equity: 10_000.0,
            spread: 0.20,
        }
    }
}

impl BrokerSettings {
    fn validate(&self) -> ScalperResult<()> {
        if self.kind == BrokerKind::Bridge && self.base_url.trim().is_empty() {
            return Err(ScalperError::Config(
                "broker.base_url is required for the bridge broker".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ScalperError::Config("broker.timeout_secs must be positive".into()));
        }
        if self.initial_equity <= 0.0 {
            return Err(ScalperError::Config(
                "broker.initial_equity must be positive".into(),
            ));
        }
        if self.spread < 0.0 {
            return Err(ScalperError::Config("broker.spread cannot be negative".into()));
        }
        Ok(())
    }
}

/// What and how often to trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingSettings {
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Bars fetched per cycle
    pub history_bars: usize,
    pub poll_interval_secs: u64,
}

impl Default for TradingSettings {
    fn default() -> Self {
        Self {
            symbol: "XAUUSD".to_string(),
            timeframe: Timeframe::M1,
            history_bars: 1000,
            poll_interval_secs: 15,
        }
    }
}

impl TradingSettings {
    fn validate(&self) -> ScalperResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(ScalperError::Config("trading.symbol is empty".into()));
        }
        if self.history_bars == 0 {
            return Err(ScalperError::Config(
                "trading.history_bars must be positive".into(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(ScalperError::Config(
                "trading.poll_interval_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Proximity alert settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Proximity (percent) that must be exceeded
    pub threshold: f64,
    pub cooldown_secs: u64,
    pub telegram_api_url: String,
    /// Environment variable holding the bot token
    pub bot_token_env: String,
    /// Environment variable holding the chat id
    pub chat_id_env: String,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            threshold: 90.0,
            cooldown_secs: 60,
            telegram_api_url: "https://api.telegram.org".to_string(),
            bot_token_env: "TELEGRAM_BOT_TOKEN".to_string(),
            chat_id_env: "TELEGRAM_CHAT_ID".to_string(),
        }
    }
}

impl AlertSettings {
    fn validate(&self) -> ScalperResult<()> {
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(ScalperError::Config(
                "alerts.threshold must be between 0 and 100".into(),
            ));
        }
        Ok(())
    }
}

/// Journal file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalSettings {
    pub signal_log: String,
    pub trade_log: String,
    /// Where `optimize --save` writes by default
    pub sweep_results: String,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            signal_log: "signal_log_XAUUSD.txt".to_string(),
            trade_log: "trade_history_XAUUSD.csv".to_string(),
            sweep_results: "optimization_results.csv".to_string(),
        }
    }
}

/// Dashboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub refresh_secs: u64,
    pub signal_lines: usize,
    pub trades: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_secs: 10,
            signal_lines: 6,
            trades: 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trading.poll_interval_secs, 15);
        assert_eq!(config.dashboard.signal_lines, 6);
        assert_eq!(config.journal.trade_log, "trade_history_XAUUSD.csv");
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = AppConfig::default();
        config.trading.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_lot_bounds() {
        let mut config = AppConfig::default();
        config.risk.min_lot = rust_decimal_macros::dec!(2);
        config.risk.max_lot = rust_decimal_macros::dec!(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unusable_indicator_periods() {
        let mut config = AppConfig::default();
        config.indicators.macd_fast = 26;
        config.indicators.macd_slow = 12;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.indicators.rsi_period = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".into();
        assert!(config.validate().is_err());
    }
}
