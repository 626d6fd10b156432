//! Error types for the scalping bot.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum ScalperError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broker connector errors.
///
/// Everything except [`BrokerError::Initialization`] is treated as a soft
/// failure by the trading loop.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Terminal initialization failed: {0}")]
    Initialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request rejected (retcode {code}): {message}")]
    Rejected { code: u32, message: String },

    #[error("Account information unavailable")]
    AccountUnavailable,

    #[error("No quote available for {0}")]
    NoQuote(String),

    #[error("Position not found: {0}")]
    PositionNotFound(u64),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

impl BrokerError {
    /// Broker return code, when the terminal supplied one.
    pub fn retcode(&self) -> Option<u32> {
        match self {
            BrokerError::Rejected { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Market data errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("No data available")]
    NoDataAvailable,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Signal log and trade log errors.
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {message}")]
    Csv { path: String, message: String },
}

/// Alert delivery errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Alert channel returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Result type alias.
pub type ScalperResult<T> = Result<T, ScalperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retcode_only_for_rejections() {
        let rejected = BrokerError::Rejected {
            code: 10016,
            message: "Invalid stops".to_string(),
        };
        assert_eq!(rejected.retcode(), Some(10016));
        assert_eq!(BrokerError::AccountUnavailable.retcode(), None);
    }

    #[test]
    fn test_broker_error_converts_to_top_level() {
        let err: ScalperError = BrokerError::Connection("terminal offline".into()).into();
        assert!(err.to_string().contains("terminal offline"));
    }
}
