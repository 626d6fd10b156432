//! Trade log: CSV with columns `time,signal,entry_price,tp,sl,volume`.

use csv::{ReaderBuilder, WriterBuilder};
use scalper_core::error::JournalError;
use scalper_core::Trade;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// CSV file of placed trades, newest last.
#[derive(Debug, Clone)]
pub struct TradeLog {
    path: PathBuf,
}

impl TradeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> JournalError {
        JournalError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn csv_error(&self, e: csv::Error) -> JournalError {
        JournalError::Csv {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }

    /// Append `trade`. The header is written when the file is new or empty.
    pub fn append(&self, trade: &Trade) -> Result<(), JournalError> {
        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(self.io_error(e)),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(trade).map_err(|e| self.csv_error(e))?;
        writer.flush().map_err(|e| self.io_error(e))
    }

    /// Every readable trade. A missing file reads as empty; rows that fail to
    /// parse (e.g. a half-written last line) are skipped.
    pub fn read_all(&self) -> Result<Vec<Trade>, JournalError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut trades = Vec::new();
        for (row, result) in reader.deserialize::<Trade>().enumerate() {
            match result {
                Ok(trade) => trades.push(trade),
                Err(e) => warn!(row, error = %e, "Skipping trade log row"),
            }
        }
        Ok(trades)
    }

    /// Last `n` trades.
    pub fn tail(&self, n: usize) -> Result<Vec<Trade>, JournalError> {
        let mut trades = self.read_all()?;
        let start = trades.len().saturating_sub(n);
        Ok(trades.split_off(start))
    }
}
