//! Append-only signal log.
//!
//! One line per evaluation, including evaluations with no direction:
//! `2024-05-02 14:30:05.000000 - Signal: buy | Price: 2315.46`

use scalper_core::error::JournalError;
use scalper_core::Signal;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Text file of signal evaluations, newest last.
#[derive(Debug, Clone)]
pub struct SignalLog {
    path: PathBuf,
}

impl SignalLog {
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

    /// Append one line for `signal`, creating the file if needed.
    pub fn append(&self, signal: &Signal) -> Result<(), JournalError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        writeln!(file, "{}", signal).map_err(|e| self.io_error(e))
    }

    /// Last `n` raw lines. A missing file reads as empty.
    pub fn tail(&self, n: usize) -> Result<Vec<String>, JournalError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(self.io_error(e)),
        };

        let lines: Vec<String> = BufReader::new(file)
            .lines()
            .collect::<Result<_, _>>()
            .map_err(|e| self.io_error(e))?;

        let lines: Vec<String> = lines.into_iter().filter(|l| !l.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use scalper_core::Side;

    #[test]
    fn test_append_and_tail() {
        let dir = tempfile::tempdir().unwrap();
        let log = SignalLog::new(dir.path().join("signal_log_XAUUSD.txt"));

        for i in 0..8 {
            let ts = Utc.with_ymd_and_hms(2024, 5, 2, 9, i, 0).unwrap();
            let direction = if i % 2 == 0 { Some(Side::Buy) } else { None };
            log.append(&Signal::new(ts, direction, 2300.0 + i as f64)).unwrap();
        }

        let lines = log.tail(6).unwrap();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "2024-05-02 09:02:00.000000 - Signal: buy | Price: 2302.00");
        assert_eq!(lines[5], "2024-05-02 09:07:00.000000 - Signal: none | Price: 2307.00");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = SignalLog::new(dir.path().join("absent.txt"));
        assert!(log.tail(6).unwrap().is_empty());
    }
}
