//! Fixed-interval driver for the trader.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

use crate::Trader;

/// Runs [`Trader::run_cycle`] back to back with a fixed pause in between.
pub struct Scheduler {
    trader: Trader,
    interval: Duration,
    max_cycles: Option<usize>,
}

impl Scheduler {
    pub fn new(trader: Trader, interval: Duration) -> Self {
        Self {
            trader,
            interval,
            max_cycles: None,
        }
    }

    /// Stop on its own after `cycles` cycles.
    pub fn with_max_cycles(mut self, cycles: usize) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// Cycle until `shutdown` resolves or the cycle limit is reached.
    ///
    /// Shutdown is only observed between cycles, never in the middle of one.
    ///
    /// # Returns
    /// Number of cycles run.
    pub async fn run_until<F>(&mut self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycles = 0;

        loop {
            let report = self.trader.run_cycle().await;
            cycles += 1;
            info!(
                cycle = cycles,
                skipped = report.skipped,
                signal = ?report.signal.and_then(|s| s.direction),
                traded = report.trade.is_some(),
                "Cycle complete"
            );

            if self.max_cycles.is_some_and(|max| cycles >= max) {
                break;
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = sleep(self.interval) => {}
            }
        }

        cycles
    }
}
