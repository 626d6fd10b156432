//! Logging, proximity alerts and the TUI dashboard.

mod alerts;
mod dashboard;
mod logging;
mod notifier;

pub use alerts::{evaluate, Alert, AlertPolicy, AlertState};
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use logging::{setup_logging, LogGuard};
pub use notifier::{notify, LogNotifier, Notifier, TelegramNotifier, TELEGRAM_API_URL};
