//! TUI Dashboard using ratatui.

use chrono::{DateTime, Utc};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph},
    Frame, Terminal,
};
use scalper_core::Trade;
use std::fmt::Write as _;
use std::io;
use std::time::Duration;

/// Everything the dashboard shows, read fresh on every refresh.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub symbol: String,
    /// `(buy, sell)` proximity in percent; `None` when no market data
    pub proximity: Option<(f64, f64)>,
    /// Most recent signal-log lines, oldest first
    pub signal_lines: Vec<String>,
    /// Most recent trades, oldest first
    pub trades: Vec<Trade>,
    pub updated: Option<DateTime<Utc>>,
}

impl DashboardSnapshot {
    /// Plain-text rendering for non-interactive terminals.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let updated = self
            .updated
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "{} scalping dashboard ({})", self.symbol, updated);
        let _ = writeln!(out);

        match self.proximity {
            Some((buy, sell)) => {
                let _ = writeln!(out, "Proximity  BUY {:.0} %  |  SELL {:.0} %", buy, sell);
            }
            None => {
                let _ = writeln!(out, "Proximity unavailable: no market data yet.");
            }
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "Last signals:");
        if self.signal_lines.is_empty() {
            let _ = writeln!(out, "  No signals recorded yet.");
        }
        for line in &self.signal_lines {
            let _ = writeln!(out, "  {}", line);
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "Last trades:");
        if self.trades.is_empty() {
            let _ = writeln!(out, "  No trades recorded yet.");
        } else {
            let _ = writeln!(
                out,
                "  {:<19}  {:<4}  {:>9}  {:>9}  {:>9}  {:>6}",
                "time", "side", "entry", "tp", "sl", "volume"
            );
        }
        for trade in &self.trades {
            let _ = writeln!(
                out,
                "  {:<19}  {:<4}  {:>9.2}  {:>9.2}  {:>9.2}  {:>6}",
                trade.time.format("%Y-%m-%d %H:%M:%S"),
                trade.signal.as_str(),
                trade.entry_price,
                trade.take_profit,
                trade.stop_loss,
                trade.volume
            );
        }
        out
    }
}

/// Chart series for the trade panel: one vertical SL-TP segment per trade
/// plus entry, TP and SL markers. X is the trade's position in the list.
#[derive(Debug, Default, PartialEq)]
struct TradeSeries {
    segments: Vec<[(f64, f64); 2]>,
    entries: Vec<(f64, f64)>,
    take_profits: Vec<(f64, f64)>,
    stop_losses: Vec<(f64, f64)>,
    y_bounds: [f64; 2],
}

impl TradeSeries {
    fn from_trades(trades: &[Trade]) -> Self {
        let mut series = TradeSeries::default();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;

        for (i, trade) in trades.iter().enumerate() {
            let x = i as f64;
            series.segments.push([(x, trade.stop_loss), (x, trade.take_profit)]);
            series.entries.push((x, trade.entry_price));
            series.take_profits.push((x, trade.take_profit));
            series.stop_losses.push((x, trade.stop_loss));
            for y in [trade.stop_loss, trade.take_profit, trade.entry_price] {
                lo = lo.min(y);
                hi = hi.max(y);
            }
        }

        if lo.is_finite() && hi.is_finite() {
            let pad = ((hi - lo) * 0.1).max(0.5);
            series.y_bounds = [lo - pad, hi + pad];
        }
        series
    }
}

/// TUI Dashboard.
pub struct Dashboard {
    refresh: Duration,
}

impl Dashboard {
    /// Create a new dashboard.
    pub fn new(refresh: Duration) -> Self {
        Self { refresh }
    }

    /// Run the dashboard until 'q' or Esc.
    pub fn run<F>(&self, mut get_state: F) -> io::Result<()>
    where
        F: FnMut() -> DashboardSnapshot,
    {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal, &mut get_state);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        res
    }

    fn run_loop<F>(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        get_state: &mut F,
    ) -> io::Result<()>
    where
        F: FnMut() -> DashboardSnapshot,
    {
        loop {
            let state = get_state();
            terminal.draw(|f| self.ui(f, &state))?;

            if event::poll(self.refresh)? {
                if let Event::Key(key) = event::read()? {
                    if key.code == KeyCode::Char('q') || key.code == KeyCode::Esc {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn ui(&self, frame: &mut Frame, state: &DashboardSnapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Proximity
                Constraint::Length(8), // Signals
                Constraint::Min(12),   // Trades
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0], state);
        self.render_proximity(frame, chunks[1], state);
        self.render_signals(frame, chunks[2], state);
        self.render_trades(frame, chunks[3], state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &DashboardSnapshot) {
        let updated = state
            .updated
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let header = Paragraph::new(vec![Line::from(vec![
            Span::styled(
                "Scalping Dashboard",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::styled(&state.symbol, Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | updated {} | Press 'q' to quit", updated)),
        ])])
        .block(Block::default().borders(Borders::ALL).title("System"));
        frame.render_widget(header, area);
    }

    fn render_proximity(&self, frame: &mut Frame, area: Rect, state: &DashboardSnapshot) {
        let Some((buy, sell)) = state.proximity else {
            let msg = Paragraph::new("Cannot compute signal proximity: market data unavailable.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title("Proximity"));
            frame.render_widget(msg, area);
            return;
        };

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        for (rect, (label, value, color)) in halves.iter().zip([
            ("BUY proximity", buy, Color::Green),
            ("SELL proximity", sell, Color::Red),
        ]) {
            let gauge = Gauge::default()
                .block(Block::default().borders(Borders::ALL).title(label))
                .gauge_style(Style::default().fg(color))
                .ratio((value / 100.0).clamp(0.0, 1.0))
                .label(format!("{:.0} %", value));
            frame.render_widget(gauge, *rect);
        }
    }

    fn render_signals(&self, frame: &mut Frame, area: Rect, state: &DashboardSnapshot) {
        let lines: Vec<Line> = if state.signal_lines.is_empty() {
            vec![Line::from("No signals recorded yet.")]
        } else {
            state
                .signal_lines
                .iter()
                .map(|l| {
                    let color = if l.contains("Signal: buy") {
                        Color::Green
                    } else if l.contains("Signal: sell") {
                        Color::Red
                    } else {
                        Color::Gray
                    };
                    Line::from(Span::styled(l.as_str(), Style::default().fg(color)))
                })
                .collect()
        };

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Last signals"));
        frame.render_widget(paragraph, area);
    }

    fn render_trades(&self, frame: &mut Frame, area: Rect, state: &DashboardSnapshot) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Last {} trades with TP/SL", state.trades.len()));

        if state.trades.is_empty() {
            frame.render_widget(Paragraph::new("No trades recorded yet.").block(block), area);
            return;
        }

        let series = TradeSeries::from_trades(&state.trades);

        let mut datasets: Vec<Dataset> = series
            .segments
            .iter()
            .map(|segment| {
                Dataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(Color::DarkGray))
                    .data(segment)
            })
            .collect();
        datasets.push(
            Dataset::default()
                .name("Entry")
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Blue))
                .data(&series.entries),
        );
        datasets.push(
            Dataset::default()
                .name("Take profit")
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Green))
                .data(&series.take_profits),
        );
        datasets.push(
            Dataset::default()
                .name("Stop loss")
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Red))
                .data(&series.stop_losses),
        );

        let x_labels: Vec<String> = [state.trades.first(), state.trades.last()]
            .into_iter()
            .flatten()
            .map(|t| t.time.format("%H:%M:%S").to_string())
            .collect();
        let [lo, hi] = series.y_bounds;

        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .title("Time")
                    .style(Style::default().fg(Color::Gray))
                    .bounds([-0.5, state.trades.len() as f64 - 0.5])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title("Price")
                    .style(Style::default().fg(Color::Gray))
                    .bounds([lo, hi])
                    .labels(vec![format!("{:.2}", lo), format!("{:.2}", hi)]),
            );
        frame.render_widget(chart, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use scalper_core::Side;

    fn trade(minute: u32, entry: f64) -> Trade {
        Trade {
            time: Utc.with_ymd_and_hms(2024, 5, 2, 10, minute, 0).unwrap(),
            signal: Side::Buy,
            entry_price: entry,
            take_profit: entry + 6.0,
            stop_loss: entry - 6.0,
            volume: dec!(0.2),
        }
    }

    #[test]
    fn test_trade_series() {
        let series = TradeSeries::from_trades(&[trade(0, 2300.0), trade(5, 2310.0)]);

        assert_eq!(series.segments.len(), 2);
        assert_eq!(series.segments[1], [(1.0, 2304.0), (1.0, 2316.0)]);
        assert_eq!(series.entries, vec![(0.0, 2300.0), (1.0, 2310.0)]);
        assert!(series.y_bounds[0] < 2294.0 && series.y_bounds[1] > 2316.0);
    }

    #[test]
    fn test_render_text_empty() {
        let snapshot = DashboardSnapshot {
            symbol: "XAUUSD".into(),
            ..Default::default()
        };
        let text = snapshot.render_text();
        assert!(text.contains("Proximity unavailable"));
        assert!(text.contains("No signals recorded yet."));
        assert!(text.contains("No trades recorded yet."));
    }

    #[test]
    fn test_render_text_full() {
        let snapshot = DashboardSnapshot {
            symbol: "XAUUSD".into(),
            proximity: Some((72.4, 5.0)),
            signal_lines: vec!["2024-05-02 10:00:00.000000 - Signal: none | Price: 2300.00".into()],
            trades: vec![trade(0, 2300.0)],
            updated: None,
        };
        let text = snapshot.render_text();
        assert!(text.contains("BUY 72 %"));
        assert!(text.contains("Signal: none"));
        assert!(text.contains("2294.00"));
    }
}
