//! Display and history rendering.

use std::fmt;

use chrono::{DateTime, Local, TimeZone};

use crate::calculator::{CalculatorState, HistoryEntry};

/// One-line summary of the modes: `scientific DEG`, plus `SHIFT` when held.
pub fn render_status(state: &CalculatorState) -> String {
    let angle = if state.is_degree_mode { "DEG" } else { "RAD" };
    let mut status = format!("{} {}", state.mode, angle);
    if state.is_shift_active {
        status.push_str(" SHIFT");
    }
    status
}

/// Render the calculator display.
///
/// The pending expression sits above the main line, which shows the error
/// text in place of the display value when one is set.
pub fn render_display(state: &CalculatorState) -> String {
    let main = match &state.error {
        Some(error) => format!("! {}", error),
        None => state.display.clone(),
    };
    format!("{}\n{}", state.expression, main)
}

/// Render up to `limit` history entries, newest first, each stamped with
/// its local wall-clock time.
pub fn render_history(history: &[HistoryEntry], limit: usize) -> String {
    render_history_in(history, limit, &Local)
}

fn render_history_in<Tz: TimeZone>(history: &[HistoryEntry], limit: usize, zone: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    if history.is_empty() {
        return "History is empty".to_string();
    }

    let mut out = String::from("History");
    for entry in history.iter().take(limit) {
        out.push_str(&format!(
            "\n  {}  {} = {}",
            clock_time(entry.timestamp, zone),
            entry.expression,
            entry.result
        ));
    }
    if history.len() > limit {
        out.push_str(&format!("\n  ... {} more", history.len() - limit));
    }
    out
}

/// `HH:MM:SS` for a millisecond Unix timestamp.
fn clock_time<Tz: TimeZone>(timestamp: i64, zone: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    DateTime::from_timestamp_millis(timestamp)
        .map(|utc| utc.with_timezone(zone).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}
