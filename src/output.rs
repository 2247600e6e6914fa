use serde::Serialize;
use std::fmt::Write;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

use crate::error::Result;
use crate::util::format_number;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Markdown table of the first `max_rows` rows, or `(no rows)`.
pub fn table_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)\n".to_string();
    }
    let mut out = Table::new(slice).with(Style::markdown()).to_string();
    out.push('\n');
    out
}

/// Horizontal bar chart. Bars are scaled to the largest value; negative
/// values draw no bar.
pub fn bar_chart(items: &[(String, f64)], width: usize) -> String {
    if items.is_empty() {
        return "(nothing to chart)\n".to_string();
    }
    let label_w = items.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = items.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (label, value) in items {
        let len = if max > 0.0 && *value > 0.0 {
            ((value / max) * width as f64).round().max(1.0) as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:<label_w$} | {} {}",
            label,
            "█".repeat(len),
            format_number(*value, 2),
        );
    }
    out
}

/// Share-of-total breakdown, the text stand-in for a pie chart.
pub fn share_breakdown(items: &[(String, f64)]) -> String {
    let total: f64 = items.iter().map(|(_, v)| v).sum();
    if items.is_empty() || total <= 0.0 {
        return "(nothing to chart)\n".to_string();
    }
    let label_w = items.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (label, value) in items {
        let pct = value / total * 100.0;
        let _ = writeln!(
            out,
            "{:<label_w$} | {:>5.1}% {}",
            label,
            pct,
            "▒".repeat((pct / 5.0).round() as usize),
        );
    }
    out
}
