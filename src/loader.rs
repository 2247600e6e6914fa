use crate::error::{DashboardError, Result};
use crate::types::{Month, RawRow, Segment, Transaction};
use crate::util::{parse_f64_safe, parse_i64_safe, parse_text};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 3] = ["Name", "Segment", "Month"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
}

pub fn load_dataset(path: &Path) -> Result<(Vec<Transaction>, LoadReport)> {
    let file = File::open(path).map_err(|source| DashboardError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let (rows, report) = load_from_reader(file)?;
    tracing::info!(
        path = %path.display(),
        loaded = report.loaded_rows,
        skipped = report.skipped_rows,
        "dataset loaded"
    );
    Ok((rows, report))
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<(Vec<Transaction>, LoadReport)> {
    // Header names are trimmed for both the column check and field mapping.
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(DashboardError::MissingColumn(col));
        }
    }

    let mut report = LoadReport::default();
    let mut rows = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        // Header is line 1.
        let line = report.total_rows + 1;
        let raw = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping unreadable row");
                report.skipped_rows += 1;
                continue;
            }
        };

        let Some(name) = parse_text(raw.name) else {
            tracing::warn!(line, "skipping row without a customer name");
            report.skipped_rows += 1;
            continue;
        };
        let Some(segment) = raw.segment.as_deref().and_then(Segment::parse) else {
            tracing::warn!(line, segment = ?raw.segment, "skipping row with unknown segment");
            report.skipped_rows += 1;
            continue;
        };
        let Some(month) = raw.month.as_deref().and_then(Month::parse) else {
            tracing::warn!(line, month = ?raw.month, "skipping row with unknown month");
            report.skipped_rows += 1;
            continue;
        };

        rows.push(Transaction {
            name,
            segment,
            sales_amount: parse_f64_safe(raw.sales_amount.as_deref()),
            sold_quantity: parse_i64_safe(raw.sold_quantity.as_deref()),
            item_category: parse_text(raw.item_category),
            item_brand: parse_text(raw.item_brand),
            month,
            frequency: parse_i64_safe(raw.frequency.as_deref()),
        });
    }

    report.loaded_rows = rows.len();
    Ok((rows, report))
}
