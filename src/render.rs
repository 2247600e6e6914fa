// Turns derived views into terminal text and export files.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::config::DisplayConfig;
use crate::content::{HOME_TEXT, RECOMMENDATIONS, TITLE};
use crate::dashboard::{CustomerLookup, SpendView, View};
use crate::error::Result;
use crate::navigation::{Dataset, Selections, Tab};
use crate::output::{bar_chart, share_breakdown, table_rows, write_csv, write_json};
use crate::types::{Month, Segment};
use crate::util::{format_int, format_number};

fn month_list(months: &[Month]) -> String {
    if months.is_empty() {
        return "(no months)".to_string();
    }
    months
        .iter()
        .map(|m| m.label())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_view(dataset: Dataset, tab: Tab, view: &View, display: &DisplayConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} | {} | {}", TITLE, dataset, tab);
    let _ = writeln!(out, "{}\n", "-".repeat(60));

    match view {
        View::Home {
            report,
            customers,
            conflicts,
        } => {
            let _ = writeln!(out, "{}\n", HOME_TEXT);
            let _ = writeln!(
                out,
                "{} data: {} rows loaded, {} customers.",
                dataset,
                format_int(report.loaded_rows),
                format_int(*customers)
            );
            if report.skipped_rows > 0 {
                let _ = writeln!(
                    out,
                    "Note: {} rows skipped due to parse errors.",
                    format_int(report.skipped_rows)
                );
            }
            if *conflicts > 0 {
                let _ = writeln!(
                    out,
                    "Note: {} customers appear in more than one segment; their first segment is used.",
                    format_int(*conflicts)
                );
            }
        }
        View::RawData(page) => {
            if page.rows.is_empty() {
                let _ = writeln!(out, "Raw Data (no rows)");
            } else {
                let _ = writeln!(
                    out,
                    "Raw Data (rows {}-{} of {}, page {} of {})\n",
                    format_int(page.offset + 1),
                    format_int(page.offset + page.rows.len()),
                    format_int(page.total),
                    page.page,
                    page.pages
                );
                out.push_str(&table_rows(&page.rows, page.rows.len()));
            }
        }
        View::SegmentDistribution {
            distribution,
            lookup,
            selected,
            members,
            ..
        } => {
            let _ = writeln!(out, "Customer Segment Distribution\n");
            let bars: Vec<(String, f64)> = distribution
                .iter()
                .map(|d| (d.segment.to_string(), d.customers as f64))
                .collect();
            out.push_str(&bar_chart(&bars, display.bar_width));

            let _ = writeln!(out, "\nFind Customer Segment\n");
            match lookup {
                CustomerLookup::Skipped => {
                    let _ = writeln!(out, "(no customer name entered)");
                }
                CustomerLookup::Found(c) => {
                    let _ = writeln!(out, "Customer: {}", c.name);
                    let _ = writeln!(out, "Segment: {}", c.segment);
                    let _ = writeln!(out, "Total Sales: {}", format_number(c.sales_amount, 2));
                    match c.frequency {
                        Some(f) => {
                            let _ = writeln!(out, "Frequency: {}", format_int(f));
                        }
                        None => {
                            let _ = writeln!(out, "Frequency: n/a");
                        }
                    }
                }
                CustomerLookup::NotFound(_) => {
                    let _ = writeln!(out, "Customer not found.");
                }
            }

            let _ = writeln!(out, "\nUnique Customers in Each Segment\n");
            match selected {
                Some(segment) => {
                    let _ = writeln!(out, "Segment: {} ({} customers)\n", segment, members.len());
                    out.push_str(&table_rows(members, members.len()));
                }
                None => {
                    let _ = writeln!(out, "(no segments in this dataset)");
                }
            }
        }
        View::AvgSpend { spend, top } => {
            match spend {
                SpendView::AllMonths(rows) => {
                    let _ = writeln!(out, "Average Spend by Segment Over Q1 & Q2\n");
                    let bars: Vec<(String, f64)> = rows
                        .iter()
                        .map(|r| (r.segment.to_string(), r.average_spend))
                        .collect();
                    out.push_str(&bar_chart(&bars, display.bar_width));
                    out.push('\n');
                    out.push_str(&table_rows(rows, rows.len()));
                }
                SpendView::IndividualMonths { months, rows } => {
                    let _ = writeln!(
                        out,
                        "Average Spend by Segment per Month ({})\n",
                        month_list(months)
                    );
                    let bars: Vec<(String, f64)> = rows
                        .iter()
                        .map(|r| (format!("{} {}", r.segment, r.month), r.average_spend))
                        .collect();
                    out.push_str(&bar_chart(&bars, display.bar_width));
                    out.push('\n');
                    out.push_str(&table_rows(rows, rows.len()));
                }
            }

            let _ = writeln!(
                out,
                "\nTop {} Customers by Segment (pool of {})\n",
                top.per_segment, top.pool_size
            );
            let bars: Vec<(String, f64)> = top
                .rows
                .iter()
                .map(|r| (format!("{} ({})", r.name, r.segment), r.sales_amount))
                .collect();
            out.push_str(&bar_chart(&bars, display.bar_width));
            out.push('\n');
            out.push_str(&table_rows(&top.rows, top.rows.len()));
        }
        View::BrandAnalysis {
            segment,
            category,
            months,
            analysis,
            ..
        } => {
            let category = category.as_deref().unwrap_or("(none)");
            let shown = analysis.brands.len();
            let _ = writeln!(
                out,
                "Top {} Brands by Total Sales Amount for {} Segment and {} Category ({})\n",
                shown,
                segment,
                category,
                month_list(months)
            );
            let spend: Vec<(String, f64)> = analysis
                .brands
                .iter()
                .map(|b| (b.brand.clone(), b.sales_amount))
                .collect();
            out.push_str(&bar_chart(&spend, display.bar_width));

            let _ = writeln!(out, "\nDistribution by Units Sold\n");
            let units: Vec<(String, f64)> = analysis
                .brands
                .iter()
                .map(|b| (b.brand.clone(), b.sold_quantity as f64))
                .collect();
            out.push_str(&share_breakdown(&units));
            out.push('\n');
            out.push_str(&table_rows(&analysis.brands, shown));

            let _ = writeln!(
                out,
                "\nShowing {} of {} brands.",
                shown, analysis.distinct_brands
            );
            let _ = writeln!(
                out,
                "Total Sales Amount for {} in {} Segment and {} Category: {}",
                month_list(months),
                segment,
                category,
                format_number(analysis.total_sales, 2)
            );
            let _ = writeln!(
                out,
                "Total Quantity Sold for {} in {} Segment and {} Category: {}",
                month_list(months),
                segment,
                category,
                format_int(analysis.total_quantity)
            );
        }
        View::Recommendations => {
            let _ = writeln!(out, "{}", RECOMMENDATIONS);
        }
    }
    out
}

#[derive(Debug, Serialize)]
struct ExportSummary<'a> {
    generated_at: DateTime<Utc>,
    dataset: String,
    tab: String,
    files: Vec<String>,
    selections: &'a Selections,
    /// 1-based source row of the first exported raw row.
    #[serde(skip_serializing_if = "Option::is_none")]
    first_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    segment: Option<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_sales: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_quantity: Option<i64>,
}

/// Write a view's tables as CSV files into `dir`, plus `summary.json`
/// recording the selections they were derived from. Raw Data exports the
/// shown page only. Returns every path written.
pub fn export_view(
    dir: &Path,
    dataset: Dataset,
    tab: Tab,
    selections: &Selections,
    view: &View,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let prefix = format!("{}_", dataset.to_string().to_lowercase());
    let mut written: Vec<PathBuf> = Vec::new();

    let mut target = |name: &str| -> PathBuf {
        let path = dir.join(format!("{prefix}{name}.csv"));
        written.push(path.clone());
        path
    };

    let mut summary = ExportSummary {
        generated_at: Utc::now(),
        dataset: dataset.to_string(),
        tab: tab.title().to_string(),
        files: Vec::new(),
        selections,
        first_row: None,
        total_rows: None,
        segment: None,
        category: None,
        total_sales: None,
        total_quantity: None,
    };

    match view {
        View::Home { .. } | View::Recommendations => {}
        View::RawData(page) => {
            write_csv(&target("raw_data"), &page.rows)?;
            summary.first_row = Some(page.offset + 1);
            summary.total_rows = Some(page.total);
        }
        View::SegmentDistribution {
            distribution,
            selected,
            members,
            ..
        } => {
            write_csv(&target("segment_distribution"), distribution)?;
            write_csv(&target("segment_customers"), members)?;
            summary.segment = *selected;
        }
        View::AvgSpend { spend, top } => {
            match spend {
                SpendView::AllMonths(rows) => write_csv(&target("average_spend"), rows)?,
                SpendView::IndividualMonths { rows, .. } => {
                    write_csv(&target("average_spend_monthly"), rows)?
                }
            }
            write_csv(&target("top_customers"), &top.rows)?;
        }
        View::BrandAnalysis {
            segment,
            category,
            analysis,
            ..
        } => {
            write_csv(&target("brand_analysis"), &analysis.brands)?;
            summary.segment = Some(*segment);
            summary.category = category.as_deref();
            summary.total_sales = Some(analysis.total_sales);
            summary.total_quantity = Some(analysis.total_quantity);
        }
    }

    summary.files = written
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    let json_path = dir.join(format!("{prefix}summary.json"));
    write_json(&json_path, &summary)?;
    written.push(json_path);

    tracing::info!(dir = %dir.display(), files = written.len(), "view exported");
    Ok(written)
}
