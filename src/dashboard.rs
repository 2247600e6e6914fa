use once_cell::unsync::OnceCell;
use std::path::Path;

use crate::brands::{brand_analysis, item_categories, BrandFilter};
use crate::config::DataConfig;
use crate::error::Result;
use crate::loader::{load_dataset, LoadReport};
use crate::navigation::{Dataset, Selections, SpendMode, Tab};
use crate::segments::{customers_in_segment, find_customer, segment_distribution, segments_present};
use crate::spend::{average_spend, monthly_average_spend, top_customers};
use crate::summary::{segment_conflicts, summarize_customers};
use crate::types::{
    BrandAnalysis, CustomerSummary, Month, MonthlySpend, Segment, SegmentCount, SegmentMember,
    SegmentSpend, TopCustomers, Transaction,
};

/// One source table plus what is derived from it once per session.
pub struct LoadedDataset {
    pub rows: Vec<Transaction>,
    pub report: LoadReport,
    pub conflicts: usize,
    summary: OnceCell<Vec<CustomerSummary>>,
}

impl LoadedDataset {
    pub fn new(rows: Vec<Transaction>, report: LoadReport) -> Self {
        let conflicts = segment_conflicts(&rows);
        for c in &conflicts {
            tracing::warn!(
                customer = %c.name,
                kept = %c.kept,
                others = ?c.others,
                "customer has rows in several segments; keeping the first"
            );
        }
        Self {
            rows,
            report,
            conflicts: conflicts.len(),
            summary: OnceCell::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let (rows, report) = load_dataset(path)?;
        Ok(Self::new(rows, report))
    }

    /// Per-customer summary, computed on first use.
    pub fn summary(&self) -> &[CustomerSummary] {
        self.summary.get_or_init(|| summarize_customers(&self.rows))
    }
}

pub struct Dashboard {
    retail: LoadedDataset,
    wholesale: LoadedDataset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerLookup {
    /// No query was entered.
    Skipped,
    Found(CustomerSummary),
    NotFound(String),
}

/// One page of the raw table.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    pub total: usize,
    /// 1-based, clamped to `1..=pages`.
    pub page: usize,
    pub pages: usize,
    /// 0-based index of `rows[0]` in the source table.
    pub offset: usize,
    pub rows: Vec<Transaction>,
}

/// Slice out page `page` (1-based) of `page_size` rows. Out-of-range
/// pages land on the nearest valid one; an empty table has one empty page.
pub fn raw_page(rows: &[Transaction], page: usize, page_size: usize) -> RawPage {
    let page_size = page_size.max(1);
    let pages = rows.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, pages);
    let offset = (page - 1) * page_size;
    RawPage {
        total: rows.len(),
        page,
        pages,
        offset,
        rows: rows.iter().skip(offset).take(page_size).cloned().collect(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpendView {
    AllMonths(Vec<SegmentSpend>),
    IndividualMonths {
        months: Vec<Month>,
        rows: Vec<MonthlySpend>,
    },
}

/// Everything a tab shows, derived from the source table and the
/// current selections.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Home {
        report: LoadReport,
        customers: usize,
        conflicts: usize,
    },
    RawData(RawPage),
    SegmentDistribution {
        distribution: Vec<SegmentCount>,
        lookup: CustomerLookup,
        segments: Vec<Segment>,
        selected: Option<Segment>,
        members: Vec<SegmentMember>,
    },
    AvgSpend {
        spend: SpendView,
        top: TopCustomers,
    },
    BrandAnalysis {
        segment: Segment,
        category: Option<String>,
        categories: Vec<String>,
        months: Vec<Month>,
        analysis: BrandAnalysis,
    },
    Recommendations,
}

impl Dashboard {
    pub fn new(retail: LoadedDataset, wholesale: LoadedDataset) -> Self {
        Self { retail, wholesale }
    }

    pub fn load(paths: &DataConfig) -> Result<Self> {
        let retail = LoadedDataset::load(&paths.retail)?;
        let wholesale = LoadedDataset::load(&paths.wholesale)?;
        Ok(Self::new(retail, wholesale))
    }

    pub fn dataset(&self, dataset: Dataset) -> &LoadedDataset {
        match dataset {
            Dataset::Retail => &self.retail,
            Dataset::Wholesale => &self.wholesale,
        }
    }

    /// Derive a tab's view from scratch. Nothing from earlier visits is
    /// consulted, only `selections`.
    pub fn derive_view(&self, dataset: Dataset, tab: Tab, selections: &Selections, raw_rows: usize) -> View {
        let data = self.dataset(dataset);
        let rows = data.rows.as_slice();

        match tab {
            Tab::Home => View::Home {
                report: data.report.clone(),
                customers: data.summary().len(),
                conflicts: data.conflicts,
            },
            Tab::RawData => View::RawData(raw_page(rows, selections.page, raw_rows)),
            Tab::SegmentDistribution => {
                let lookup = match selections.customer_query.as_deref() {
                    None | Some("") => CustomerLookup::Skipped,
                    Some(q) => match find_customer(data.summary(), q) {
                        Some(c) => CustomerLookup::Found(c.clone()),
                        None => CustomerLookup::NotFound(q.to_string()),
                    },
                };
                let segments = segments_present(rows);
                let selected = selections
                    .segment
                    .filter(|s| segments.contains(s))
                    .or_else(|| segments.first().copied());
                let members = selected
                    .map(|s| customers_in_segment(rows, s))
                    .unwrap_or_default();
                View::SegmentDistribution {
                    distribution: segment_distribution(rows),
                    lookup,
                    segments,
                    selected,
                    members,
                }
            }
            Tab::AvgSpend => {
                let spend = match selections.spend_mode {
                    SpendMode::AllMonths => SpendView::AllMonths(average_spend(rows)),
                    SpendMode::IndividualMonths => {
                        let mut months = selections.months.clone();
                        months.sort();
                        months.dedup();
                        SpendView::IndividualMonths {
                            rows: monthly_average_spend(rows, &months),
                            months,
                        }
                    }
                };
                View::AvgSpend {
                    spend,
                    top: top_customers(rows, selections.top_customers),
                }
            }
            Tab::BrandAnalysis => {
                let segment = selections.segment.unwrap_or(Segment::Low);
                let categories = item_categories(rows);
                let category = selections
                    .category
                    .clone()
                    .or_else(|| categories.first().cloned());
                let mut months = selections.months.clone();
                months.sort();
                months.dedup();
                let analysis = match &category {
                    Some(category) => brand_analysis(
                        rows,
                        &BrandFilter {
                            segment,
                            category: category.clone(),
                            months: months.clone(),
                            top_n: selections.top_brands,
                        },
                    ),
                    None => BrandAnalysis {
                        distinct_brands: 0,
                        brands: Vec::new(),
                        total_sales: 0.0,
                        total_quantity: 0,
                    },
                };
                View::BrandAnalysis {
                    segment,
                    category,
                    categories,
                    months,
                    analysis,
                }
            }
            Tab::Recommendations => View::Recommendations,
        }
    }
}
