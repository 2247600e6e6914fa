use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

use crate::config::DisplayConfig;
use crate::types::{Month, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Dataset {
    Retail,
    Wholesale,
}

impl Dataset {
    pub const ALL: [Dataset; 2] = [Dataset::Retail, Dataset::Wholesale];
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dataset::Retail => "Retail",
            Dataset::Wholesale => "Wholesale",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Tab {
    Home,
    RawData,
    SegmentDistribution,
    AvgSpend,
    BrandAnalysis,
    Recommendations,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Home,
        Tab::RawData,
        Tab::SegmentDistribution,
        Tab::AvgSpend,
        Tab::BrandAnalysis,
        Tab::Recommendations,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::RawData => "Raw Data",
            Tab::SegmentDistribution => "Customer Segment Distribution",
            Tab::AvgSpend => "Average Spend by Segment",
            Tab::BrandAnalysis => "Brand Analysis",
            Tab::Recommendations => "Recommendations",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Where the user is: two independent axes, no guards between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    pub dataset: Dataset,
    pub tab: Tab,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            dataset: Dataset::Retail,
            tab: Tab::Home,
        }
    }
}

impl Navigator {
    pub fn select_dataset(&mut self, dataset: Dataset) {
        if self.dataset != dataset {
            tracing::debug!(from = %self.dataset, to = %dataset, "dataset switched");
        }
        self.dataset = dataset;
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendMode {
    #[default]
    AllMonths,
    IndividualMonths,
}

/// Widget values for one visit to a tab. Built fresh on every visit;
/// `None` means "use the selector's first option".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selections {
    pub customer_query: Option<String>,
    pub segment: Option<Segment>,
    pub spend_mode: SpendMode,
    pub months: Vec<Month>,
    pub top_customers: usize,
    pub category: Option<String>,
    pub top_brands: Option<usize>,
    /// Raw Data page, 1-based.
    pub page: usize,
}

impl Selections {
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            customer_query: None,
            segment: None,
            spend_mode: SpendMode::default(),
            months: Month::ALL.to_vec(),
            top_customers: display.top_customers,
            category: None,
            top_brands: None,
            page: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dataset_tab_pair_is_reachable_from_any_state() {
        for start_ds in Dataset::ALL {
            for start_tab in Tab::ALL {
                for ds in Dataset::ALL {
                    for tab in Tab::ALL {
                        let mut nav = Navigator {
                            dataset: start_ds,
                            tab: start_tab,
                        };
                        nav.select_dataset(ds);
                        nav.select_tab(tab);
                        assert_eq!(nav, Navigator { dataset: ds, tab });
                    }
                }
            }
        }
    }

    #[test]
    fn switching_dataset_keeps_the_tab() {
        let mut nav = Navigator::default();
        nav.select_tab(Tab::BrandAnalysis);
        nav.select_dataset(Dataset::Wholesale);
        assert_eq!(nav.tab, Tab::BrandAnalysis);
    }

    #[test]
    fn fresh_selections_use_defaults() {
        let display = DisplayConfig {
            top_customers: 7,
            ..DisplayConfig::default()
        };
        let s = Selections::new(&display);
        assert_eq!(s.months, Month::ALL.to_vec());
        assert_eq!(s.top_customers, 7);
        assert_eq!(s.spend_mode, SpendMode::AllMonths);
        assert_eq!(s.page, 1);
        assert!(s.segment.is_none() && s.category.is_none() && s.top_brands.is_none());
    }

    #[test]
    fn tab_names_parse_from_the_command_line() {
        assert_eq!(Tab::from_str("brand-analysis", true), Ok(Tab::BrandAnalysis));
        assert_eq!(Dataset::from_str("wholesale", true), Ok(Dataset::Wholesale));
    }
}
