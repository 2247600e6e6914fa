use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

use crate::util::{format_int, format_number};

/// Customer value tier. Variant order is the display order (Low first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Segment {
    #[serde(rename = "Low-Value")]
    Low,
    #[serde(rename = "Medium-Value")]
    Medium,
    #[serde(rename = "High-Value")]
    High,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Low, Segment::Medium, Segment::High];

    pub fn label(self) -> &'static str {
        match self {
            Segment::Low => "Low-Value",
            Segment::Medium => "Medium-Value",
            Segment::High => "High-Value",
        }
    }

    pub fn parse(s: &str) -> Option<Segment> {
        let s = s.trim().to_ascii_lowercase();
        // "Low-Value", "low value", "low" all map to the same tier.
        let head = s.split(|c: char| c == '-' || c.is_whitespace()).next()?;
        match head {
            "low" => Some(Segment::Low),
            "medium" => Some(Segment::Medium),
            "high" => Some(Segment::High),
            _ => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Segment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Segment::parse(s).ok_or_else(|| {
            format!("unknown segment '{s}' (expected Low-Value, Medium-Value or High-Value)")
        })
    }
}

/// Transaction month. The datasets cover the first half of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    April,
    May,
    June,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::April,
        Month::May,
        Month::June,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }

    pub fn parse(s: &str) -> Option<Month> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jan" | "january" => Some(Month::Jan),
            "feb" | "february" => Some(Month::Feb),
            "mar" | "march" => Some(Month::Mar),
            "apr" | "april" => Some(Month::April),
            "may" => Some(Month::May),
            "jun" | "june" => Some(Month::June),
            _ => None,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::parse(s).ok_or_else(|| format!("unknown month '{s}' (expected Jan..June)"))
    }
}

/// One CSV row as it appears on disk. Everything is optional text so a
/// single bad cell never aborts the whole file.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Segment")]
    pub segment: Option<String>,
    #[serde(rename = "Sales_Amount")]
    pub sales_amount: Option<String>,
    #[serde(rename = "Sold_Quantity")]
    pub sold_quantity: Option<String>,
    #[serde(rename = "Item Category")]
    pub item_category: Option<String>,
    #[serde(rename = "Item Brand")]
    pub item_brand: Option<String>,
    #[serde(rename = "Month")]
    pub month: Option<String>,
    #[serde(rename = "Frequency")]
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct Transaction {
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Segment")]
    #[tabled(rename = "Segment")]
    pub segment: Segment,
    #[serde(rename = "Sales_Amount")]
    #[tabled(rename = "Sales_Amount", display_with = "display_opt_amount")]
    pub sales_amount: Option<f64>,
    #[serde(rename = "Sold_Quantity")]
    #[tabled(rename = "Sold_Quantity", display_with = "display_opt_count")]
    pub sold_quantity: Option<i64>,
    #[serde(rename = "Item Category")]
    #[tabled(rename = "Item Category", display_with = "display_opt_text")]
    pub item_category: Option<String>,
    #[serde(rename = "Item Brand")]
    #[tabled(rename = "Item Brand", display_with = "display_opt_text")]
    pub item_brand: Option<String>,
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: Month,
    #[serde(rename = "Frequency")]
    #[tabled(rename = "Frequency", display_with = "display_opt_count")]
    pub frequency: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CustomerSummary {
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Segment")]
    #[tabled(rename = "Segment")]
    pub segment: Segment,
    #[serde(rename = "Sales_Amount")]
    #[tabled(rename = "Sales_Amount", display_with = "display_amount")]
    pub sales_amount: f64,
    #[serde(rename = "Frequency")]
    #[tabled(rename = "Frequency", display_with = "display_opt_count")]
    pub frequency: Option<i64>,
}

/// A customer whose rows disagree on their segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentConflict {
    pub name: String,
    pub kept: Segment,
    pub others: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SegmentCount {
    #[serde(rename = "Segment")]
    #[tabled(rename = "Segment")]
    pub segment: Segment,
    #[serde(rename = "Customers")]
    #[tabled(rename = "Customers")]
    pub customers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SegmentMember {
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Segment")]
    #[tabled(rename = "Segment")]
    pub segment: Segment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SegmentSpend {
    #[serde(rename = "Segment")]
    #[tabled(rename = "Segment")]
    pub segment: Segment,
    #[serde(rename = "Customers")]
    #[tabled(rename = "Customers")]
    pub customers: usize,
    #[serde(rename = "Average_Spend")]
    #[tabled(rename = "Average_Spend", display_with = "display_amount")]
    pub average_spend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MonthlySpend {
    #[serde(rename = "Segment")]
    #[tabled(rename = "Segment")]
    pub segment: Segment,
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: Month,
    #[serde(rename = "Customers")]
    #[tabled(rename = "Customers")]
    pub customers: usize,
    #[serde(rename = "Average_Spend")]
    #[tabled(rename = "Average_Spend", display_with = "display_amount")]
    pub average_spend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct RankedCustomer {
    #[serde(rename = "Segment")]
    #[tabled(rename = "Segment")]
    pub segment: Segment,
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Sales_Amount")]
    #[tabled(rename = "Total Spending", display_with = "display_amount")]
    pub sales_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopCustomers {
    /// Rows in the per-segment top-10 pool, summed over all segments.
    pub pool_size: usize,
    /// The N actually applied after clamping.
    pub per_segment: usize,
    pub rows: Vec<RankedCustomer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct BrandRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Item Brand")]
    #[tabled(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Sales_Amount")]
    #[tabled(rename = "Total Sales Amount", display_with = "display_amount")]
    pub sales_amount: f64,
    #[serde(rename = "Sold_Quantity")]
    #[tabled(rename = "Units Sold", display_with = "display_count")]
    pub sold_quantity: i64,
    #[serde(rename = "Quantity_Share")]
    #[tabled(rename = "Unit Share %", display_with = "display_pct")]
    pub quantity_share: f64,
    #[serde(rename = "Running_Sales")]
    #[tabled(rename = "Running Sales", display_with = "display_amount")]
    pub running_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandAnalysis {
    /// Brands left after the inner join, before truncation.
    pub distinct_brands: usize,
    pub brands: Vec<BrandRow>,
    /// Over every row that passed the segment/category/month filters.
    pub total_sales: f64,
    pub total_quantity: i64,
}

fn display_amount(v: &f64) -> String {
    format_number(*v, 2)
}

fn display_pct(v: &f64) -> String {
    format!("{:.1}", v)
}

fn display_count(v: &i64) -> String {
    format_int(*v)
}

fn display_opt_amount(v: &Option<f64>) -> String {
    v.map(|x| format_number(x, 2)).unwrap_or_default()
}

fn display_opt_count(v: &Option<i64>) -> String {
    v.map(format_int).unwrap_or_default()
}

fn display_opt_text(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_parses_labels_loosely() {
        assert_eq!(Segment::parse("High-Value"), Some(Segment::High));
        assert_eq!(Segment::parse(" medium value "), Some(Segment::Medium));
        assert_eq!(Segment::parse("LOW"), Some(Segment::Low));
        assert_eq!(Segment::parse("VIP"), None);
        assert_eq!(Segment::parse(""), None);
    }

    #[test]
    fn segment_order_is_low_to_high() {
        let mut v = vec![Segment::High, Segment::Low, Segment::Medium];
        v.sort();
        assert_eq!(v, Segment::ALL.to_vec());
    }

    #[test]
    fn month_accepts_dataset_and_long_spellings() {
        assert_eq!(Month::parse("April"), Some(Month::April));
        assert_eq!(Month::parse("apr"), Some(Month::April));
        assert_eq!(Month::parse("June"), Some(Month::June));
        assert_eq!(Month::parse("january"), Some(Month::Jan));
        assert_eq!(Month::parse("July"), None);
        assert!(Month::Jan < Month::June);
    }

    #[test]
    fn labels_round_trip_through_from_str() {
        for s in Segment::ALL {
            assert_eq!(s.label().parse::<Segment>(), Ok(s));
        }
        for m in Month::ALL {
            assert_eq!(m.to_string().parse::<Month>(), Ok(m));
        }
    }
}
