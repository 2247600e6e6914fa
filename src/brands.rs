use crate::types::{BrandAnalysis, BrandRow, Month, Segment, Transaction};
use crate::util::cmp_f64_desc;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct BrandFilter {
    pub segment: Segment,
    pub category: String,
    pub months: Vec<Month>,
    /// `None` shows every brand.
    pub top_n: Option<usize>,
}

/// Categories for the selector, in first-seen order.
pub fn item_categories(rows: &[Transaction]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|r| r.item_category.as_deref())
        .filter(|c| seen.insert(*c))
        .map(str::to_string)
        .collect()
}

/// Brand spend/quantity ranking for one segment and category.
///
/// Totals cover every filtered row, including rows without a brand and
/// brands cut by `top_n`; the brand list only covers the displayed set.
pub fn brand_analysis(rows: &[Transaction], filter: &BrandFilter) -> BrandAnalysis {
    let filtered: Vec<&Transaction> = rows
        .iter()
        .filter(|r| {
            r.segment == filter.segment
                && r.item_category.as_deref() == Some(filter.category.as_str())
        })
        .filter(|r| filter.months.contains(&r.month))
        .collect();

    let mut brand_spend: BTreeMap<&str, f64> = BTreeMap::new();
    let mut brand_qty: BTreeMap<&str, i64> = BTreeMap::new();
    for r in &filtered {
        let Some(brand) = r.item_brand.as_deref() else {
            continue;
        };
        if let Some(amount) = r.sales_amount {
            *brand_spend.entry(brand).or_insert(0.0) += amount;
        }
        if let Some(qty) = r.sold_quantity {
            *brand_qty.entry(brand).or_insert(0) += qty;
        }
    }

    // Inner join: a brand needs both a spend and a quantity to be ranked.
    let mut joined: Vec<(&str, f64, i64)> = brand_spend
        .into_iter()
        .filter_map(|(brand, spend)| brand_qty.get(brand).map(|qty| (brand, spend, *qty)))
        .collect();
    joined.sort_by(|a, b| cmp_f64_desc(a.1, b.1).then_with(|| a.0.cmp(b.0)));

    let distinct_brands = joined.len();
    let top_n = match filter.top_n {
        Some(n) => {
            let clamped = n.clamp(1, distinct_brands.max(1));
            if clamped != n {
                tracing::debug!(requested = n, applied = clamped, "brand count clamped");
            }
            clamped
        }
        None => distinct_brands,
    };
    joined.truncate(top_n);

    let shown_qty: i64 = joined.iter().map(|(_, _, q)| q).sum();
    let mut running = 0.0;
    let brands = joined
        .into_iter()
        .enumerate()
        .map(|(idx, (brand, spend, qty))| {
            running += spend;
            BrandRow {
                rank: idx + 1,
                brand: brand.to_string(),
                sales_amount: spend,
                sold_quantity: qty,
                quantity_share: if shown_qty == 0 {
                    0.0
                } else {
                    qty as f64 / shown_qty as f64 * 100.0
                },
                running_sales: running,
            }
        })
        .collect();

    BrandAnalysis {
        distinct_brands,
        brands,
        total_sales: filtered.iter().filter_map(|r| r.sales_amount).sum(),
        total_quantity: filtered.iter().filter_map(|r| r.sold_quantity).sum(),
    }
}
