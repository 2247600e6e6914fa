use crate::types::{CustomerSummary, Segment, SegmentConflict, Transaction};
use std::collections::BTreeMap;

/// Collapse a table to one row per customer, ordered by name.
///
/// The segment is taken from the customer's first row in table order;
/// sales are summed skipping missing cells; frequency is the max of the
/// present values and stays `None` when every row lacks it.
pub fn summarize_customers(rows: &[Transaction]) -> Vec<CustomerSummary> {
    let mut map: BTreeMap<&str, CustomerSummary> = BTreeMap::new();
    for r in rows {
        let e = map.entry(r.name.as_str()).or_insert_with(|| CustomerSummary {
            name: r.name.clone(),
            segment: r.segment,
            sales_amount: 0.0,
            frequency: None,
        });
        e.sales_amount += r.sales_amount.unwrap_or(0.0);
        e.frequency = match (e.frequency, r.frequency) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }
    map.into_values().collect()
}

/// Customers whose rows carry more than one segment. The summary keeps
/// the first one seen; this lists what it overrode.
pub fn segment_conflicts(rows: &[Transaction]) -> Vec<SegmentConflict> {
    let mut seen: BTreeMap<&str, (Segment, Vec<Segment>)> = BTreeMap::new();
    for r in rows {
        let (first, others) = seen.entry(r.name.as_str()).or_insert((r.segment, vec![]));
        if r.segment != *first && !others.contains(&r.segment) {
            others.push(r.segment);
        }
    }
    seen.into_iter()
        .filter(|(_, (_, others))| !others.is_empty())
        .map(|(name, (kept, others))| SegmentConflict {
            name: name.to_string(),
            kept,
            others,
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::Month;

    pub(crate) fn tx(
        name: &str,
        segment: Segment,
        sales: f64,
        qty: i64,
        category: &str,
        brand: &str,
        month: Month,
    ) -> Transaction {
        Transaction {
            name: name.to_string(),
            segment,
            sales_amount: Some(sales),
            sold_quantity: Some(qty),
            item_category: Some(category.to_string()),
            item_brand: Some(brand.to_string()),
            month,
            frequency: None,
        }
    }

    #[test]
    fn sums_sales_and_keeps_first_segment() {
        let rows = vec![
            tx("A", Segment::High, 100.0, 5, "Tires", "X", Month::Jan),
            tx("A", Segment::High, 50.0, 2, "Tires", "X", Month::Feb),
        ];
        let summary = summarize_customers(&rows);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].name, "A");
        assert_eq!(summary[0].segment, Segment::High);
        assert_eq!(summary[0].sales_amount, 150.0);
    }

    #[test]
    fn frequency_is_max_of_present_values() {
        let mut a1 = tx("A", Segment::Low, 1.0, 1, "c", "b", Month::Jan);
        a1.frequency = Some(3);
        let mut a2 = tx("A", Segment::Low, 1.0, 1, "c", "b", Month::Feb);
        a2.frequency = None;
        let mut a3 = tx("A", Segment::Low, 1.0, 1, "c", "b", Month::Mar);
        a3.frequency = Some(9);
        let b = tx("B", Segment::Low, 1.0, 1, "c", "b", Month::Mar);

        let summary = summarize_customers(&[a1, a2, a3, b]);
        assert_eq!(summary[0].frequency, Some(9));
        assert_eq!(summary[1].frequency, None);
    }

    #[test]
    fn missing_sales_are_skipped_in_the_sum() {
        let mut a = tx("A", Segment::Low, 0.0, 1, "c", "b", Month::Jan);
        a.sales_amount = None;
        let b = tx("A", Segment::Low, 20.0, 1, "c", "b", Month::Feb);
        let summary = summarize_customers(&[a, b]);
        assert_eq!(summary[0].sales_amount, 20.0);
    }

    #[test]
    fn rows_come_out_ordered_by_name() {
        let rows = vec![
            tx("Zeina", Segment::Low, 1.0, 1, "c", "b", Month::Jan),
            tx("Ali", Segment::High, 1.0, 1, "c", "b", Month::Jan),
        ];
        let names: Vec<_> = summarize_customers(&rows).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Ali", "Zeina"]);
    }

    #[test]
    fn conflicting_segments_are_reported_and_first_wins() {
        let rows = vec![
            tx("A", Segment::Medium, 1.0, 1, "c", "b", Month::Jan),
            tx("A", Segment::High, 1.0, 1, "c", "b", Month::Feb),
            tx("A", Segment::High, 1.0, 1, "c", "b", Month::Mar),
            tx("B", Segment::Low, 1.0, 1, "c", "b", Month::Mar),
        ];
        let conflicts = segment_conflicts(&rows);
        assert_eq!(
            conflicts,
            vec![SegmentConflict {
                name: "A".into(),
                kept: Segment::Medium,
                others: vec![Segment::High],
            }]
        );
        assert_eq!(summarize_customers(&rows)[0].segment, Segment::Medium);
    }
}
