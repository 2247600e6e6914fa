use crate::types::{CustomerSummary, Segment, SegmentCount, SegmentMember, Transaction};
use std::collections::HashSet;

/// Distinct (name, segment) pairs in first-seen order.
fn unique_customers(rows: &[Transaction]) -> Vec<SegmentMember> {
    let mut seen: HashSet<(&str, Segment)> = HashSet::new();
    rows.iter()
        .filter(|r| seen.insert((r.name.as_str(), r.segment)))
        .map(|r| SegmentMember {
            name: r.name.clone(),
            segment: r.segment,
        })
        .collect()
}

/// Customers per segment. Every segment is listed, absent ones with 0.
pub fn segment_distribution(rows: &[Transaction]) -> Vec<SegmentCount> {
    let members = unique_customers(rows);
    Segment::ALL
        .iter()
        .map(|&segment| SegmentCount {
            segment,
            customers: members.iter().filter(|m| m.segment == segment).count(),
        })
        .collect()
}

/// Case-insensitive substring lookup. The query is matched as typed,
/// spaces included. When several customers match, the first in summary
/// order wins. An empty query matches nothing.
pub fn find_customer<'a>(summary: &'a [CustomerSummary], query: &str) -> Option<&'a CustomerSummary> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return None;
    }
    summary
        .iter()
        .find(|c| c.name.to_lowercase().contains(&needle))
}

/// Segments offered by the selector, sorted by their label text.
pub fn segments_present(rows: &[Transaction]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = rows.iter().map(|r| r.segment).collect();
    segments.sort_by_key(|s| s.label());
    segments.dedup();
    segments
}

pub fn customers_in_segment(rows: &[Transaction], segment: Segment) -> Vec<SegmentMember> {
    unique_customers(rows)
        .into_iter()
        .filter(|m| m.segment == segment)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize_customers;
    use crate::summary::tests::tx;
    use crate::types::Month;

    fn rows() -> Vec<Transaction> {
        vec![
            tx("Khalil", Segment::Low, 10.0, 1, "Tires", "X", Month::Jan),
            tx("Ali Hassan", Segment::High, 500.0, 2, "Tires", "X", Month::Jan),
            tx("Khalil", Segment::Low, 15.0, 1, "Tires", "Y", Month::Feb),
            tx("Maya", Segment::Low, 20.0, 1, "Oils", "Z", Month::Mar),
        ]
    }

    #[test]
    fn distribution_counts_distinct_customers_with_zero_bars() {
        let dist = segment_distribution(&rows());
        assert_eq!(
            dist,
            vec![
                SegmentCount { segment: Segment::Low, customers: 2 },
                SegmentCount { segment: Segment::Medium, customers: 0 },
                SegmentCount { segment: Segment::High, customers: 1 },
            ]
        );
    }

    #[test]
    fn distribution_of_empty_table_is_all_zero() {
        let dist = segment_distribution(&[]);
        assert_eq!(dist.len(), 3);
        assert!(dist.iter().all(|d| d.customers == 0));
    }

    #[test]
    fn lookup_is_case_insensitive_substring() {
        let rows = vec![
            tx("Ali Hassan", Segment::High, 100.0, 1, "c", "b", Month::Jan),
            tx("Khalil", Segment::Low, 5.0, 1, "c", "b", Month::Jan),
        ];
        let summary = summarize_customers(&rows);
        let hit = find_customer(&summary, "ali").unwrap();
        // "Khalil" also contains "ali", but "Ali Hassan" sorts first.
        assert_eq!(hit.name, "Ali Hassan");
        assert_eq!(hit.segment, Segment::High);
        assert_eq!(hit.sales_amount, 100.0);
    }

    #[test]
    fn lookup_without_match_or_data_is_none() {
        assert!(find_customer(&[], "ali").is_none());
        let summary = summarize_customers(&rows());
        assert!(find_customer(&summary, "zzz").is_none());
        assert!(find_customer(&summary, "").is_none());
        assert!(find_customer(&summary, "   ").is_none());
    }

    #[test]
    fn lookup_keeps_surrounding_spaces() {
        let summary = summarize_customers(&rows());
        assert!(find_customer(&summary, "hassan ").is_none());
        assert_eq!(
            find_customer(&summary, "HASSAN").map(|c| c.name.as_str()),
            Some("Ali Hassan")
        );
        assert_eq!(
            find_customer(&summary, "ali ").map(|c| c.name.as_str()),
            Some("Ali Hassan")
        );
    }

    #[test]
    fn segments_are_offered_in_label_order() {
        assert_eq!(
            segments_present(&rows()),
            vec![Segment::High, Segment::Low]
        );
    }

    #[test]
    fn members_are_distinct_and_in_table_order() {
        let low = customers_in_segment(&rows(), Segment::Low);
        let names: Vec<_> = low.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Khalil", "Maya"]);
        assert!(customers_in_segment(&rows(), Segment::Medium).is_empty());
    }
}
