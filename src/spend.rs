use crate::types::{
    Month, MonthlySpend, RankedCustomer, Segment, SegmentSpend, TopCustomers, Transaction,
};
use crate::util::cmp_f64_desc;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Size of the per-segment candidate pool before the caller's N is applied.
pub const TOP_CUSTOMER_POOL: usize = 10;

#[derive(Default)]
struct Acc<'a> {
    total: f64,
    names: HashSet<&'a str>,
}

impl Acc<'_> {
    /// Revenue divided by distinct customers, not by row count.
    fn per_customer(&self) -> f64 {
        self.total / self.names.len() as f64
    }
}

pub fn average_spend(rows: &[Transaction]) -> Vec<SegmentSpend> {
    let mut map: BTreeMap<Segment, Acc> = BTreeMap::new();
    for r in rows {
        let e = map.entry(r.segment).or_default();
        e.total += r.sales_amount.unwrap_or(0.0);
        e.names.insert(r.name.as_str());
    }
    map.into_iter()
        .filter(|(_, acc)| !acc.names.is_empty())
        .map(|(segment, acc)| SegmentSpend {
            segment,
            customers: acc.names.len(),
            average_spend: acc.per_customer(),
        })
        .collect()
}

/// Same ratio as [`average_spend`] per (segment, month), counting only
/// rows whose month is in `months`.
pub fn monthly_average_spend(rows: &[Transaction], months: &[Month]) -> Vec<MonthlySpend> {
    let mut map: BTreeMap<(Segment, Month), Acc> = BTreeMap::new();
    for r in rows.iter().filter(|r| months.contains(&r.month)) {
        let e = map.entry((r.segment, r.month)).or_default();
        e.total += r.sales_amount.unwrap_or(0.0);
        e.names.insert(r.name.as_str());
    }
    map.into_iter()
        .filter(|(_, acc)| !acc.names.is_empty())
        .map(|((segment, month), acc)| MonthlySpend {
            segment,
            month,
            customers: acc.names.len(),
            average_spend: acc.per_customer(),
        })
        .collect()
}

/// Rank customers by total spend within each segment.
///
/// The top [`TOP_CUSTOMER_POOL`] per segment form the pool; `n` is then
/// clamped to `1..=pool_size` and applied per segment. Equal totals are
/// ordered by name.
pub fn top_customers(rows: &[Transaction], n: usize) -> TopCustomers {
    let mut totals: HashMap<(Segment, &str), f64> = HashMap::new();
    for r in rows {
        *totals.entry((r.segment, r.name.as_str())).or_insert(0.0) +=
            r.sales_amount.unwrap_or(0.0);
    }

    let mut by_segment: BTreeMap<Segment, Vec<(&str, f64)>> = BTreeMap::new();
    for ((segment, name), total) in totals {
        by_segment.entry(segment).or_default().push((name, total));
    }
    for list in by_segment.values_mut() {
        list.sort_by(|a, b| cmp_f64_desc(a.1, b.1).then_with(|| a.0.cmp(b.0)));
        list.truncate(TOP_CUSTOMER_POOL);
    }

    let pool_size: usize = by_segment.values().map(Vec::len).sum();
    let per_segment = n.clamp(1, pool_size.max(1));
    if per_segment != n {
        tracing::debug!(requested = n, applied = per_segment, "top customer count clamped");
    }

    let ranked = by_segment
        .into_iter()
        .flat_map(|(segment, list)| {
            list.into_iter()
                .take(per_segment)
                .enumerate()
                .map(move |(idx, (name, total))| RankedCustomer {
                    segment,
                    rank: idx + 1,
                    name: name.to_string(),
                    sales_amount: total,
                })
        })
        .collect();

    TopCustomers {
        pool_size,
        per_segment,
        rows: ranked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::tests::tx;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn average_divides_by_distinct_customers_not_rows() {
        let rows = vec![
            tx("A", Segment::High, 100.0, 1, "c", "b", Month::Jan),
            tx("A", Segment::High, 50.0, 1, "c", "b", Month::Feb),
            tx("B", Segment::High, 30.0, 1, "c", "b", Month::Feb),
            tx("C", Segment::Low, 10.0, 1, "c", "b", Month::Jan),
        ];
        let avg = average_spend(&rows);
        assert_eq!(avg.len(), 2);
        assert_eq!(avg[0].segment, Segment::Low);
        assert!(close(avg[0].average_spend, 10.0));
        assert_eq!(avg[1].segment, Segment::High);
        assert_eq!(avg[1].customers, 2);
        assert!(close(avg[1].average_spend, 90.0));
    }

    #[test]
    fn empty_segments_produce_no_bar() {
        assert!(average_spend(&[]).is_empty());
        let rows = vec![tx("A", Segment::Medium, 5.0, 1, "c", "b", Month::Jan)];
        let avg = average_spend(&rows);
        assert_eq!(avg.len(), 1);
        assert_eq!(avg[0].segment, Segment::Medium);
    }

    #[test]
    fn monthly_mode_ignores_unselected_months_entirely() {
        let rows = vec![
            tx("A", Segment::Low, 10.0, 1, "c", "b", Month::Jan),
            tx("B", Segment::Low, 1000.0, 1, "c", "b", Month::Feb),
            tx("B", Segment::Low, 30.0, 1, "c", "b", Month::Mar),
            tx("C", Segment::Low, 999.0, 1, "c", "b", Month::June),
        ];
        let monthly = monthly_average_spend(&rows, &[Month::Mar, Month::Jan]);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month, Month::Jan);
        assert!(close(monthly[0].average_spend, 10.0));
        assert_eq!(monthly[1].month, Month::Mar);
        assert_eq!(monthly[1].customers, 1);
        assert!(close(monthly[1].average_spend, 30.0));
    }

    #[test]
    fn monthly_mode_orders_segment_then_month() {
        let rows = vec![
            tx("H", Segment::High, 1.0, 1, "c", "b", Month::Jan),
            tx("L", Segment::Low, 1.0, 1, "c", "b", Month::May),
            tx("L", Segment::Low, 1.0, 1, "c", "b", Month::Feb),
        ];
        let keys: Vec<_> = monthly_average_spend(&rows, &Month::ALL)
            .into_iter()
            .map(|m| (m.segment, m.month))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Segment::Low, Month::Feb),
                (Segment::Low, Month::May),
                (Segment::High, Month::Jan),
            ]
        );
    }

    #[test]
    fn top_customers_ranks_within_each_segment() {
        let rows = vec![
            tx("A", Segment::Low, 5.0, 1, "c", "b", Month::Jan),
            tx("B", Segment::Low, 50.0, 1, "c", "b", Month::Jan),
            tx("C", Segment::Low, 20.0, 1, "c", "b", Month::Jan),
            tx("A", Segment::Low, 40.0, 1, "c", "b", Month::Feb),
            tx("H", Segment::High, 900.0, 1, "c", "b", Month::Jan),
        ];
        let top = top_customers(&rows, 2);
        assert_eq!(top.pool_size, 4);
        assert_eq!(top.per_segment, 2);
        let got: Vec<_> = top
            .rows
            .iter()
            .map(|r| (r.segment, r.rank, r.name.as_str(), r.sales_amount))
            .collect();
        assert_eq!(
            got,
            vec![
                (Segment::Low, 1, "B", 50.0),
                (Segment::Low, 2, "A", 45.0),
                (Segment::High, 1, "H", 900.0),
            ]
        );
    }

    #[test]
    fn pool_caps_each_segment_at_ten() {
        let rows: Vec<_> = (0..15)
            .map(|i| tx(&format!("C{i:02}"), Segment::Medium, i as f64, 1, "c", "b", Month::Jan))
            .collect();
        let top = top_customers(&rows, 100);
        assert_eq!(top.pool_size, 10);
        assert_eq!(top.per_segment, 10);
        assert_eq!(top.rows.len(), 10);
        assert_eq!(top.rows[0].name, "C14");
    }

    #[test]
    fn ties_break_by_name_and_zero_n_is_clamped() {
        let rows = vec![
            tx("Zed", Segment::Low, 10.0, 1, "c", "b", Month::Jan),
            tx("Amy", Segment::Low, 10.0, 1, "c", "b", Month::Jan),
        ];
        let top = top_customers(&rows, 0);
        assert_eq!(top.per_segment, 1);
        assert_eq!(top.rows.len(), 1);
        assert_eq!(top.rows[0].name, "Amy");
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let rows = vec![
            tx("A", Segment::Low, 3.0, 1, "c", "b", Month::Jan),
            tx("B", Segment::Low, 3.0, 1, "c", "b", Month::Jan),
            tx("C", Segment::High, 7.0, 1, "c", "b", Month::April),
        ];
        assert_eq!(top_customers(&rows, 5), top_customers(&rows, 5));
        assert_eq!(average_spend(&rows), average_spend(&rows));
    }
}
