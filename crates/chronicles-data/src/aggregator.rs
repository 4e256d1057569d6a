//! Summary statistics, delivery time series and top-N rankings.

use std::collections::{BTreeMap, HashMap, HashSet};

use chronicles_core::models::{AnalyticsSummary, DatePoint, NamedValue, Record};
use chronicles_core::time_utils::day_key;

/// Length of the device and customer rankings.
pub const TOP_N: usize = 10;

// ── Aggregator ────────────────────────────────────────────────────────────────

/// Stateless helper that turns a record set into an [`AnalyticsSummary`].
pub struct Aggregator;

impl Aggregator {
    /// Aggregate `records`. An empty slice yields an all-zero summary.
    pub fn aggregate(records: &[Record]) -> AnalyticsSummary {
        let unique_suppliers: HashSet<&str> =
            records.iter().map(|r| r.supplier_name.as_str()).collect();
        let unique_customers: HashSet<&str> =
            records.iter().map(|r| r.customer.as_str()).collect();

        AnalyticsSummary {
            total_lines: records.len(),
            total_units: records.iter().map(|r| r.quantity).sum(),
            unique_suppliers: unique_suppliers.len(),
            unique_customers: unique_customers.len(),
            time_series: Self::time_series(records),
            top_devices: Self::rank_by(records, |r| &r.device_name, TOP_N),
            customer_volume: Self::rank_by(records, |r| &r.customer, TOP_N),
        }
    }

    /// Units per UTC delivery day, ascending. Undated records are skipped.
    pub fn time_series(records: &[Record]) -> Vec<DatePoint> {
        let mut by_day: BTreeMap<String, u64> = BTreeMap::new();
        for record in records {
            if let Some(dt) = &record.deliver_date_parsed {
                *by_day.entry(day_key(dt)).or_insert(0) += record.quantity;
            }
        }
        by_day
            .into_iter()
            .map(|(date, value)| DatePoint { date, value })
            .collect()
    }

    /// Group by `key`, sum quantities, and keep the `limit` largest groups.
    ///
    /// Groups with equal sums keep the order in which their key first
    /// appeared in `records`.
    pub fn rank_by<F>(records: &[Record], key: F, limit: usize) -> Vec<NamedValue>
    where
        F: Fn(&Record) -> &String,
    {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<NamedValue> = Vec::new();

        for record in records {
            let name = key(record).as_str();
            match index.get(name) {
                Some(&i) => groups[i].value += record.quantity,
                None => {
                    index.insert(name, groups.len());
                    groups.push(NamedValue {
                        name: name.to_string(),
                        value: record.quantity,
                    });
                }
            }
        }

        // Stable sort: ties stay in first-seen order.
        groups.sort_by(|a, b| b.value.cmp(&a.value));
        groups.truncate(limit);
        groups
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{parse_records, sample_dataset};
    use chronicles_core::time_utils::serial_to_datetime;

    fn record(device: &str, customer: &str, serial: Option<i64>, quantity: u64) -> Record {
        Record {
            supplier_name: "S".to_string(),
            device_name: device.to_string(),
            customer: customer.to_string(),
            deliver_date_parsed: serial.and_then(serial_to_datetime),
            quantity,
            ..Default::default()
        }
    }

    fn nv(name: &str, value: u64) -> NamedValue {
        NamedValue {
            name: name.to_string(),
            value,
        }
    }

    // ── aggregate ─────────────────────────────────────────────────────────────

    #[test]
    fn test_aggregate_empty() {
        let summary = Aggregator::aggregate(&[]);
        assert_eq!(summary, AnalyticsSummary::default());
        assert_eq!(summary.total_lines, 0);
        assert_eq!(summary.total_units, 0);
        assert!(summary.time_series.is_empty());
        assert!(summary.top_devices.is_empty());
    }

    #[test]
    fn test_aggregate_scenario() {
        let records = parse_records(
            "Supplier,deliverdate,customer,DeviceName,Numbers\n\
             S1,45930,C1,\"Widget\",3\n\
             S2,abc,C2,Gadget,x\n",
        );
        let summary = Aggregator::aggregate(&records);

        assert_eq!(summary.total_lines, 2);
        assert_eq!(summary.total_units, 3);
        assert_eq!(summary.top_devices, vec![nv("Widget", 3), nv("Gadget", 0)]);
        assert_eq!(summary.customer_volume, vec![nv("C1", 3), nv("C2", 0)]);
        assert_eq!(
            summary.time_series,
            vec![DatePoint {
                date: "2025-10-01".to_string(),
                value: 3
            }]
        );
        // "Supplier" is not the Suppliername column, so both names are empty.
        assert_eq!(summary.unique_suppliers, 1);
        assert_eq!(summary.unique_customers, 2);
    }

    #[test]
    fn test_aggregate_totals_match_sum() {
        let records = sample_dataset().records;
        let expected: u64 = records.iter().map(|r| r.quantity).sum();
        let summary = Aggregator::aggregate(&records);
        assert_eq!(summary.total_units, expected);
        assert_eq!(summary.total_lines, records.len());
        assert_eq!(summary.unique_suppliers, 4);
    }

    #[test]
    fn test_empty_strings_count_as_distinct_values() {
        let records = vec![record("A", "", None, 1), record("B", "C1", None, 1)];
        assert_eq!(Aggregator::aggregate(&records).unique_customers, 2);
    }

    // ── time_series ───────────────────────────────────────────────────────────

    #[test]
    fn test_time_series_groups_and_sorts_by_day() {
        let records = vec![
            record("A", "C", Some(45_964), 2),
            record("A", "C", Some(45_930), 1),
            record("A", "C", None, 9),
            record("B", "C", Some(45_964), 3),
        ];
        let series = Aggregator::time_series(&records);
        let dates: Vec<(&str, u64)> = series.iter().map(|p| (p.date.as_str(), p.value)).collect();
        assert_eq!(dates, vec![("2025-10-01", 1), ("2025-11-04", 5)]);
    }

    // ── rankings ──────────────────────────────────────────────────────────────

    #[test]
    fn test_top_devices_bounded_and_non_increasing() {
        let records: Vec<Record> = (0..25)
            .map(|i| record(&format!("D{i}"), "C", None, (i % 7) as u64))
            .collect();
        let top = Aggregator::aggregate(&records).top_devices;

        assert_eq!(top.len(), TOP_N);
        assert!(top.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn test_rank_ties_keep_first_seen_order() {
        let records = vec![
            record("Gamma", "C", None, 2),
            record("Alpha", "C", None, 5),
            record("Beta", "C", None, 2),
            record("Gamma", "C", None, 3),
        ];
        let ranked = Aggregator::rank_by(&records, |r| &r.device_name, TOP_N);
        assert_eq!(ranked, vec![nv("Gamma", 5), nv("Alpha", 5), nv("Beta", 2)]);
    }

    #[test]
    fn test_customer_volume_sums_per_customer() {
        let records = vec![
            record("A", "C06052", None, 1),
            record("B", "C05278", None, 4),
            record("C", "C06052", None, 2),
        ];
        let volume = Aggregator::aggregate(&records).customer_volume;
        assert_eq!(volume, vec![nv("C05278", 4), nv("C06052", 3)]);
    }
}
