//! Supplier / device / delivery-date filtering.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use chronicles_core::models::{FilterCriteria, Record};
use chronicles_core::time_utils::parse_date_bound;
use serde::Serialize;

// ── Filtering ─────────────────────────────────────────────────────────────────

/// Return the records matching `criteria`, in their original order.
///
/// Supplier and device must match exactly when set. The date range is
/// inclusive on both ends; a bound that is empty or cannot be parsed
/// imposes no constraint. Records without a parsed delivery date skip the
/// date check entirely and are kept whenever supplier and device match.
pub fn filter_records(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    let bounds = DateBounds::from_criteria(criteria);
    records
        .iter()
        .filter(|r| matches(r, criteria, &bounds))
        .cloned()
        .collect()
}

struct DateBounds {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl DateBounds {
    fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            start: parse_date_bound(&criteria.start_date),
            end: parse_date_bound(&criteria.end_date),
        }
    }
}

fn matches(record: &Record, criteria: &FilterCriteria, bounds: &DateBounds) -> bool {
    if !criteria.supplier.is_empty() && record.supplier_name != criteria.supplier {
        return false;
    }
    if !criteria.device.is_empty() && record.device_name != criteria.device {
        return false;
    }

    if let Some(dt) = record.deliver_date_parsed {
        if bounds.start.is_some_and(|start| dt < start) {
            return false;
        }
        if bounds.end.is_some_and(|end| dt > end) {
            return false;
        }
    }

    true
}

// ── FilterOptions ─────────────────────────────────────────────────────────────

/// Choices offered by the supplier and device pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub suppliers: Vec<String>,
    pub devices: Vec<String>,
}

impl FilterOptions {
    /// Sorted distinct supplier and device names of the full dataset.
    /// Empty names are not offered.
    pub fn from_records(records: &[Record]) -> Self {
        let suppliers: BTreeSet<&str> = records
            .iter()
            .map(|r| r.supplier_name.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        let devices: BTreeSet<&str> = records.iter().map(|r| r.device_name.as_str()).collect();

        Self {
            suppliers: suppliers.into_iter().map(str::to_string).collect(),
            devices: devices.into_iter().map(str::to_string).collect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
