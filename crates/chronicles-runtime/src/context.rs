//! Text digests of an analysis, handed to the language model as context.

use chronicles_core::models::{AnalyticsSummary, FilterCriteria, NamedValue};

const NOT_AVAILABLE: &str = "N/A";
const REPORT_TOP_N: usize = 5;

/// Snapshot used for agent chat: totals, the top device and active filters.
pub fn chat_context(summary: &AnalyticsSummary, criteria: &FilterCriteria) -> String {
    let top_device = summary
        .top_devices
        .first()
        .map(|d| d.name.as_str())
        .unwrap_or(NOT_AVAILABLE);

    [
        "Current Data Snapshot (Filtered):".to_string(),
        format!("Total Lines: {}", summary.total_lines),
        format!("Total Units: {}", summary.total_units),
        format!("Unique Suppliers: {}", summary.unique_suppliers),
        format!("Top Device: {}", top_device),
        format!("Time Range: {}", criteria.date_range_label()),
        format!("Filter Applied: {}", criteria.describe()),
    ]
    .join("\n")
}

/// Digest used for the comprehensive report: totals, the top five devices
/// and customers, and the active date range and filters.
pub fn report_context(summary: &AnalyticsSummary, criteria: &FilterCriteria) -> String {
    [
        format!("Total Lines: {}", summary.total_lines),
        format!("Total Units: {}", summary.total_units),
        format!("Unique Suppliers: {}", summary.unique_suppliers),
        format!("Unique Customers: {}", summary.unique_customers),
        format!("Top 5 Devices: {}", ranked_list(&summary.top_devices)),
        format!("Top 5 Customers: {}", ranked_list(&summary.customer_volume)),
        format!("Date Range: {}", criteria.date_range_label()),
        format!("Filter Applied: {}", criteria.describe()),
    ]
    .join("\n")
}

/// `"A (3), B (1)"` over the first five entries.
fn ranked_list(values: &[NamedValue]) -> String {
    values
        .iter()
        .take(REPORT_TOP_N)
        .map(|v| format!("{} ({})", v.name, v.value))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nv(name: &str, value: u64) -> NamedValue {
        NamedValue {
            name: name.to_string(),
            value,
        }
    }

    fn summary() -> AnalyticsSummary {
        AnalyticsSummary {
            total_lines: 33,
            total_units: 41,
            unique_suppliers: 4,
            unique_customers: 20,
            time_series: vec![],
            top_devices: (1..=7).map(|i| nv(&format!("D{i}"), 10 - i)).collect(),
            customer_volume: vec![nv("C06052", 5), nv("C05278", 2)],
        }
    }

    #[test]
    fn test_chat_context_fields() {
        let criteria = FilterCriteria {
            supplier: "B00079".to_string(),
            start_date: "2025-10-01".to_string(),
            ..Default::default()
        };
        let text = chat_context(&summary(), &criteria);

        assert!(text.starts_with("Current Data Snapshot (Filtered):"));
        assert!(text.contains("Total Lines: 33"));
        assert!(text.contains("Total Units: 41"));
        assert!(text.contains("Unique Suppliers: 4"));
        assert!(text.contains("Top Device: D1"));
        assert!(text.contains("Time Range: 2025-10-01 to End"));
        assert!(text.contains("Filter Applied: Supplier=B00079, Device=All"));
    }

    #[test]
    fn test_chat_context_empty_summary() {
        let text = chat_context(&AnalyticsSummary::default(), &FilterCriteria::default());
        assert!(text.contains("Top Device: N/A"));
        assert!(text.contains("Time Range: Start to End"));
    }

    #[test]
    fn test_report_context_top_five() {
        let text = report_context(&summary(), &FilterCriteria::default());
        assert!(text.contains("Top 5 Devices: D1 (9), D2 (8), D3 (7), D4 (6), D5 (5)\n"));
        assert!(!text.contains("D6"));
        assert!(text.contains("Top 5 Customers: C06052 (5), C05278 (2)"));
        assert!(text.contains("Date Range: Start to End"));
    }
}
