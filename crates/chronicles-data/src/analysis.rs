//! Analysis pipeline: filter → aggregate, with run metadata.
//!
//! Returns an [`AnalysisResult`] ready for the UI layer and the AI-context
//! builder.

use chrono::Utc;
use chronicles_core::models::{AnalyticsSummary, FilterCriteria, Record};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::Aggregator;
use crate::filter::filter_records;

/// Number of rows shown in the tabular preview.
pub const PREVIEW_ROWS: usize = 50;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// Records in the full dataset.
    pub total_records: usize,
    /// Records left after filtering.
    pub filtered_records: usize,
    /// Wall-clock seconds spent filtering and aggregating.
    pub elapsed_seconds: f64,
}

/// The complete output of [`analyze`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// The criteria this result was computed for.
    pub criteria: FilterCriteria,
    /// Filtered records, in dataset order.
    pub filtered: Vec<Record>,
    pub summary: AnalyticsSummary,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// First [`PREVIEW_ROWS`] filtered records.
    pub fn preview(&self) -> &[Record] {
        preview(&self.filtered, PREVIEW_ROWS)
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the pipeline over `records` for `criteria`.
pub fn analyze(records: &[Record], criteria: &FilterCriteria) -> AnalysisResult {
    let start = std::time::Instant::now();

    let filtered = filter_records(records, criteria);
    let summary = Aggregator::aggregate(&filtered);

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        total_records: records.len(),
        filtered_records: filtered.len(),
        elapsed_seconds: start.elapsed().as_secs_f64(),
    };

    debug!(
        total = metadata.total_records,
        filtered = metadata.filtered_records,
        "analysis complete for {}",
        criteria.describe()
    );

    AnalysisResult {
        criteria: criteria.clone(),
        filtered,
        summary,
        metadata,
    }
}

/// The first `limit` records.
pub fn preview(records: &[Record], limit: usize) -> &[Record] {
    &records[..records.len().min(limit)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::sample_dataset;

    #[test]
    fn test_analyze_unfiltered_sample() {
        let dataset = sample_dataset();
        let result = analyze(&dataset.records, &FilterCriteria::default());

        assert_eq!(result.filtered.len(), dataset.len());
        assert_eq!(result.metadata.total_records, dataset.len());
        assert_eq!(result.metadata.filtered_records, dataset.len());
        assert_eq!(result.summary.total_lines, dataset.len());
        assert!(result.metadata.elapsed_seconds >= 0.0);
        assert!(chrono::DateTime::parse_from_rfc3339(&result.metadata.generated_at).is_ok());
    }

    #[test]
    fn test_analyze_supplier_filter() {
        let dataset = sample_dataset();
        let criteria = FilterCriteria {
            supplier: "B00018".to_string(),
            ..Default::default()
        };
        let result = analyze(&dataset.records, &criteria);

        assert!(!result.filtered.is_empty());
        assert!(result.filtered.iter().all(|r| r.supplier_name == "B00018"));
        assert_eq!(result.summary.unique_suppliers, 1);
        assert_eq!(result.metadata.total_records, dataset.len());
        assert_eq!(result.criteria, criteria);
    }

    #[test]
    fn test_analyze_empty_dataset() {
        let result = analyze(&[], &FilterCriteria::default());
        assert!(result.filtered.is_empty());
        assert_eq!(result.summary, AnalyticsSummary::default());
    }

    #[test]
    fn test_preview_limits_rows() {
        let records = vec![Record::default(); 60];
        assert_eq!(preview(&records, PREVIEW_ROWS).len(), 50);
        assert_eq!(preview(&records[..3], PREVIEW_ROWS).len(), 3);

        let result = analyze(&records, &FilterCriteria::default());
        assert_eq!(result.preview().len(), 50);
    }
}
