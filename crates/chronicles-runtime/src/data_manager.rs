//! Dataset owner with memoized analysis.
//!
//! Holds the currently loaded packing list and a version counter that is
//! bumped on every load. [`DataManager::analysis`] recomputes the
//! filter → aggregate pipeline only when the criteria or the dataset version
//! differ from the previous call.

use std::path::Path;

use chronicles_core::models::FilterCriteria;
use chronicles_core::Result;
use chronicles_data::analysis::{analyze, AnalysisResult};
use chronicles_data::filter::FilterOptions;
use chronicles_data::reader::{load_records, sample_dataset, Dataset};

use crate::activity_log::ActivityLog;

/// Label used for the bundled sample packing list.
pub const SAMPLE_SOURCE: &str = "sample";

struct CachedAnalysis {
    version: u64,
    result: AnalysisResult,
}

// ── DataManager ───────────────────────────────────────────────────────────────

/// Owns the current dataset and the last computed analysis.
///
/// # Example
/// ```
/// use chronicles_runtime::data_manager::DataManager;
/// use chronicles_core::models::FilterCriteria;
///
/// let mut mgr = DataManager::new();
/// mgr.load_sample();
/// let result = mgr.analysis(&FilterCriteria::default());
/// assert!(result.summary.total_lines > 0);
/// ```
pub struct DataManager {
    dataset: Dataset,
    /// Bumped on every successful load.
    version: u64,
    /// Where the current dataset came from (file name or [`SAMPLE_SOURCE`]).
    source: Option<String>,
    cache: Option<CachedAnalysis>,
    analyses_run: u64,
    last_error: Option<String>,
    activity: ActivityLog,
}

impl Default for DataManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DataManager {
    /// An empty manager with its own activity log.
    pub fn new() -> Self {
        Self::with_activity(ActivityLog::new())
    }

    /// An empty manager recording into `activity`.
    pub fn with_activity(activity: ActivityLog) -> Self {
        Self {
            dataset: Dataset::default(),
            version: 0,
            source: None,
            cache: None,
            analyses_run: 0,
            last_error: None,
            activity,
        }
    }

    // ── Loading ───────────────────────────────────────────────────────────

    /// Replace the dataset with the bundled sample. Returns the row count.
    pub fn load_sample(&mut self) -> usize {
        self.install(sample_dataset(), SAMPLE_SOURCE.to_string());
        self.activity.record("Data Load", "Loaded Sample Data");
        self.dataset.len()
    }

    /// Replace the dataset with the CSV at `path`. Returns the row count.
    ///
    /// On failure the previous dataset stays loaded and the error is kept
    /// for [`DataManager::last_error`].
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        match load_records(path) {
            Ok(dataset) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                let rows = dataset.len();
                self.install(dataset, name.clone());
                self.activity
                    .record("Data Upload", format!("Uploaded {}, {} rows", name, rows));
                Ok(rows)
            }
            Err(e) => {
                tracing::warn!(error = %e, "keeping previous dataset");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Replace the dataset with one parsed elsewhere.
    pub fn replace_dataset(&mut self, dataset: Dataset, source: impl Into<String>) {
        let source = source.into();
        let rows = dataset.len();
        self.install(dataset, source.clone());
        self.activity
            .record("Data Load", format!("Loaded {}, {} rows", source, rows));
    }

    fn install(&mut self, dataset: Dataset, source: String) {
        self.dataset = dataset;
        self.version += 1;
        self.source = Some(source);
        self.cache = None;
        self.last_error = None;
        tracing::debug!(
            version = self.version,
            rows = self.dataset.len(),
            "dataset replaced"
        );
    }

    // ── Analysis ──────────────────────────────────────────────────────────

    /// Analysis of the current dataset under `criteria`, memoized on
    /// `(criteria, version)`.
    pub fn analysis(&mut self, criteria: &FilterCriteria) -> &AnalysisResult {
        let cached = match self.cache.take() {
            Some(c) if c.version == self.version && c.result.criteria == *criteria => {
                tracing::debug!("returning memoized analysis");
                c
            }
            _ => {
                self.analyses_run += 1;
                CachedAnalysis {
                    version: self.version,
                    result: analyze(&self.dataset.records, criteria),
                }
            }
        };
        &self.cache.insert(cached).result
    }

    /// Drop the memoized analysis.
    pub fn invalidate_cache(&mut self) {
        self.cache = None;
        tracing::debug!("analysis cache invalidated");
    }

    /// Supplier / device picker choices for the full dataset.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_records(&self.dataset.records)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Number of times the pipeline actually ran.
    pub fn analyses_run(&self) -> u64 {
        self.analyses_run
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
