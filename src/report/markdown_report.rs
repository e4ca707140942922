//! @ai:module:intent Markdown report files for single runs and cross-run comparisons
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::{EvaluationRun, ReportAggregator};
use anyhow::{Context, Result};
use std::path::Path;

/// @ai:intent Writes aggregator output to disk
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownReporter {
    aggregator: ReportAggregator,
}

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            aggregator: ReportAggregator::new(),
        }
    }

    /// @ai:intent Write the per-version and per-category report for one run
    /// @ai:effects fs:write
    pub fn write_report(&self, run: &EvaluationRun, path: &Path) -> Result<()> {
        write_text(path, &self.aggregator.aggregate(run))
    }

    /// @ai:intent Write the pooled per-version comparison across runs
    /// @ai:effects fs:write
    pub fn write_comparison(&self, runs: &[EvaluationRun], path: &Path) -> Result<()> {
        write_text(path, &self.aggregator.compare(runs))
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("Failed to write report {}", path.display()))
}
