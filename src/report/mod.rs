//! @ai:module:intent Report files for evaluation runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, JsonReporter, MarkdownReporter

pub mod json_report;
pub mod markdown_report;

pub use json_report::{collect_result_files, JsonReporter, RESULTS_FILE};
pub use markdown_report::MarkdownReporter;

use crate::evaluator::human_review::REPORT_FILE;
use crate::metrics::EvaluationRun;
use anyhow::{Context, Result};
use std::path::Path;

/// @ai:intent Combined report generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
        }
    }

    /// @ai:intent Write the results file and the Markdown report into `output_dir`
    /// @ai:effects fs:write
    pub fn generate_all(&self, run: &EvaluationRun, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory {}", output_dir.display()))?;

        self.json.save(run, &output_dir.join(RESULTS_FILE))?;
        self.markdown
            .write_report(run, &output_dir.join(REPORT_FILE))?;

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_all_writes_both_files() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("evaluation_results");
        let run = EvaluationRun {
            timestamp: "2024-05-01T00:00:00+00:00".to_string(),
            test_cases_count: 0,
            prompt_versions: vec!["default".to_string()],
            results: vec![],
        };

        ReportGenerator::new().generate_all(&run, &out).unwrap();

        assert!(out.join(RESULTS_FILE).exists());
        assert!(out.join(REPORT_FILE).exists());
        assert_eq!(JsonReporter::new().load(&out.join(RESULTS_FILE)).unwrap(), run);
    }
}
