//! @ai:module:intent Evaluation results file persistence
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter, RESULTS_FILE, collect_result_files
//! @ai:module:stateless true

use crate::metrics::EvaluationRun;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name used for a run's results inside an output directory.
pub const RESULTS_FILE: &str = "evaluation_results.json";

/// @ai:intent Reads and writes evaluation runs as pretty JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Write a run to `path`, creating parent directories
    /// @ai:effects fs:write
    pub fn save(&self, run: &EvaluationRun, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(run)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write results file {}", path.display()))?;

        tracing::info!(path = %path.display(), results = run.results.len(), "Results saved");
        Ok(())
    }

    /// @ai:intent Load a run previously written by `save`
    /// @ai:post schema errors are fatal and carry the path
    /// @ai:effects fs:read
    pub fn load(&self, path: &Path) -> Result<EvaluationRun> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read results file {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse results file {}", path.display()))
    }
}

/// @ai:intent Expand files and directories into a sorted list of results files
/// @ai:post directories contribute every nested RESULTS_FILE; files are kept as given
/// @ai:effects fs:read
pub fn collect_result_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && e.file_name() == RESULTS_FILE)
                .map(|e| e.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn empty_run(versions: &[&str]) -> EvaluationRun {
        EvaluationRun {
            timestamp: "2024-05-01T00:00:00+00:00".to_string(),
            test_cases_count: 0,
            prompt_versions: versions.iter().map(|v| v.to_string()).collect(),
            results: vec![],
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/out").join(RESULTS_FILE);
        let reporter = JsonReporter::new();
        let run = empty_run(&["default", "concise"]);

        reporter.save(&run, &path).unwrap();
        let loaded = reporter.load(&path).unwrap();

        assert_eq!(loaded, run);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"test_cases_count\": 0"));
    }

    #[test]
    fn test_load_malformed_file_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        std::fs::write(&path, r#"{"timestamp": "x"}"#).unwrap();

        let err = JsonReporter::new().load(&path).unwrap_err();

        assert!(format!("{err:#}").contains("broken.json"));
    }

    #[test]
    fn test_collect_result_files_walks_directories() {
        let temp = TempDir::new().unwrap();
        let reporter = JsonReporter::new();
        reporter
            .save(&empty_run(&["default"]), &temp.path().join("a").join(RESULTS_FILE))
            .unwrap();
        reporter
            .save(&empty_run(&["concise"]), &temp.path().join("b/deep").join(RESULTS_FILE))
            .unwrap();
        std::fs::write(temp.path().join("a/other.json"), "{}").unwrap();
        let explicit = temp.path().join("explicit.json");

        let files = collect_result_files(&[temp.path().to_path_buf(), explicit.clone()]);

        assert_eq!(
            files,
            vec![
                temp.path().join("a").join(RESULTS_FILE),
                temp.path().join("b/deep").join(RESULTS_FILE),
                explicit,
            ]
        );
    }
}
