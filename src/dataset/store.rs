//! @ai:module:intent JSON persistence for test case datasets
//! @ai:module:layer infrastructure
//! @ai:module:public_api DatasetFile, save, load
//! @ai:module:stateless true

use crate::dataset::test_case::TestCase;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent On-disk dataset document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    pub created_at: String,
    pub test_cases: Vec<TestCase>,
}

/// @ai:intent Write test cases with a creation timestamp
/// @ai:effects fs:write
pub fn save(test_cases: &[TestCase], path: &Path) -> Result<()> {
    let file = DatasetFile {
        created_at: chrono::Utc::now().to_rfc3339(),
        test_cases: test_cases.to_vec(),
    };
    let json = serde_json::to_string_pretty(&file)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write dataset {}", path.display()))?;

    tracing::info!(count = test_cases.len(), path = %path.display(), "Saved test cases");
    Ok(())
}

/// @ai:intent Read test cases back in stored order
/// @ai:post schema mismatches are errors; semantic invariants are not rechecked
/// @ai:effects fs:read
pub fn load(path: &Path) -> Result<Vec<TestCase>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    let file: DatasetFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset {}", path.display()))?;

    tracing::info!(count = file.test_cases.len(), path = %path.display(), "Loaded test cases");
    Ok(file.test_cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_case::{Category, Difficulty};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn case(n: u64) -> TestCase {
        TestCase {
            id: TestCase::make_id(n, "widgets"),
            pr_number: n,
            title: format!("Fix issue {n}"),
            body: String::new(),
            diff: "diff --git a/a.rs b/a.rs\n+ü\n".to_string(),
            author: "octocat".to_string(),
            repo: "acme/widgets".to_string(),
            labels: vec!["bug".to_string(), "p1".to_string()],
            expected_technical: (n == 2).then(|| "golden".to_string()),
            expected_marketing: None,
            difficulty: Difficulty::Easy,
            category: Category::Bugfix,
        }
    }

    #[test]
    fn test_save_then_load_preserves_records_and_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/test_dataset.json");
        let cases = vec![case(3), case(2), case(1)];

        save(&cases, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, cases);
    }

    #[test]
    fn test_saved_document_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d.json");
        save(&[case(1)], &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["created_at"].is_string());
        assert_eq!(value["test_cases"][0]["id"], "pr_1_widgets");
        assert_eq!(value["test_cases"][0]["category"], "bugfix");
    }

    #[test]
    fn test_load_rejects_wrong_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"cases": []}"#).unwrap();

        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse dataset"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("absent.json")).is_err());
    }
}
