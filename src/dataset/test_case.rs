//! @ai:module:intent Test case model with difficulty and category inference
//! @ai:module:layer domain
//! @ai:module:public_api TestCase, Difficulty, Category, classify_difficulty, classify_category
//! @ai:module:stateless true

use crate::github::PullRequest;
use anyhow::Result;
use serde::{Deserialize, Serialize};

const FILE_HEADER_MARKER: &str = "diff --git";

/// @ai:intent Rough size class of a pull request
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Kind of change a pull request makes
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bugfix,
    Feature,
    Refactor,
    Docs,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bugfix => "bugfix",
            Category::Feature => "feature",
            Category::Refactor => "refactor",
            Category::Docs => "docs",
            Category::General => "general",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label vocabulary per category, matched exactly after lowercasing. Checked in order.
const LABEL_RULES: [(Category, &[&str]); 4] = [
    (Category::Bugfix, &["bug", "bugfix", "fix"]),
    (Category::Feature, &["feature", "enhancement"]),
    (Category::Refactor, &["refactor", "refactoring"]),
    (Category::Docs, &["docs", "documentation"]),
];

/// Title keywords per category, matched as substrings of the lowercased title. Checked in order.
const TITLE_RULES: [(Category, &[&str]); 4] = [
    (Category::Bugfix, &["fix", "bug", "error", "issue"]),
    (Category::Feature, &["add", "feature", "implement", "new"]),
    (Category::Refactor, &["refactor", "cleanup", "improve"]),
    (Category::Docs, &["doc", "readme", "comment"]),
];

/// @ai:intent Classify size from newline count and file-header count of a unified diff
/// @ai:post monotonic in both counts
/// @ai:effects pure
pub fn classify_difficulty(diff: &str) -> Difficulty {
    let lines_changed = diff.matches('\n').count();
    let files_changed = diff.matches(FILE_HEADER_MARKER).count();

    if lines_changed > 500 || files_changed > 10 {
        Difficulty::Hard
    } else if lines_changed > 100 || files_changed > 3 {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    }
}

/// @ai:intent Classify change kind: labels first, then title keywords, else general
/// @ai:effects pure
pub fn classify_category(title: &str, labels: &[String]) -> Category {
    let labels: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();
    for (category, vocabulary) in LABEL_RULES {
        if labels.iter().any(|l| vocabulary.contains(&l.as_str())) {
            return category;
        }
    }

    let title = title.to_lowercase();
    for (category, keywords) in TITLE_RULES {
        if keywords.iter().any(|k| title.contains(k)) {
            return category;
        }
    }

    Category::General
}

/// @ai:intent One historical pull request used as evaluation input
/// @ai:invariant id is derived from (pr_number, repository name) only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub pr_number: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub diff: String,
    pub author: String,
    pub repo: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub expected_technical: Option<String>,
    #[serde(default)]
    pub expected_marketing: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default = "default_category")]
    pub category: Category,
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

fn default_category() -> Category {
    Category::General
}

impl TestCase {
    /// @ai:intent Stable identifier for a pull request in a repository
    /// @ai:effects pure
    pub fn make_id(pr_number: u64, repo_name: &str) -> String {
        format!("pr_{pr_number}_{repo_name}")
    }

    /// @ai:intent Build a test case from upstream pull request data and its diff
    /// @ai:pre pr.base.repo is present
    /// @ai:effects pure
    pub fn from_pull_request(pr: &PullRequest, diff: String) -> Result<Self> {
        let Some(base_repo) = pr.base.repo.as_ref() else {
            anyhow::bail!("Pull request #{} has no base repository", pr.number);
        };
        let labels = pr.label_names();

        Ok(Self {
            id: Self::make_id(pr.number, &base_repo.name),
            pr_number: pr.number,
            title: pr.title.clone(),
            body: pr.body.clone().unwrap_or_default(),
            difficulty: classify_difficulty(&diff),
            category: classify_category(&pr.title, &labels),
            diff,
            author: pr.user.login.clone(),
            repo: base_repo.full_name.clone(),
            labels,
            expected_technical: None,
            expected_marketing: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::fixtures::pull_request;
    use crate::github::Label;
    use pretty_assertions::assert_eq;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_difficulty_thresholds() {
        assert_eq!(classify_difficulty(""), Difficulty::Easy);
        assert_eq!(classify_difficulty(&"x\n".repeat(100)), Difficulty::Easy);
        assert_eq!(classify_difficulty(&"x\n".repeat(101)), Difficulty::Medium);
        assert_eq!(classify_difficulty(&"x\n".repeat(500)), Difficulty::Medium);
        assert_eq!(classify_difficulty(&"x\n".repeat(501)), Difficulty::Hard);

        assert_eq!(classify_difficulty(&"diff --git ".repeat(3)), Difficulty::Easy);
        assert_eq!(classify_difficulty(&"diff --git ".repeat(4)), Difficulty::Medium);
        assert_eq!(classify_difficulty(&"diff --git ".repeat(11)), Difficulty::Hard);
    }

    #[test]
    fn test_difficulty_is_monotonic() {
        let mut diff = String::new();
        let mut previous = classify_difficulty(&diff);
        for i in 0..700 {
            if i % 40 == 0 {
                diff.push_str("diff --git a/f b/f");
            }
            diff.push_str("+line\n");
            let current = classify_difficulty(&diff);
            assert!(current >= previous, "difficulty dropped at step {i}");
            previous = current;
        }
        assert_eq!(previous, Difficulty::Hard);
    }

    #[test]
    fn test_category_label_beats_title() {
        assert_eq!(
            classify_category("Fix typo in README", &labels(&["Documentation"])),
            Category::Docs
        );
        assert_eq!(
            classify_category("whatever", &labels(&["enhancement", "bug"])),
            Category::Bugfix
        );
    }

    #[test]
    fn test_category_labels_match_exactly() {
        assert_eq!(
            classify_category("Tune settings", &labels(&["bug-report"])),
            Category::General
        );
    }

    #[test]
    fn test_category_title_precedence() {
        assert_eq!(
            classify_category("Fix bug in refactor of auth", &[]),
            Category::Bugfix
        );
        assert_eq!(classify_category("Implement OAuth", &[]), Category::Feature);
        assert_eq!(classify_category("Cleanup imports", &[]), Category::Refactor);
        assert_eq!(classify_category("Update README", &[]), Category::Docs);
        assert_eq!(classify_category("Bump version", &[]), Category::General);
    }

    #[test]
    fn test_from_pull_request() {
        let mut pr = pull_request(42, "Add dark mode toggle", true);
        pr.body = None;
        pr.labels = vec![Label {
            name: "feature".to_string(),
        }];

        let case = TestCase::from_pull_request(&pr, "diff --git a/a.css b/a.css\n".to_string())
            .unwrap();

        assert_eq!(case.id, "pr_42_widgets");
        assert_eq!(case.repo, "acme/widgets");
        assert_eq!(case.author, "octocat");
        assert_eq!(case.body, "");
        assert_eq!(case.labels, vec!["feature".to_string()]);
        assert_eq!(case.category, Category::Feature);
        assert_eq!(case.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_from_pull_request_without_base_repo() {
        let mut pr = pull_request(1, "x", true);
        pr.base.repo = None;
        assert!(TestCase::from_pull_request(&pr, String::new()).is_err());
    }

    #[test]
    fn test_record_serializes_optional_fields_as_null() {
        let pr = pull_request(3, "Refactor parser", true);
        let case = TestCase::from_pull_request(&pr, String::new()).unwrap();
        let value = serde_json::to_value(&case).unwrap();

        assert_eq!(value["expected_technical"], serde_json::Value::Null);
        assert_eq!(value["difficulty"], "easy");
        assert_eq!(value["category"], "refactor");
    }
}
