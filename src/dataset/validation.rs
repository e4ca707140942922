//! @ai:module:intent Sanity checks and breakdowns over a loaded dataset
//! @ai:module:layer domain
//! @ai:module:public_api DatasetIssue, IssueKind, Breakdown, find_issues
//! @ai:module:stateless true

use crate::dataset::test_case::{Category, Difficulty, TestCase};
use std::collections::BTreeMap;

const MIN_DIFF_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    MissingTitle,
    MissingDiff,
    DiffTooShort(usize),
    MissingAuthor,
}

/// @ai:intent A problem found in one test case, by dataset position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetIssue {
    pub index: usize,
    pub kind: IssueKind,
}

impl std::fmt::Display for DatasetIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Test case {}: ", self.index)?;
        match self.kind {
            IssueKind::MissingTitle => write!(f, "Missing title"),
            IssueKind::MissingDiff => write!(f, "Missing diff"),
            IssueKind::DiffTooShort(len) => write!(f, "Diff too short ({len} chars)"),
            IssueKind::MissingAuthor => write!(f, "Missing author"),
        }
    }
}

/// @ai:intent List every issue; an empty diff reports both missing and too short
/// @ai:effects pure
pub fn find_issues(test_cases: &[TestCase]) -> Vec<DatasetIssue> {
    let mut issues = Vec::new();
    for (index, case) in test_cases.iter().enumerate() {
        let mut push = |kind| issues.push(DatasetIssue { index, kind });

        if case.title.is_empty() {
            push(IssueKind::MissingTitle);
        }
        if case.diff.is_empty() {
            push(IssueKind::MissingDiff);
        }
        let diff_chars = case.diff.chars().count();
        if diff_chars < MIN_DIFF_CHARS {
            push(IssueKind::DiffTooShort(diff_chars));
        }
        if case.author.is_empty() {
            push(IssueKind::MissingAuthor);
        }
    }
    issues
}

/// @ai:intent Counts per category and per difficulty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breakdown {
    pub categories: BTreeMap<Category, usize>,
    pub difficulties: BTreeMap<Difficulty, usize>,
}

impl Breakdown {
    /// @ai:effects pure
    pub fn of(test_cases: &[TestCase]) -> Self {
        let mut breakdown = Self::default();
        for case in test_cases {
            *breakdown.categories.entry(case.category).or_default() += 1;
            *breakdown.difficulties.entry(case.difficulty).or_default() += 1;
        }
        breakdown
    }
}

fn join_counts<K: std::fmt::Display>(counts: &BTreeMap<K, usize>) -> String {
    counts
        .iter()
        .map(|(k, n)| format!("{k}: {n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl std::fmt::Display for Breakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Categories: {}", join_counts(&self.categories))?;
        write!(f, "Difficulties: {}", join_counts(&self.difficulties))
    }
}
