//! @ai:module:intent Heuristic scoring of generated summaries without any model call
//! @ai:module:layer application
//! @ai:module:public_api AutomatedScorer, AutomatedScores, SummaryType
//! @ai:module:stateless true

use crate::dataset::TestCase;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const TECHNICAL_KEYWORDS: [&str; 17] = [
    "function",
    "method",
    "class",
    "variable",
    "api",
    "endpoint",
    "database",
    "query",
    "algorithm",
    "implementation",
    "architecture",
    "performance",
    "optimization",
    "refactor",
    "bug",
    "fix",
    "test",
];

pub const MARKETING_KEYWORDS: [&str; 16] = [
    "user",
    "customer",
    "experience",
    "improve",
    "better",
    "faster",
    "easier",
    "new",
    "feature",
    "benefit",
    "value",
    "quality",
    "performance",
    "reliable",
    "secure",
    "efficient",
];

/// @ai:intent Audience a summary is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    Technical,
    Marketing,
}

impl SummaryType {
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            SummaryType::Technical => &TECHNICAL_KEYWORDS,
            SummaryType::Marketing => &MARKETING_KEYWORDS,
        }
    }
}

/// @ai:intent Independent heuristic scores for one summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutomatedScores {
    pub length: f64,
    pub word_count: f64,
    pub readability_score: f64,
    pub keyword_coverage: f64,
    pub diff_relevance: f64,
    pub factual_consistency: f64,
}

/// @ai:intent Scores summaries against fixed vocabularies and the test case diff
pub struct AutomatedScorer {
    added_file_regex: Regex,
    identifier_regex: Regex,
}

impl AutomatedScorer {
    /// @ai:intent Create a new scorer
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            added_file_regex: Regex::new(r"\+\+\+ b/(.+)").expect("static pattern"),
            identifier_regex: Regex::new(r"def (\w+)|function (\w+)|class (\w+)")
                .expect("static pattern"),
        }
    }

    /// @ai:intent Compute every score for one summary
    /// @ai:effects pure
    pub fn score(&self, summary: &str, summary_type: SummaryType, test_case: &TestCase) -> AutomatedScores {
        AutomatedScores {
            length: summary.chars().count() as f64,
            word_count: summary.split_whitespace().count() as f64,
            readability_score: readability(summary),
            keyword_coverage: keyword_coverage(summary, summary_type.keywords()),
            diff_relevance: self.diff_relevance(summary, &test_case.diff),
            factual_consistency: factual_consistency(summary, &test_case.diff),
        }
    }

    /// @ai:intent Fraction of diff tokens (file extensions, defined names) the summary mentions
    /// @ai:post 0.0 for an empty diff; 0.5 when the diff yields no tokens
    /// @ai:effects pure
    pub fn diff_relevance(&self, summary: &str, diff: &str) -> f64 {
        if diff.is_empty() {
            return 0.0;
        }

        let tokens = self.diff_tokens(diff);
        if tokens.is_empty() {
            return 0.5;
        }

        let summary_lower = summary.to_lowercase();
        let mentioned = tokens.iter().filter(|t| summary_lower.contains(t.as_str())).count();
        mentioned as f64 / tokens.len() as f64
    }

    /// @ai:intent Lowercased extensions of added-file paths and identifiers after def/function/class
    /// @ai:effects pure
    pub fn diff_tokens(&self, diff: &str) -> BTreeSet<String> {
        let mut tokens = BTreeSet::new();

        for cap in self.added_file_regex.captures_iter(diff) {
            let path = &cap[1];
            if let Some((_, ext)) = path.rsplit_once('.') {
                tokens.insert(ext.to_lowercase());
            }
        }

        for cap in self.identifier_regex.captures_iter(diff) {
            for name in cap.iter().skip(1).flatten() {
                tokens.insert(name.as_str().to_lowercase());
            }
        }

        tokens
    }
}

impl Default for AutomatedScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Sentence-length proxy: 1.0 in [10, 25] words per sentence, 0.8 below, decaying above
/// @ai:effects pure
pub fn readability(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let sentences = text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count().max(1);
    let words = text.split_whitespace().count();
    let avg = words as f64 / sentences as f64;

    if (10.0..=25.0).contains(&avg) {
        1.0
    } else if avg < 10.0 {
        0.8
    } else {
        (1.0 - (avg - 25.0) / 50.0).max(0.2)
    }
}

/// @ai:intent Fraction of keywords present as case-insensitive substrings
/// @ai:effects pure
pub fn keyword_coverage(summary: &str, keywords: &[&str]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let summary_lower = summary.to_lowercase();
    let found = keywords.iter().filter(|k| summary_lower.contains(*k)).count();
    found as f64 / keywords.len() as f64
}

/// @ai:intent Penalize a python mention without any .py in the diff, and "add" on a removal-heavy diff
/// @ai:post within [0.0, 1.0]
/// @ai:effects pure
pub fn factual_consistency(summary: &str, diff: &str) -> f64 {
    let summary_lower = summary.to_lowercase();
    let mut score: f64 = 1.0;

    if summary_lower.contains("python") && !diff.contains(".py") {
        score -= 0.2;
    }

    if summary_lower.contains("add") && diff.matches("---").count() > diff.matches("+++").count() {
        score -= 0.1;
    }

    score.max(0.0)
}
