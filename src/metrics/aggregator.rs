//! @ai:module:intent Per-version and per-category reduction of evaluation results into report text
//! @ai:module:layer application
//! @ai:module:public_api ReportAggregator, VersionStats
//! @ai:module:stateless true

use crate::metrics::types::{EvaluationResult, EvaluationRun};
use std::collections::BTreeSet;
use std::fmt::Write;

/// @ai:intent Means over the results of one prompt version
#[derive(Debug, Clone, PartialEq)]
pub struct VersionStats {
    pub prompt_version: String,
    pub count: usize,
    pub avg_technical_length: f64,
    pub avg_marketing_length: f64,
    pub avg_evaluation_time: f64,
    pub avg_readability: f64,
}

impl VersionStats {
    /// @ai:intent Compute means; None for an empty result set
    /// @ai:effects pure
    pub fn from_results(prompt_version: &str, results: &[&EvaluationResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        Some(Self {
            prompt_version: prompt_version.to_string(),
            count: results.len(),
            avg_technical_length: average(results.iter().map(|r| r.metrics.technical_length)),
            avg_marketing_length: average(results.iter().map(|r| r.metrics.marketing_length)),
            avg_evaluation_time: average(results.iter().map(|r| r.metrics.evaluation_time)),
            avg_readability: average(results.iter().map(|r| r.metrics.average_readability())),
        })
    }

    fn write_lines(&self, out: &mut String) {
        let _ = writeln!(out, "- **Average Technical Length:** {:.1} characters", self.avg_technical_length);
        let _ = writeln!(out, "- **Average Marketing Length:** {:.1} characters", self.avg_marketing_length);
        let _ = writeln!(out, "- **Average Generation Time:** {:.2} seconds", self.avg_evaluation_time);
        let _ = writeln!(out, "- **Average Readability Score:** {:.2}", self.avg_readability);
    }
}

/// @ai:intent Turns runs into Markdown reports
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportAggregator;

impl ReportAggregator {
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Stats for each requested version that has results, in request order
    /// @ai:effects pure
    pub fn version_stats(&self, run: &EvaluationRun) -> Vec<VersionStats> {
        run.prompt_versions
            .iter()
            .filter_map(|version| {
                let results = results_for(&run.results, version);
                VersionStats::from_results(version, &results)
            })
            .collect()
    }

    /// @ai:intent Mean keyword coverage per (category, version), skipping empty pairs
    /// @ai:post categories sorted; versions in request order
    /// @ai:effects pure
    pub fn category_coverage(&self, run: &EvaluationRun) -> Vec<CategoryCoverage> {
        let categories: BTreeSet<&str> = run
            .results
            .iter()
            .map(|r| r.test_case_metadata.category.as_str())
            .collect();

        categories
            .into_iter()
            .map(|category| {
                let in_category: Vec<&EvaluationResult> = run
                    .results
                    .iter()
                    .filter(|r| r.test_case_metadata.category == category)
                    .collect();

                let by_version = run
                    .prompt_versions
                    .iter()
                    .filter_map(|version| {
                        let subset: Vec<f64> = in_category
                            .iter()
                            .filter(|r| &r.prompt_version == version)
                            .map(|r| r.metrics.keyword_coverage)
                            .collect();
                        (!subset.is_empty())
                            .then(|| (version.clone(), average(subset.into_iter())))
                    })
                    .collect();

                CategoryCoverage {
                    category: category.to_string(),
                    count: in_category.len(),
                    by_version,
                }
            })
            .collect()
    }

    /// @ai:intent Markdown report for a single run
    /// @ai:post a version without results gets no section
    /// @ai:effects pure
    pub fn aggregate(&self, run: &EvaluationRun) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# PR Summary Evaluation Report\n");
        let _ = writeln!(out, "**Generated:** {}", run.timestamp);
        let _ = writeln!(out, "**Test Cases:** {}", run.test_cases_count);
        let _ = writeln!(out, "**Prompt Versions:** {}\n", run.prompt_versions.len());
        let _ = writeln!(out, "## Summary Statistics\n");

        for stats in self.version_stats(run) {
            let _ = writeln!(out, "### Prompt Version: {}\n", stats.prompt_version);
            stats.write_lines(&mut out);
            let _ = writeln!(out, "- **Test Cases Processed:** {}\n", stats.count);
        }

        let _ = writeln!(out, "## Results by Category");
        for coverage in self.category_coverage(run) {
            let _ = writeln!(
                out,
                "\n### {} ({} test cases)",
                title_case(&coverage.category),
                coverage.count
            );
            for (version, avg) in &coverage.by_version {
                let _ = writeln!(out, "- **{}:** {:.2} keyword coverage", version, avg);
            }
        }

        out
    }

    /// @ai:intent Pool results across runs by prompt version and report per-version means
    /// @ai:post versions appear in first-seen order; runs need not share test cases
    /// @ai:effects pure
    pub fn compare(&self, runs: &[EvaluationRun]) -> String {
        let mut out = String::from("# Prompt Version Comparison\n");

        for (version, results) in pool_by_version(runs) {
            if let Some(stats) = VersionStats::from_results(version, &results) {
                let _ = writeln!(out, "\n## {} ({} test cases)\n", version, stats.count);
                stats.write_lines(&mut out);
            }
        }

        out
    }
}

/// Per-category coverage breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCoverage {
    pub category: String,
    pub count: usize,
    pub by_version: Vec<(String, f64)>,
}

fn results_for<'a>(results: &'a [EvaluationResult], version: &str) -> Vec<&'a EvaluationResult> {
    results.iter().filter(|r| r.prompt_version == version).collect()
}

/// @ai:intent Group every run's results by prompt version, in first-seen order
/// @ai:effects pure
pub fn pool_by_version(runs: &[EvaluationRun]) -> Vec<(&str, Vec<&EvaluationResult>)> {
    let mut pooled: Vec<(&str, Vec<&EvaluationResult>)> = Vec::new();
    for result in runs.iter().flat_map(|run| run.results.iter()) {
        match pooled.iter_mut().find(|(v, _)| *v == result.prompt_version) {
            Some((_, group)) => group.push(result),
            None => pooled.push((result.prompt_version.as_str(), vec![result])),
        }
    }
    pooled
}

/// @ai:intent Calculate average of an iterator of f64
/// @ai:effects pure
fn average<I: Iterator<Item = f64>>(iter: I) -> f64 {
    let (sum, count) = iter.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Uppercase the first letter of each alphabetic run.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for c in text.chars() {
        if previous_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_alpha = c.is_alphabetic();
    }
    out
}
