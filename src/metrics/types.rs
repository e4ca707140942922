//! @ai:module:intent Evaluation records persisted in results files
//! @ai:module:layer domain
//! @ai:module:public_api EvaluationMetrics, EvaluationResult, EvaluationRun, TypedScores, TestCaseMetadata
//! @ai:module:stateless true

use crate::dataset::TestCase;
use crate::evaluator::automated_scorer::AutomatedScores;
use crate::runner::generator::Summaries;
use serde::{Deserialize, Serialize};

/// @ai:intent Metrics for one (test case, prompt version) pairing
/// @ai:invariant human rating fields are only ever filled by manual review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub technical_length: f64,
    pub marketing_length: f64,
    pub technical_readability_score: f64,
    pub marketing_readability_score: f64,
    pub keyword_coverage: f64,

    // 1-5 ratings from manual review
    #[serde(default)]
    pub technical_accuracy: Option<u8>,
    #[serde(default)]
    pub technical_completeness: Option<u8>,
    #[serde(default)]
    pub technical_clarity: Option<u8>,
    #[serde(default)]
    pub marketing_appeal: Option<u8>,
    #[serde(default)]
    pub marketing_accuracy: Option<u8>,
    #[serde(default)]
    pub marketing_clarity: Option<u8>,
    #[serde(default)]
    pub overall_technical: Option<f64>,
    #[serde(default)]
    pub overall_marketing: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,

    #[serde(default)]
    pub evaluation_time: f64,
    #[serde(default)]
    pub model_used: String,
    #[serde(default)]
    pub prompt_version: String,
    #[serde(default)]
    pub evaluator_id: String,
}

impl EvaluationMetrics {
    /// @ai:intent Metrics with only the automated fields populated
    /// @ai:post keyword_coverage is the mean of both summary types
    /// @ai:effects pure
    pub fn automated(
        technical: &AutomatedScores,
        marketing: &AutomatedScores,
        evaluation_time: f64,
        model_used: &str,
        prompt_version: &str,
    ) -> Self {
        Self {
            technical_length: technical.length,
            marketing_length: marketing.length,
            technical_readability_score: technical.readability_score,
            marketing_readability_score: marketing.readability_score,
            keyword_coverage: (technical.keyword_coverage + marketing.keyword_coverage) / 2.0,
            technical_accuracy: None,
            technical_completeness: None,
            technical_clarity: None,
            marketing_appeal: None,
            marketing_accuracy: None,
            marketing_clarity: None,
            overall_technical: None,
            overall_marketing: None,
            feedback: None,
            evaluation_time,
            model_used: model_used.to_string(),
            prompt_version: prompt_version.to_string(),
            evaluator_id: String::new(),
        }
    }

    pub fn average_readability(&self) -> f64 {
        (self.technical_readability_score + self.marketing_readability_score) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedScores {
    pub technical: AutomatedScores,
    pub marketing: AutomatedScores,
}

/// Denormalized test case fields kept for grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseMetadata {
    pub difficulty: String,
    pub category: String,
    pub repo: String,
}

impl From<&TestCase> for TestCaseMetadata {
    fn from(case: &TestCase) -> Self {
        Self {
            difficulty: case.difficulty.to_string(),
            category: case.category.to_string(),
            repo: case.repo.clone(),
        }
    }
}

/// @ai:intent One generated summary pair with its scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub test_case_id: String,
    pub prompt_version: String,
    pub summaries: Summaries,
    pub metrics: EvaluationMetrics,
    pub automated_scores: TypedScores,
    pub test_case_metadata: TestCaseMetadata,
    /// Present only when generation fell back to the default pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// @ai:intent A complete evaluation run; the unit written to a results file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRun {
    pub timestamp: String,
    pub test_cases_count: usize,
    pub prompt_versions: Vec<String>,
    pub results: Vec<EvaluationResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_RESULT: &str = r#"{
        "test_case_id": "pr_1_w",
        "prompt_version": "default",
        "summaries": {"technical": "T", "marketing": "M"},
        "metrics": {
            "technical_length": 1.0,
            "marketing_length": 1.0,
            "technical_readability_score": 0.8,
            "marketing_readability_score": 1.0,
            "keyword_coverage": 0.1,
            "technical_accuracy": 4,
            "evaluation_time": 1.5,
            "model_used": "gpt-4o-mini",
            "prompt_version": "default",
            "evaluator_id": ""
        },
        "automated_scores": {
            "technical": {"length": 1.0, "word_count": 1.0, "readability_score": 0.8,
                          "keyword_coverage": 0.0, "diff_relevance": 0.5, "factual_consistency": 1.0},
            "marketing": {"length": 1.0, "word_count": 1.0, "readability_score": 1.0,
                          "keyword_coverage": 0.2, "diff_relevance": 0.5, "factual_consistency": 1.0}
        },
        "test_case_metadata": {"difficulty": "easy", "category": "feature", "repo": "acme/w"}
    }"#;

    #[test]
    fn test_reads_result_without_optional_fields() {
        let result: EvaluationResult = serde_json::from_str(LEGACY_RESULT).unwrap();

        assert_eq!(result.metrics.technical_accuracy, Some(4));
        assert_eq!(result.metrics.marketing_clarity, None);
        assert!(result.fallback_reason.is_none());
        assert!((result.metrics.average_readability() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_reason_written_only_when_present() {
        let mut result: EvaluationResult = serde_json::from_str(LEGACY_RESULT).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("fallback_reason").is_none());

        result.fallback_reason = Some("Response missing required keys".to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["fallback_reason"], "Response missing required keys");
    }

    #[test]
    fn test_automated_metrics_average_keyword_coverage() {
        let result: EvaluationResult = serde_json::from_str(LEGACY_RESULT).unwrap();
        let metrics = EvaluationMetrics::automated(
            &result.automated_scores.technical,
            &result.automated_scores.marketing,
            2.0,
            "gpt-4",
            "concise",
        );

        assert!((metrics.keyword_coverage - 0.1).abs() < 1e-9);
        assert_eq!(metrics.technical_accuracy, None);
        assert_eq!(metrics.prompt_version, "concise");
        assert_eq!(metrics.evaluator_id, "");
    }
}
