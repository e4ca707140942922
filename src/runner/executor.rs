//! @ai:module:intent Run every (prompt version, test case) pairing and score the output
//! @ai:module:layer application
//! @ai:module:public_api EvaluationRunner
//! @ai:module:stateless false

use crate::dataset::TestCase;
use crate::evaluator::automated_scorer::{AutomatedScorer, SummaryType};
use crate::evaluator::human_review;
use crate::metrics::{EvaluationMetrics, EvaluationResult, EvaluationRun, TestCaseMetadata, TypedScores};
use crate::prompts::PromptVersion;
use crate::runner::client::CompletionClient;
use crate::runner::generator::SummaryGenerator;
use anyhow::Result;
use std::path::Path;
use std::time::Instant;

/// @ai:intent Sequential evaluation over a prompt version x test case matrix
/// @ai:invariant history holds every result produced by this runner, across runs
pub struct EvaluationRunner<C: CompletionClient> {
    generator: SummaryGenerator<C>,
    scorer: AutomatedScorer,
    history: Vec<EvaluationResult>,
}

impl<C: CompletionClient> EvaluationRunner<C> {
    /// @ai:intent Create a runner around a generator
    /// @ai:effects pure
    pub fn new(generator: SummaryGenerator<C>) -> Self {
        Self {
            generator,
            scorer: AutomatedScorer::new(),
            history: Vec::new(),
        }
    }

    pub fn generator(&self) -> &SummaryGenerator<C> {
        &self.generator
    }

    /// Every result produced so far, oldest first.
    pub fn history(&self) -> &[EvaluationResult] {
        &self.history
    }

    /// @ai:intent Evaluate all test cases with all prompt versions
    /// @ai:pre versions are already validated against the catalog
    /// @ai:post results ordered version-major; len == versions.len() * test_cases.len()
    /// @ai:effects network
    pub async fn run(&mut self, test_cases: &[TestCase], versions: &[PromptVersion]) -> EvaluationRun {
        let total = test_cases.len() * versions.len();
        let mut results = Vec::with_capacity(total);
        tracing::info!(
            test_cases = test_cases.len(),
            prompt_versions = versions.len(),
            "Starting evaluation"
        );

        let mut position = 0;
        for &version in versions {
            for test_case in test_cases {
                position += 1;
                tracing::info!(
                    test_case_id = %test_case.id,
                    prompt_version = %version,
                    "[{}/{}] Evaluating {} with {}",
                    position,
                    total,
                    test_case.id,
                    version
                );

                let result = self.evaluate_one(test_case, version).await;
                self.history.push(result.clone());
                results.push(result);
            }
        }

        EvaluationRun {
            timestamp: chrono::Utc::now().to_rfc3339(),
            test_cases_count: test_cases.len(),
            prompt_versions: versions.iter().map(|v| v.as_str().to_string()).collect(),
            results,
        }
    }

    /// @ai:intent Generate, time and score one pairing
    /// @ai:post never fails; a fallback is recorded in fallback_reason
    /// @ai:effects network
    pub async fn evaluate_one(&self, test_case: &TestCase, version: PromptVersion) -> EvaluationResult {
        let start = Instant::now();
        let outcome = self.generator.generate(test_case, version).await;
        let evaluation_time = start.elapsed().as_secs_f64();

        let fallback_reason = outcome.fallback_reason().map(|r| r.to_string());
        let summaries = outcome.into_summaries();

        let technical = self
            .scorer
            .score(&summaries.technical, SummaryType::Technical, test_case);
        let marketing = self
            .scorer
            .score(&summaries.marketing, SummaryType::Marketing, test_case);

        EvaluationResult {
            test_case_id: test_case.id.clone(),
            prompt_version: version.as_str().to_string(),
            metrics: EvaluationMetrics::automated(
                &technical,
                &marketing,
                evaluation_time,
                &self.generator.settings().model,
                version.as_str(),
            ),
            summaries,
            automated_scores: TypedScores {
                technical,
                marketing,
            },
            test_case_metadata: TestCaseMetadata::from(test_case),
            fallback_reason,
        }
    }

    /// @ai:intent Write review forms for a run, resolving results against the given test cases
    /// @ai:post returns number of forms written
    /// @ai:effects fs:write
    pub fn export_for_human_review(
        &self,
        run: &EvaluationRun,
        test_cases: &[TestCase],
        output_dir: &Path,
    ) -> Result<usize> {
        human_review::export(run, test_cases, output_dir)
    }
}
