use pr_summary::config::ApiConfig;
use pr_summary::dataset::{self, Category, DatasetBuilder, Difficulty};
use pr_summary::evaluator::human_review;
use pr_summary::github::{MockPullRequestSource, PullRequest};
use pr_summary::metrics::ReportAggregator;
use pr_summary::prompts::PromptVersion;
use pr_summary::report::{collect_result_files, JsonReporter, ReportGenerator, RESULTS_FILE};
use pr_summary::runner::{EvaluationRunner, MockCompletionClient, SummaryGenerator};
use tempfile::TempDir;

const DARK_MODE_DIFF: &str = "diff --git a/src/theme.css b/src/theme.css
new file mode 100644
--- /dev/null
+++ b/src/theme.css
@@ -0,0 +1,4 @@
+/* class Settings */
+.dark { background: #111; }
+.dark .toggle { color: #eee; }
+.light { background: #fff; }
";

const REPLY: &str = r#"{"technical":"Added a dark mode toggle to settings using a new CSS class.","marketing":"Users can now switch to dark mode for a better visual experience."}"#;

fn dark_mode_pr() -> PullRequest {
    serde_json::from_value(serde_json::json!({
        "number": 101,
        "title": "Add dark mode toggle",
        "body": "Implements a dark mode switch in settings",
        "user": {"login": "octocat"},
        "merged_at": "2024-05-01T10:00:00Z",
        "merged": true,
        "labels": [{"name": "feature"}],
        "base": {"ref": "main", "repo": {"name": "widgets", "full_name": "acme/widgets"}},
        "head": {"ref": "dark-mode"},
        "html_url": "https://github.com/acme/widgets/pull/101"
    }))
    .unwrap()
}

#[tokio::test]
async fn dark_mode_pull_request_end_to_end() {
    let temp = TempDir::new().unwrap();

    // Dataset
    let source = MockPullRequestSource::new().with_pull_request(dark_mode_pr(), Some(DARK_MODE_DIFF));
    let test_cases = DatasetBuilder::new(source)
        .build("acme/widgets", 10, Some(&[101][..]))
        .await;
    assert_eq!(test_cases.len(), 1);
    assert_eq!(test_cases[0].id, "pr_101_widgets");
    assert_eq!(test_cases[0].category, Category::Feature);
    assert_eq!(test_cases[0].difficulty, Difficulty::Easy);

    let dataset_path = temp.path().join("test_dataset.json");
    dataset::save(&test_cases, &dataset_path).unwrap();
    let reloaded = dataset::load(&dataset_path).unwrap();
    assert_eq!(reloaded, test_cases);

    // Evaluation
    let generator = SummaryGenerator::new(MockCompletionClient::new(REPLY), ApiConfig::default());
    let mut runner = EvaluationRunner::new(generator);
    let run = runner.run(&reloaded, &[PromptVersion::Default]).await;

    assert_eq!(run.results.len(), 1);
    let result = &run.results[0];
    assert!(result.fallback_reason.is_none());
    assert_eq!(result.test_case_metadata.category, "feature");
    assert!(result.automated_scores.technical.diff_relevance > 0.0);
    assert_eq!(result.automated_scores.technical.factual_consistency, 1.0);
    assert_eq!(result.automated_scores.marketing.factual_consistency, 1.0);

    // Reports
    let output = temp.path().join("evaluation_results");
    ReportGenerator::new().generate_all(&run, &output).unwrap();
    let report = std::fs::read_to_string(output.join(human_review::REPORT_FILE)).unwrap();
    assert!(report.contains("### Prompt Version: default"));
    assert!(report.contains("### Feature (1 test cases)"));

    let files = collect_result_files(&[temp.path().to_path_buf()]);
    assert_eq!(files, vec![output.join(RESULTS_FILE)]);
    let loaded = JsonReporter::new().load(&files[0]).unwrap();
    assert_eq!(loaded, run);

    let comparison = ReportAggregator::new().compare(&[loaded.clone(), loaded]);
    assert!(comparison.contains("## default (2 test cases)"));

    // Human review
    let review_dir = output.join("human_evaluation");
    let written = runner
        .export_for_human_review(&run, &reloaded, &review_dir)
        .unwrap();
    assert_eq!(written, 1);
    let form = std::fs::read_to_string(review_dir.join("pr_101_widgets_default_evaluation.html")).unwrap();
    assert!(form.contains("Add dark mode toggle"));
}

#[tokio::test]
async fn malformed_completions_fall_back_for_every_version() {
    let source = MockPullRequestSource::new().with_pull_request(dark_mode_pr(), None);
    let test_cases = DatasetBuilder::new(source).build("acme/widgets", 5, None).await;
    assert_eq!(test_cases.len(), 1);
    assert!(test_cases[0].diff.is_empty());

    let generator = SummaryGenerator::new(
        MockCompletionClient::new("Sorry, I can only answer in prose."),
        ApiConfig::default(),
    );
    let mut runner = EvaluationRunner::new(generator);
    let run = runner
        .run(&test_cases, &[PromptVersion::Concise, PromptVersion::BulletPoints])
        .await;

    assert_eq!(run.results.len(), 2);
    for result in &run.results {
        assert_eq!(result.summaries.technical, "Add dark mode toggle");
        assert_eq!(result.summaries.marketing, "Improvements and updates");
        assert!(result.fallback_reason.is_some());
        assert_eq!(result.automated_scores.technical.diff_relevance, 0.0);
    }
}
