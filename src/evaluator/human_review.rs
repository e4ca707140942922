//! @ai:module:intent Static HTML review forms for manual rating of generated summaries
//! @ai:module:layer presentation
//! @ai:module:public_api render_review_form, export, review_file_name
//! @ai:module:stateless true

use crate::dataset::TestCase;
use crate::metrics::{EvaluationRun, ReportAggregator};
use crate::runner::generator::{truncate_chars, Summaries};
use anyhow::{Context, Result};
use std::path::Path;

const DIFF_PREVIEW_CHARS: usize = 2000;

/// Name of the aggregate report written next to the forms.
pub const REPORT_FILE: &str = "evaluation_report.md";

/// @ai:intent Escape text for HTML element and attribute content
/// @ai:effects pure
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON string literal safe to embed inside a script element.
fn script_string(text: &str) -> String {
    serde_json::to_string(text)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

/// @ai:intent File name for one result's form; unique per (test case, prompt version)
/// @ai:effects pure
pub fn review_file_name(test_case_id: &str, prompt_version: &str) -> String {
    format!("{test_case_id}_{prompt_version}_evaluation.html")
}

fn rating_select(name: &str, label: &str, options: [&str; 5]) -> String {
    let mut html = format!(
        "        <div class=\"rating\">\n            <label>{label} (1-5):</label>\n            <select name=\"{name}\">\n"
    );
    for (i, text) in options.iter().enumerate() {
        html.push_str(&format!(
            "                <option value=\"{n}\">{n} - {text}</option>\n",
            n = i + 1
        ));
    }
    html.push_str("            </select>\n        </div>\n");
    html
}

const ACCURACY: [&str; 5] = [
    "Very Inaccurate",
    "Mostly Inaccurate",
    "Somewhat Accurate",
    "Mostly Accurate",
    "Very Accurate",
];
const CLARITY: [&str; 5] = [
    "Very Confusing",
    "Somewhat Confusing",
    "Understandable",
    "Clear",
    "Very Clear",
];
const COMPLETENESS: [&str; 5] = [
    "Missing Key Info",
    "Some Key Info Missing",
    "Adequate Coverage",
    "Good Coverage",
    "Comprehensive",
];
const APPEAL: [&str; 5] = [
    "No Appeal",
    "Little Appeal",
    "Some Appeal",
    "Good Appeal",
    "Very Appealing",
];

/// @ai:intent Self-contained HTML document with PR context, both summaries and a local rating form
/// @ai:post every interpolated value is escaped; the form submits nowhere
/// @ai:effects pure
pub fn render_review_form(test_case: &TestCase, summaries: &Summaries) -> String {
    let technical_ratings = [
        rating_select("technical_accuracy", "Accuracy", ACCURACY),
        rating_select("technical_completeness", "Completeness", COMPLETENESS),
        rating_select("technical_clarity", "Clarity", CLARITY),
    ]
    .concat();
    let marketing_ratings = [
        rating_select("marketing_appeal", "Appeal", APPEAL),
        rating_select("marketing_accuracy", "Accuracy", ACCURACY),
        rating_select("marketing_clarity", "Clarity", CLARITY),
    ]
    .concat();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>PR Summary Evaluation</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        .pr-info {{ background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }}
        .summary {{ background: #e8f4f8; padding: 15px; border-radius: 5px; margin: 10px 0; }}
        .evaluation {{ background: #fff; border: 1px solid #ddd; padding: 15px; margin: 10px 0; }}
        .rating {{ margin: 10px 0; }}
        textarea {{ width: 100%; height: 80px; }}
        button {{ background: #007cba; color: white; padding: 10px 20px; border: none; border-radius: 5px; }}
    </style>
</head>
<body>
    <h1>PR Summary Evaluation</h1>

    <div class="pr-info">
        <h3>PR #{number}: {title}</h3>
        <p><strong>Repository:</strong> {repo}</p>
        <p><strong>Author:</strong> {author}</p>
        <p><strong>Category:</strong> {category}</p>
        <p><strong>Difficulty:</strong> {difficulty}</p>
        <p><strong>Labels:</strong> {labels}</p>
        <details>
            <summary>PR Description</summary>
            <pre>{body}</pre>
        </details>
        <details>
            <summary>Diff (first {preview} chars)</summary>
            <pre>{diff}...</pre>
        </details>
    </div>

    <form onsubmit="submitEvaluation(event)">
    <div class="summary">
        <h3>Technical Summary</h3>
        <p>{technical}</p>
    </div>

    <div class="evaluation">
        <h4>Technical Summary Evaluation</h4>
{technical_ratings}        <div>
            <label>Technical Summary Feedback:</label>
            <textarea name="technical_feedback" placeholder="What could be improved?"></textarea>
        </div>
    </div>

    <div class="summary">
        <h3>Marketing Summary</h3>
        <p>{marketing}</p>
    </div>

    <div class="evaluation">
        <h4>Marketing Summary Evaluation</h4>
{marketing_ratings}        <div>
            <label>Marketing Summary Feedback:</label>
            <textarea name="marketing_feedback" placeholder="What could be improved?"></textarea>
        </div>
    </div>

    <div class="evaluation">
        <h4>Overall Assessment</h4>
        <div>
            <label>Overall Comments:</label>
            <textarea name="overall_feedback" placeholder="General feedback about both summaries"></textarea>
        </div>
        <div>
            <label>Evaluator ID:</label>
            <input type="text" name="evaluator_id" placeholder="Your identifier">
        </div>
        <button type="submit">Submit Evaluation</button>
    </div>
    </form>

    <script>
        function submitEvaluation(event) {{
            event.preventDefault();
            const data = new FormData(event.target);
            const evaluation = {{}};
            for (const [key, value] of data.entries()) {{
                evaluation[key] = value;
            }}
            evaluation.test_case_id = {case_id};
            evaluation.timestamp = new Date().toISOString();
            console.log('Evaluation data:', evaluation);
            alert('Evaluation recorded locally (see console)');
        }}
    </script>
</body>
</html>
"#,
        number = test_case.pr_number,
        title = escape_html(&test_case.title),
        repo = escape_html(&test_case.repo),
        author = escape_html(&test_case.author),
        category = test_case.category,
        difficulty = test_case.difficulty,
        labels = escape_html(&test_case.labels.join(", ")),
        body = escape_html(&test_case.body),
        preview = DIFF_PREVIEW_CHARS,
        diff = escape_html(truncate_chars(&test_case.diff, DIFF_PREVIEW_CHARS)),
        technical = escape_html(&summaries.technical),
        marketing = escape_html(&summaries.marketing),
        technical_ratings = technical_ratings,
        marketing_ratings = marketing_ratings,
        case_id = script_string(&test_case.id),
    )
}

/// @ai:intent Write one form per result whose test case is known, plus the aggregate report
/// @ai:post returns the number of forms written; unknown test case ids are skipped
/// @ai:effects fs:write
pub fn export(run: &EvaluationRun, test_cases: &[TestCase], output_dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory {}", output_dir.display()))?;

    let mut written = 0;
    for result in &run.results {
        let Some(test_case) = test_cases.iter().find(|tc| tc.id == result.test_case_id) else {
            tracing::warn!(test_case_id = %result.test_case_id, "Test case not found, skipping review form");
            continue;
        };

        let path = output_dir.join(review_file_name(&result.test_case_id, &result.prompt_version));
        let html = render_review_form(test_case, &result.summaries);
        std::fs::write(&path, html)
            .with_context(|| format!("Failed to write review form {}", path.display()))?;
        written += 1;
    }

    let report_path = output_dir.join(REPORT_FILE);
    std::fs::write(&report_path, ReportAggregator::new().aggregate(run))
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;

    tracing::info!(forms = written, dir = %output_dir.display(), "Evaluation files exported");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Category, Difficulty};
    use crate::evaluator::automated_scorer::AutomatedScores;
    use crate::metrics::{EvaluationMetrics, EvaluationResult, TestCaseMetadata, TypedScores};
    use tempfile::TempDir;

    fn test_case(id: &str) -> TestCase {
        TestCase {
            id: id.to_string(),
            pr_number: 12,
            title: "Escape <b>tags</b> & \"quotes\"".to_string(),
            body: "Body".to_string(),
            diff: "x".repeat(2500),
            author: "octocat".to_string(),
            repo: "acme/widgets".to_string(),
            labels: vec!["bug".to_string(), "ui".to_string()],
            expected_technical: None,
            expected_marketing: None,
            difficulty: Difficulty::Medium,
            category: Category::Bugfix,
        }
    }

    fn scores() -> AutomatedScores {
        AutomatedScores {
            length: 1.0,
            word_count: 1.0,
            readability_score: 1.0,
            keyword_coverage: 0.0,
            diff_relevance: 0.5,
            factual_consistency: 1.0,
        }
    }

    fn result(test_case_id: &str, version: &str) -> EvaluationResult {
        EvaluationResult {
            test_case_id: test_case_id.to_string(),
            prompt_version: version.to_string(),
            summaries: Summaries {
                technical: "Tech <script>".to_string(),
                marketing: "Market".to_string(),
            },
            metrics: EvaluationMetrics::automated(&scores(), &scores(), 0.5, "gpt-4o-mini", version),
            automated_scores: TypedScores {
                technical: scores(),
                marketing: scores(),
            },
            test_case_metadata: TestCaseMetadata {
                difficulty: "medium".to_string(),
                category: "bugfix".to_string(),
                repo: "acme/widgets".to_string(),
            },
            fallback_reason: None,
        }
    }

    #[test]
    fn test_form_escapes_and_truncates() {
        let summaries = Summaries {
            technical: "Tech <script>alert(1)</script>".to_string(),
            marketing: "M & M".to_string(),
        };
        let html = render_review_form(&test_case("pr_12_w"), &summaries);

        assert!(html.contains("PR #12: Escape &lt;b&gt;tags&lt;/b&gt; &amp; &quot;quotes&quot;"));
        assert!(html.contains("Tech &lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("M &amp; M"));
        assert!(html.contains(&format!("<pre>{}...</pre>", "x".repeat(2000))));
        assert!(!html.contains(&"x".repeat(2001)));
        assert!(html.contains("<strong>Labels:</strong> bug, ui"));
        assert_eq!(html.matches("<select").count(), 6);
        assert!(html.contains(r#"evaluation.test_case_id = "pr_12_w";"#));
    }

    #[test]
    fn test_export_writes_forms_and_report() {
        let dir = TempDir::new().unwrap();
        let run = EvaluationRun {
            timestamp: "2024-05-01T00:00:00Z".to_string(),
            test_cases_count: 1,
            prompt_versions: vec!["default".to_string(), "concise".to_string()],
            results: vec![
                result("pr_12_w", "default"),
                result("pr_12_w", "concise"),
                result("pr_99_gone", "default"),
            ],
        };

        let written = export(&run, &[test_case("pr_12_w")], dir.path()).unwrap();

        assert_eq!(written, 2);
        assert!(dir.path().join("pr_12_w_default_evaluation.html").exists());
        assert!(dir.path().join("pr_12_w_concise_evaluation.html").exists());
        assert!(!dir.path().join("pr_99_gone_default_evaluation.html").exists());
        let report = std::fs::read_to_string(dir.path().join(REPORT_FILE)).unwrap();
        assert!(report.contains("# PR Summary Evaluation Report"));
    }
}
