//! @ai:module:intent Build test cases from merged pull requests
//! @ai:module:layer application
//! @ai:module:public_api DatasetBuilder
//! @ai:module:stateless true

use crate::dataset::test_case::TestCase;
use crate::github::{PullRequest, PullRequestSource};

const MAX_PAGE_SIZE: usize = 100;

/// @ai:intent Turns upstream pull requests into test cases
/// @ai:effects network (through the source)
pub struct DatasetBuilder<S: PullRequestSource> {
    source: S,
}

impl<S: PullRequestSource> DatasetBuilder<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// @ai:intent Build test cases by explicit numbers or, if none are given, by recency
    /// @ai:post never fails; per-PR problems are logged and skipped
    /// @ai:effects network
    pub async fn build(&self, repo: &str, limit: usize, pr_numbers: Option<&[u64]>) -> Vec<TestCase> {
        match pr_numbers {
            Some(numbers) if !numbers.is_empty() => self.build_explicit(repo, numbers).await,
            _ => self.build_recent(repo, limit).await,
        }
    }

    async fn build_explicit(&self, repo: &str, numbers: &[u64]) -> Vec<TestCase> {
        tracing::info!(repo, ?numbers, "Fetching specific pull requests");
        let mut test_cases = Vec::with_capacity(numbers.len());

        for &number in numbers {
            let pr = match self.source.get(repo, number).await {
                Ok(pr) => pr,
                Err(e) => {
                    tracing::error!(repo, pr_number = number, "Failed to fetch PR #{}: {:#}", number, e);
                    continue;
                }
            };

            if !pr.is_merged() {
                tracing::warn!(repo, pr_number = number, "PR #{} was not merged, skipping", number);
                continue;
            }

            if let Some(case) = self.admit(repo, &pr).await {
                test_cases.push(case);
            }
        }

        test_cases
    }

    async fn build_recent(&self, repo: &str, limit: usize) -> Vec<TestCase> {
        if limit == 0 {
            return Vec::new();
        }

        let per_page = limit.min(MAX_PAGE_SIZE);
        let mut merged: Vec<PullRequest> = Vec::with_capacity(limit);
        let mut page = 1;

        while merged.len() < limit {
            let batch = match self.source.list_closed(repo, per_page, page).await {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::error!(repo, page, "Failed to fetch PRs: {:#}", e);
                    return Vec::new();
                }
            };
            // Page size is judged on what upstream served, before malformed entries were dropped.
            let exhausted = batch.is_last(per_page);

            merged.extend(batch.pulls.into_iter().filter(PullRequest::is_merged));
            if exhausted {
                break;
            }
            page += 1;
        }
        merged.truncate(limit);
        tracing::info!(repo, count = merged.len(), "Found merged PRs");

        let mut test_cases = Vec::with_capacity(merged.len());
        for pr in &merged {
            if let Some(case) = self.admit(repo, pr).await {
                test_cases.push(case);
            }
        }
        test_cases
    }

    /// Diff failures degrade to an empty diff; conversion failures skip the PR.
    async fn admit(&self, repo: &str, pr: &PullRequest) -> Option<TestCase> {
        let diff = match self.source.diff(repo, pr.number).await {
            Ok(diff) => diff,
            Err(e) => {
                tracing::error!(repo, pr_number = pr.number, "Failed to fetch PR diff: {:#}", e);
                String::new()
            }
        };

        match TestCase::from_pull_request(pr, diff) {
            Ok(case) => {
                tracing::info!(test_case_id = %case.id, "Added test case");
                Some(case)
            }
            Err(e) => {
                tracing::error!(repo, pr_number = pr.number, "Failed to process PR #{}: {:#}", pr.number, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_case::Category;
    use crate::github::types::fixtures::pull_request;
    use crate::github::{GitHubClient, MockPullRequestSource};
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn ids(cases: &[TestCase]) -> Vec<u64> {
        cases.iter().map(|c| c.pr_number).collect()
    }

    #[tokio::test]
    async fn test_recent_mode_filters_merged_and_limits() {
        let source = MockPullRequestSource::new()
            .with_pull_request(pull_request(10, "Fix login", true), Some("+a\n"))
            .with_pull_request(pull_request(9, "Closed unmerged", false), Some("+b\n"))
            .with_pull_request(pull_request(8, "Add search", true), Some("+c\n"))
            .with_pull_request(pull_request(7, "Docs", true), Some("+d\n"));

        let builder = DatasetBuilder::new(source);
        let cases = builder.build("acme/widgets", 2, None).await;

        assert_eq!(ids(&cases), vec![10, 8]);
        assert_eq!(cases[1].category, Category::Feature);
    }

    #[tokio::test]
    async fn test_recent_mode_walks_pages() {
        let source = (1..=250).fold(MockPullRequestSource::new(), |s, n| {
            s.with_pull_request(pull_request(n, "Tune", n % 2 == 0), Some("+x\n"))
        });

        let cases = DatasetBuilder::new(source).build("acme/widgets", 120, None).await;

        assert_eq!(cases.len(), 120);
        assert!(cases.iter().all(|c| c.pr_number % 2 == 0));
    }

    #[tokio::test]
    async fn test_recent_mode_list_failure_returns_empty() {
        let source = MockPullRequestSource::new()
            .with_pull_request(pull_request(1, "Fix", true), None)
            .failing_listing();

        let cases = DatasetBuilder::new(source).build("acme/widgets", 5, None).await;
        assert!(cases.is_empty());
    }

    #[tokio::test]
    async fn test_explicit_mode_skips_unmerged_and_missing() {
        let source = MockPullRequestSource::new()
            .with_pull_request(pull_request(1, "Fix crash", true), Some("+fix\n"))
            .with_pull_request(pull_request(2, "Abandoned", false), Some("+x\n"));

        let cases = DatasetBuilder::new(source)
            .build("acme/widgets", 50, Some(&[2, 404, 1]))
            .await;

        assert_eq!(ids(&cases), vec![1]);
        assert_eq!(cases[0].diff, "+fix\n");
    }

    #[tokio::test]
    async fn test_diff_failure_keeps_test_case() {
        let source =
            MockPullRequestSource::new().with_pull_request(pull_request(3, "Add x", true), None);

        let cases = DatasetBuilder::new(source).build("acme/widgets", 1, Some(&[3])).await;

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].diff, "");
    }

    #[tokio::test]
    async fn test_conversion_failure_skips_only_that_pr() {
        let mut orphan = pull_request(4, "Orphan", true);
        orphan.base.repo = None;
        let source = MockPullRequestSource::new()
            .with_pull_request(orphan, Some("+x\n"))
            .with_pull_request(pull_request(5, "Kept", true), Some("+y\n"));

        let cases = DatasetBuilder::new(source).build("acme/widgets", 10, None).await;
        assert_eq!(ids(&cases), vec![5]);
    }

    #[tokio::test]
    async fn test_malformed_entries_do_not_end_pagination() {
        let server = MockServer::start().await;
        let pr = |n: u64| serde_json::to_value(pull_request(n, "Tune", true)).unwrap();

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/repos/acme/widgets/pulls"))
            .and(matchers::query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                pr(10),
                {"number": "bad"},
                pr(8)
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/repos/acme/widgets/pulls"))
            .and(matchers::query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([pr(7)])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri(), "t").unwrap();
        let cases = DatasetBuilder::new(client).build("acme/widgets", 3, None).await;

        assert_eq!(ids(&cases), vec![10, 8, 7]);
    }
}
