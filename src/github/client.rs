//! @ai:module:intent Code-hosting API client for pull request listings and diffs
//! @ai:module:layer infrastructure
//! @ai:module:public_api PullRequestSource, PullRequestPage, GitHubClient, MockPullRequestSource
//! @ai:module:stateless false

use crate::github::types::PullRequest;
use anyhow::{Context, Result};
use std::collections::HashMap;

const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";
const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("pr-summary/", env!("CARGO_PKG_VERSION"));

/// @ai:intent One listing page as served upstream
/// @ai:invariant pulls.len() <= fetched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PullRequestPage {
    pub pulls: Vec<PullRequest>,
    /// Entries on the page before malformed ones were dropped.
    pub fetched: usize,
}

impl PullRequestPage {
    /// @ai:intent True when upstream has no further pages
    pub fn is_last(&self, per_page: usize) -> bool {
        self.fetched == 0 || self.fetched < per_page
    }
}

/// @ai:intent Source of pull requests and their unified diffs
#[allow(async_fn_in_trait)]
pub trait PullRequestSource {
    /// @ai:intent One page of closed pull requests, most recently updated first
    /// @ai:post entries that fail to deserialize are dropped, not fatal; `fetched` still counts them
    async fn list_closed(&self, repo: &str, per_page: usize, page: usize)
        -> Result<PullRequestPage>;

    /// @ai:intent Fetch a single pull request by number
    async fn get(&self, repo: &str, number: u64) -> Result<PullRequest>;

    /// @ai:intent Unified diff text for a pull request
    async fn diff(&self, repo: &str, number: u64) -> Result<String>;
}

/// @ai:intent REST client authenticated with a bearer token
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    /// @ai:intent Create a client against the given API root
    /// @ai:effects pure
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn pulls_url(&self, repo: &str) -> String {
        format!("{}/repos/{}/pulls", self.api_url, repo)
    }

    async fn get_checked(&self, url: &str, accept: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("GitHub API error ({}) for {}", status, url);
        }
        Ok(response)
    }
}

impl PullRequestSource for GitHubClient {
    /// @ai:effects network
    async fn list_closed(
        &self,
        repo: &str,
        per_page: usize,
        page: usize,
    ) -> Result<PullRequestPage> {
        let url = format!(
            "{}?state=closed&sort=updated&direction=desc&per_page={}&page={}",
            self.pulls_url(repo),
            per_page,
            page
        );
        let items: Vec<serde_json::Value> = self
            .get_checked(&url, JSON_MEDIA_TYPE)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse pull request list from {url}"))?;

        let fetched = items.len();
        let mut pulls = Vec::with_capacity(fetched);
        for item in items {
            match serde_json::from_value::<PullRequest>(item) {
                Ok(pr) => pulls.push(pr),
                Err(e) => tracing::warn!(repo, error = %e, "Skipping malformed pull request entry"),
            }
        }
        Ok(PullRequestPage { pulls, fetched })
    }

    /// @ai:effects network
    async fn get(&self, repo: &str, number: u64) -> Result<PullRequest> {
        let url = format!("{}/{}", self.pulls_url(repo), number);
        self.get_checked(&url, JSON_MEDIA_TYPE)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse pull request #{number}"))
    }

    /// @ai:effects network
    async fn diff(&self, repo: &str, number: u64) -> Result<String> {
        let url = format!("{}/{}", self.pulls_url(repo), number);
        self.get_checked(&url, DIFF_MEDIA_TYPE)
            .await?
            .text()
            .await
            .with_context(|| format!("Failed to read diff for pull request #{number}"))
    }
}

/// @ai:intent In-memory pull request source for tests
#[derive(Debug, Default, Clone)]
pub struct MockPullRequestSource {
    closed: Vec<PullRequest>,
    by_number: HashMap<u64, PullRequest>,
    diffs: HashMap<u64, String>,
    fail_listing: bool,
}

impl MockPullRequestSource {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Register a pull request in both the listing and the by-number lookup
    pub fn with_pull_request(mut self, pr: PullRequest, diff: Option<&str>) -> Self {
        if let Some(diff) = diff {
            self.diffs.insert(pr.number, diff.to_string());
        }
        self.by_number.insert(pr.number, pr.clone());
        self.closed.push(pr);
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }
}

impl PullRequestSource for MockPullRequestSource {
    async fn list_closed(
        &self,
        _repo: &str,
        per_page: usize,
        page: usize,
    ) -> Result<PullRequestPage> {
        if self.fail_listing {
            anyhow::bail!("GitHub API error (500 Internal Server Error)");
        }
        let start = page.saturating_sub(1) * per_page;
        let pulls: Vec<PullRequest> = self.closed.iter().skip(start).take(per_page).cloned().collect();
        Ok(PullRequestPage {
            fetched: pulls.len(),
            pulls,
        })
    }

    async fn get(&self, _repo: &str, number: u64) -> Result<PullRequest> {
        self.by_number
            .get(&number)
            .cloned()
            .with_context(|| format!("GitHub API error (404 Not Found) for #{number}"))
    }

    async fn diff(&self, _repo: &str, number: u64) -> Result<String> {
        self.diffs
            .get(&number)
            .cloned()
            .with_context(|| format!("No diff for #{number}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::fixtures::pull_request;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_closed_sends_query_and_skips_bad_entries() {
        let server = MockServer::start().await;
        let good = serde_json::to_value(pull_request(7, "Fix crash", true)).unwrap();

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/repos/acme/widgets/pulls"))
            .and(matchers::query_param("state", "closed"))
            .and(matchers::query_param("sort", "updated"))
            .and(matchers::query_param("direction", "desc"))
            .and(matchers::query_param("per_page", "30"))
            .and(matchers::query_param("page", "2"))
            .and(matchers::header("authorization", "Bearer ghp-test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([good, {"number": "not-a-pr"}])),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri(), "ghp-test").unwrap();
        let page = client.list_closed("acme/widgets", 30, 2).await.unwrap();

        assert_eq!(page.fetched, 2);
        assert_eq!(page.pulls.len(), 1);
        assert_eq!(page.pulls[0].number, 7);
    }

    #[test]
    fn test_page_end_counts_dropped_entries() {
        let short_after_drops = PullRequestPage {
            pulls: vec![pull_request(1, "t", true)],
            fetched: 3,
        };
        assert!(!short_after_drops.is_last(3));
        assert!(short_after_drops.is_last(4));
        assert!(PullRequestPage::default().is_last(0));
    }

    #[tokio::test]
    async fn test_list_closed_non_success_is_error() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri(), "bad").unwrap();
        let err = client.list_closed("acme/widgets", 10, 1).await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_diff_uses_diff_media_type() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/repos/acme/widgets/pulls/7"))
            .and(matchers::header("accept", DIFF_MEDIA_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_string("diff --git a/x b/x\n"))
            .mount(&server)
            .await;

        let client = GitHubClient::new(format!("{}/", server.uri()), "t").unwrap();
        let diff = client.diff("acme/widgets", 7).await.unwrap();
        assert_eq!(diff, "diff --git a/x b/x\n");
    }

    #[tokio::test]
    async fn test_get_pull_request() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/repos/acme/widgets/pulls/9"))
            .and(matchers::header("accept", JSON_MEDIA_TYPE))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(pull_request(9, "Add API", true)),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri(), "t").unwrap();
        let pr = client.get("acme/widgets", 9).await.unwrap();
        assert_eq!(pr.title, "Add API");
    }

    #[tokio::test]
    async fn test_mock_source_pages() {
        let source = (1..=5).fold(MockPullRequestSource::new(), |s, n| {
            s.with_pull_request(pull_request(n, "t", true), None)
        });

        let page2 = source.list_closed("r", 2, 2).await.unwrap();
        assert_eq!(page2.pulls.iter().map(|p| p.number).collect::<Vec<_>>(), vec![3, 4]);
        assert!(!page2.is_last(2));
        assert!(source.list_closed("r", 2, 3).await.unwrap().is_last(2));
        assert!(source.diff("r", 1).await.is_err());
    }
}
