//! @ai:module:intent Wire types for pull requests and the triggering event
//! @ai:module:layer domain
//! @ai:module:public_api PullRequest, User, Label, Branch, Repository, PullRequestEvent
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Pull request fields read from the code-hosting API
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub user: User,
    #[serde(default)]
    pub merged_by: Option<User>,
    #[serde(default)]
    pub merged_at: Option<String>,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub base: Branch,
    pub head: Branch,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(rename = "ref")]
    pub ref_name: String,
    #[serde(default)]
    pub repo: Option<Repository>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
}

impl User {
    /// @ai:intent Display name, falling back to the login
    /// @ai:effects pure
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.login,
        }
    }
}

impl PullRequest {
    /// @ai:intent True once the pull request carries a merge timestamp
    /// @ai:effects pure
    pub fn is_merged(&self) -> bool {
        self.merged_at.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }
}

/// @ai:intent Webhook event that triggers the single-shot summarizer
/// @ai:effects pure
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
    #[serde(default)]
    pub repository: Option<Repository>,
}

impl PullRequestEvent {
    /// @ai:intent The merged pull request when the event closed it with a merge
    /// @ai:effects pure
    pub fn merged_pull_request(&self) -> Option<&PullRequest> {
        if self.action != "closed" {
            return None;
        }
        self.pull_request
            .as_ref()
            .filter(|pr| pr.merged.unwrap_or(false))
    }
}
