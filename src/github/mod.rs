//! @ai:module:intent Code-hosting API collaborator
//! @ai:module:layer infrastructure
//! @ai:module:public_api PullRequestSource, PullRequestPage, GitHubClient, MockPullRequestSource, PullRequest, PullRequestEvent

pub mod client;
pub mod types;

pub use client::{GitHubClient, MockPullRequestSource, PullRequestPage, PullRequestSource};
pub use types::{Branch, Label, PullRequest, PullRequestEvent, Repository, User};
