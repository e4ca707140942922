//! @ai:module:intent Summarize the pull request merged by the triggering event and announce it
//! @ai:module:layer application
//! @ai:module:public_api run, summarize_event, load_event, SummarizeOutcome
//! @ai:module:stateless true

use crate::config::{Credentials, SummaryConfig};
use crate::github::{GitHubClient, PullRequestEvent, PullRequestSource};
use crate::notify::SlackNotifier;
use crate::prompts::PromptVersion;
use crate::runner::client::{CompletionClient, OpenAiClient};
use crate::runner::generator::{Summaries, SummaryGenerator};
use anyhow::{Context, Result};
use std::path::Path;

/// @ai:intent What the single-shot flow did with the event
#[derive(Debug, Clone, PartialEq)]
pub enum SummarizeOutcome {
    /// The event did not merge a pull request.
    Skipped,
    Posted {
        pr_number: u64,
        summaries: Summaries,
        fallback: bool,
    },
}

/// @ai:intent Read the event JSON written by the workflow runner
/// @ai:effects fs:read
pub fn load_event(path: &Path) -> Result<PullRequestEvent> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file {}", path.display()))?;
    let event: PullRequestEvent = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse event file {}", path.display()))?;

    tracing::info!(action = %event.action, "Loaded pull request event");
    if let Some(pr) = &event.pull_request {
        tracing::debug!(
            pr_number = pr.number,
            merged = ?pr.merged,
            merged_at = ?pr.merged_at,
            base = %pr.base.ref_name,
            head = %pr.head.ref_name,
            "Event pull request"
        );
    }
    Ok(event)
}

/// @ai:intent Generate summaries for a merged pull request and post them
/// @ai:post Skipped unless the event closed the pull request with a merge
/// @ai:post a diff failure degrades to an empty diff; a Slack failure is an error
/// @ai:effects network
pub async fn summarize_event<S, C>(
    event: &PullRequestEvent,
    repo: &str,
    source: &S,
    generator: &SummaryGenerator<C>,
    notifier: &SlackNotifier,
) -> Result<SummarizeOutcome>
where
    S: PullRequestSource,
    C: CompletionClient,
{
    let Some(pr) = event.merged_pull_request() else {
        tracing::info!("PR not merged or not closed, skipping");
        return Ok(SummarizeOutcome::Skipped);
    };

    tracing::info!(pr_number = pr.number, repo, "Processing PR #{}: {}", pr.number, pr.title);

    let diff = match source.diff(repo, pr.number).await {
        Ok(diff) => diff,
        Err(e) => {
            tracing::error!(pr_number = pr.number, "Failed to fetch PR diff: {:#}", e);
            String::new()
        }
    };

    let outcome = generator
        .generate_from_parts(
            pr.number,
            &pr.title,
            pr.body.as_deref().unwrap_or_default(),
            &diff,
            PromptVersion::Default,
        )
        .await;
    let fallback = outcome.is_fallback();
    let summaries = outcome.into_summaries();

    if let Err(e) = notifier.post(pr, &summaries).await {
        tracing::error!(pr_number = pr.number, "Failed to post to Slack: {:#}", e);
        return Err(e.context(format!("Failed to complete all operations for PR #{}", pr.number)));
    }

    tracing::info!(pr_number = pr.number, "Successfully summarized PR #{}", pr.number);
    Ok(SummarizeOutcome::Posted {
        pr_number: pr.number,
        summaries,
        fallback,
    })
}

/// @ai:intent Single-shot entry point: check every requirement, then summarize the event
/// @ai:pre config has been resolved from file and environment
/// @ai:effects fs:read, network
pub async fn run(config: &SummaryConfig, credentials: &Credentials) -> Result<SummarizeOutcome> {
    let event_path = config.require_event_path()?;
    let repo = config.require_repository()?;
    let github_token = credentials.require_github_token()?;
    let openai_key = credentials.require_openai_api_key()?;
    let webhook = credentials.require_slack_webhook()?;
    config.validate(credentials)?;

    let event = load_event(event_path)?;

    let source = GitHubClient::new(&config.github.api_url, github_token)?;
    let client = OpenAiClient::new(&config.api.base_url, openai_key)?;
    let generator = SummaryGenerator::new(client, config.api.clone());
    let notifier = SlackNotifier::new(webhook, config.slack.channel.clone())?;

    summarize_event(&event, repo, &source, &generator, &notifier).await
}
