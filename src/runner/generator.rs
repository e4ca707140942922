//! @ai:module:intent Render a prompt, call the completion client, extract two summaries
//! @ai:module:layer application
//! @ai:module:public_api SummaryGenerator, Summaries, GenerationOutcome, parse_summaries, truncate_chars
//! @ai:module:stateless true

use crate::config::ApiConfig;
use crate::dataset::TestCase;
use crate::error::CompletionError;
use crate::prompts::{render, PromptFields, PromptVersion};
use crate::runner::client::{CompletionClient, CompletionRequest};
use serde::{Deserialize, Serialize};

/// Marketing text used whenever generation falls back.
pub const FALLBACK_MARKETING: &str = "Improvements and updates";

/// @ai:intent The technical and marketing summary pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summaries {
    pub technical: String,
    pub marketing: String,
}

impl Summaries {
    /// @ai:intent Deterministic fallback pair built from the pull request title
    /// @ai:effects pure
    pub fn fallback(title: &str) -> Self {
        Self {
            technical: title.to_string(),
            marketing: FALLBACK_MARKETING.to_string(),
        }
    }
}

/// @ai:intent Either parsed summaries or the fallback pair with the reason it was used
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated(Summaries),
    Fallback {
        summaries: Summaries,
        reason: CompletionError,
    },
}

impl GenerationOutcome {
    pub fn summaries(&self) -> &Summaries {
        match self {
            GenerationOutcome::Generated(s) => s,
            GenerationOutcome::Fallback { summaries, .. } => summaries,
        }
    }

    pub fn into_summaries(self) -> Summaries {
        match self {
            GenerationOutcome::Generated(s) => s,
            GenerationOutcome::Fallback { summaries, .. } => summaries,
        }
    }

    pub fn fallback_reason(&self) -> Option<&CompletionError> {
        match self {
            GenerationOutcome::Generated(_) => None,
            GenerationOutcome::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback_reason().is_some()
    }
}

/// @ai:intent First `max_chars` characters of `text`
/// @ai:post never splits a UTF-8 sequence; may split a line
/// @ai:effects pure
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// @ai:intent Extract the two summaries from raw completion content
/// @ai:post Err describes why the content was unusable
/// @ai:effects pure
pub fn parse_summaries(content: Option<&str>) -> Result<Summaries, CompletionError> {
    let content = match content {
        Some(c) if !c.is_empty() => c.trim(),
        _ => return Err(CompletionError::EmptyResponse),
    };

    let json_text = if content.starts_with('{') {
        content
    } else {
        match (content.find('{'), content.rfind('}')) {
            (Some(start), Some(end)) if start < end => &content[start..=end],
            _ => {
                tracing::debug!("Could not find JSON boundaries in response");
                content
            }
        }
    };

    let value: serde_json::Value = serde_json::from_str(json_text)
        .map_err(|e| CompletionError::InvalidJson(e.to_string()))?;

    let field = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);
    match (field("technical"), field("marketing")) {
        (Some(technical), Some(marketing)) => Ok(Summaries {
            technical,
            marketing,
        }),
        _ => Err(CompletionError::MissingKeys),
    }
}

/// @ai:intent Generates summaries for one prompt version at a time
pub struct SummaryGenerator<C: CompletionClient> {
    client: C,
    settings: ApiConfig,
}

impl<C: CompletionClient> SummaryGenerator<C> {
    pub fn new(client: C, settings: ApiConfig) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn settings(&self) -> &ApiConfig {
        &self.settings
    }

    /// @ai:intent Generate summaries for a test case
    /// @ai:post never fails; problems yield GenerationOutcome::Fallback
    /// @ai:effects network
    pub async fn generate(&self, test_case: &TestCase, version: PromptVersion) -> GenerationOutcome {
        self.generate_from_parts(
            test_case.pr_number,
            &test_case.title,
            &test_case.body,
            &test_case.diff,
            version,
        )
        .await
    }

    /// @ai:intent Generate summaries from raw pull request parts
    /// @ai:post exactly one completion call when the prompt renders
    /// @ai:effects network
    pub async fn generate_from_parts(
        &self,
        pr_number: u64,
        title: &str,
        body: &str,
        diff: &str,
        version: PromptVersion,
    ) -> GenerationOutcome {
        let fields = PromptFields {
            title,
            body,
            diff_excerpt: truncate_chars(diff, self.settings.max_diff_length),
        };

        let attempt = match render(version.template(), &fields, self.settings.max_diff_length) {
            Ok(prompt) => {
                tracing::info!(
                    pr_number,
                    prompt_version = %version,
                    "Generating summaries for PR #{} using {} with prompt: {}",
                    pr_number,
                    self.settings.model,
                    version
                );
                self.request(&prompt).await
            }
            Err(e) => Err((CompletionError::Prompt(e.to_string()), None)),
        };

        match attempt {
            Ok(summaries) => {
                tracing::debug!(pr_number, prompt_version = %version, "Generated summaries");
                GenerationOutcome::Generated(summaries)
            }
            Err((reason, raw)) => {
                tracing::error!(pr_number, prompt_version = %version, "Failed to generate summaries: {}", reason);
                tracing::debug!(pr_number, raw = ?raw, "Raw response");
                GenerationOutcome::Fallback {
                    summaries: Summaries::fallback(title),
                    reason,
                }
            }
        }
    }

    async fn request(&self, prompt: &str) -> Result<Summaries, (CompletionError, Option<String>)> {
        let request = CompletionRequest::for_prompt(
            &self.settings.model,
            prompt,
            self.settings.max_tokens,
            self.settings.temperature,
        );

        let completion = self
            .client
            .complete(&request)
            .await
            .map_err(|e| (CompletionError::Request(format!("{e:#}")), None))?;

        let content = completion.first_content();
        parse_summaries(content).map_err(|reason| (reason, content.map(str::to_string)))
    }
}
