//! @ai:module:intent Chat completion client used to generate summaries
//! @ai:module:layer infrastructure
//! @ai:module:public_api CompletionClient, CompletionRequest, ChatCompletion, OpenAiClient, MockCompletionClient
//! @ai:module:stateless false

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// System instruction sent ahead of every rendered prompt.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that responds only with valid JSON objects.";

/// @ai:intent Parameters of a single chat completion call
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> CompletionRequest<'a> {
    /// @ai:intent System instruction plus one user message holding the prompt
    /// @ai:effects pure
    pub fn for_prompt(model: &'a str, prompt: &'a str, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens,
            temperature,
        }
    }
}

/// @ai:intent Completion response with every field the caller reads made optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// @ai:intent Completion whose first choice carries the given text
    /// @ai:effects pure
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: Some(ChoiceMessage {
                    content: Some(content.into()),
                }),
            }],
        }
    }

    /// @ai:intent Content of the first choice, if it has any
    /// @ai:effects pure
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}

/// @ai:intent Trait for chat completion backends
#[allow(async_fn_in_trait)]
pub trait CompletionClient {
    /// @ai:intent Run one completion; no retries
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<ChatCompletion>;
}

/// @ai:intent OpenAI-compatible chat completions client
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// @ai:intent Create a client against the given API root
    /// @ai:effects pure
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

impl CompletionClient for OpenAiClient {
    /// @ai:effects network
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<ChatCompletion> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .context("Failed to send request to completion API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Completion API error ({}): {}", status, error_text);
        }

        response
            .json()
            .await
            .context("Failed to parse completion API response")
    }
}

/// Canned reply used by `evaluate --dry-run`.
pub const DRY_RUN_REPLY: &str = r#"{"technical": "Updated the implementation and added a test for the changed function.", "marketing": "Users get a more reliable experience."}"#;

enum MockReply {
    Completion(ChatCompletion),
    Failure(String),
}

/// @ai:intent Mock client for tests and dry runs; records every prompt it receives
pub struct MockCompletionClient {
    reply: MockReply,
    prompts: Mutex<Vec<String>>,
}

impl MockCompletionClient {
    /// @ai:intent Reply with the given content on every call
    /// @ai:effects pure
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_completion(ChatCompletion::with_content(content))
    }

    pub fn with_completion(completion: ChatCompletion) -> Self {
        Self {
            reply: MockReply::Completion(completion),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Fail every call as a transport error would
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Failure(message.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn dry_run() -> Self {
        Self::new(DRY_RUN_REPLY)
    }

    /// @ai:intent User prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<ChatCompletion> {
        if let Some(user) = request.messages.iter().find(|m| m.role == "user") {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(user.content.to_string());
            }
        }

        match &self.reply {
            MockReply::Completion(c) => Ok(c.clone()),
            MockReply::Failure(message) => anyhow::bail!("{}", message),
        }
    }
}
