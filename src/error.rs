//! @ai:module:intent Error types shared across the summary pipeline
//! @ai:module:layer domain
//! @ai:module:public_api PromptError, ConfigError, CompletionError
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Failures looking up or rendering a prompt template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Unknown prompt version: {name}. Available: {}", .available.join(", "))]
    NotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("Template references unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),

    #[error("Malformed template at byte {position}: {message}")]
    MalformedTemplate { position: usize, message: String },
}

/// @ai:intent Configuration problems detected before any network call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Required configuration field '{0}' is missing")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Invalid OpenAI model: {0}")]
    UnsupportedModel(String),

    #[error("Invalid Slack webhook URL format")]
    InvalidWebhook,
}

/// @ai:intent Reasons a completion could not be turned into two summaries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Empty response content from completion API")]
    EmptyResponse,

    #[error("Failed to parse JSON response: {0}")]
    InvalidJson(String),

    #[error("Response missing required keys")]
    MissingKeys,

    #[error("Completion request failed: {0}")]
    Request(String),

    #[error("Prompt rendering failed: {0}")]
    Prompt(String),
}
