//! @ai:module:intent Configuration layering: defaults, TOML file, environment, then CLI
//! @ai:module:layer infrastructure
//! @ai:module:public_api SummaryConfig, ApiConfig, GitHubConfig, SlackConfig, LoggingConfig, Credentials
//! @ai:module:stateless true

use crate::error::ConfigError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "pr-summary.toml";

/// Models accepted by `validate`.
pub const SUPPORTED_MODELS: [&str; 5] = [
    "gpt-3.5-turbo",
    "gpt-4",
    "gpt-4-turbo",
    "gpt-4o",
    "gpt-4o-mini",
];

const SLACK_WEBHOOK_PREFIX: &str = "https://hooks.slack.com/";
const OPENAI_KEY_PREFIX: &str = "sk-";

/// @ai:intent Non-secret settings for summarization and evaluation
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// @ai:intent Completion model parameters
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_diff_length")]
    pub max_diff_length: usize,
    #[serde(default = "default_openai_url")]
    pub base_url: String,
}

/// @ai:intent Code-hosting API location and the triggering event
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_github_url")]
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub debug: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_diff_length: default_max_diff_length(),
            base_url: default_openai_url(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_url(),
            repository: None,
            event_path: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_diff_length() -> usize {
    8000
}

fn default_openai_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

impl SummaryConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// @ai:intent Resolve defaults, then an explicit or discovered TOML file, then process env
    /// @ai:post an explicit path that cannot be read is an error; a missing default file is not
    /// @ai:effects fs:read, env:read
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// @ai:intent Overlay settings from environment-style variables
    /// @ai:pre lookup returns the raw variable value, if set
    /// @ai:post unparsable numeric values yield ConfigError::InvalidValue
    /// @ai:effects pure
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("MODEL").filter(|v| !v.is_empty()) {
            self.api.model = model;
        }
        if let Some(raw) = lookup("MAX_TOKENS") {
            self.api.max_tokens = parse_env("max_tokens", &raw)?;
        }
        if let Some(raw) = lookup("TEMPERATURE") {
            self.api.temperature = parse_env("temperature", &raw)?;
        }
        if let Some(raw) = lookup("MAX_DIFF_LENGTH") {
            self.api.max_diff_length = parse_env("max_diff_length", &raw)?;
        }
        if let Some(repo) = lookup("GITHUB_REPOSITORY").filter(|v| !v.is_empty()) {
            self.github.repository = Some(repo);
        }
        if let Some(path) = lookup("GITHUB_EVENT_PATH").filter(|v| !v.is_empty()) {
            self.github.event_path = Some(PathBuf::from(path));
        }
        if let Some(channel) = lookup("SLACK_CHANNEL").filter(|v| !v.is_empty()) {
            self.slack.channel = Some(channel);
        }
        if let Some(raw) = lookup("ENABLE_DEBUG") {
            self.logging.debug = raw.trim().eq_ignore_ascii_case("true");
        }
        Ok(())
    }

    /// @ai:intent Check model, numeric ranges and any configured webhook before network use
    /// @ai:effects pure
    pub fn validate(&self, credentials: &Credentials) -> Result<(), ConfigError> {
        if !SUPPORTED_MODELS.contains(&self.api.model.as_str()) {
            return Err(ConfigError::UnsupportedModel(self.api.model.clone()));
        }

        if let Some(webhook) = credentials.slack_webhook.as_deref() {
            if !webhook.starts_with(SLACK_WEBHOOK_PREFIX) {
                return Err(ConfigError::InvalidWebhook);
            }
        }

        check_range("max_tokens", f64::from(self.api.max_tokens), 50.0, 4000.0)?;
        check_range("temperature", f64::from(self.api.temperature), 0.0, 2.0)?;

        if self.api.max_diff_length < 100 {
            return Err(ConfigError::OutOfRange {
                field: "max_diff_length",
                min: 100.0,
                max: f64::INFINITY,
                value: self.api.max_diff_length as f64,
            });
        }

        Ok(())
    }

    pub fn require_repository(&self) -> Result<&str, ConfigError> {
        self.github
            .repository
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or(ConfigError::MissingField("github_repository"))
    }

    pub fn require_event_path(&self) -> Result<&Path, ConfigError> {
        self.github
            .event_path
            .as_deref()
            .ok_or(ConfigError::MissingField("github_event_path"))
    }
}

fn parse_env<T: FromStr>(field: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        value: raw.to_string(),
    })
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

/// @ai:intent Secrets supplied through the environment or CLI, never through the config file
/// @ai:invariant Debug output never reveals a secret
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub github_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub slack_webhook: Option<String>,
}

impl Credentials {
    /// @ai:intent Build credentials, treating empty strings as absent
    /// @ai:effects pure
    pub fn new(
        github_token: Option<String>,
        openai_api_key: Option<String>,
        slack_webhook: Option<String>,
    ) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            github_token: present(github_token),
            openai_api_key: present(openai_api_key),
            slack_webhook: present(slack_webhook),
        }
    }

    /// @ai:effects env:read
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("GITHUB_TOKEN").ok(),
            std::env::var("OPENAI_API_KEY").ok(),
            std::env::var("SLACK_WEBHOOK").ok(),
        )
    }

    pub fn require_github_token(&self) -> Result<&str, ConfigError> {
        self.github_token
            .as_deref()
            .ok_or(ConfigError::MissingField("github_token"))
    }

    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or(ConfigError::MissingField("openai_api_key"))
    }

    pub fn require_slack_webhook(&self) -> Result<&str, ConfigError> {
        self.slack_webhook
            .as_deref()
            .ok_or(ConfigError::MissingField("slack_webhook"))
    }

    /// @ai:intent Format problems in the credentials that are present
    /// @ai:post empty when every present credential looks well formed
    /// @ai:effects pure
    pub fn format_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Some(key) = self.openai_api_key.as_deref() {
            if !key.starts_with(OPENAI_KEY_PREFIX) {
                problems.push(format!("OpenAI API key should start with '{OPENAI_KEY_PREFIX}'"));
            }
        }
        if let Some(webhook) = self.slack_webhook.as_deref() {
            if !webhook.starts_with(SLACK_WEBHOOK_PREFIX) {
                problems.push(format!("Slack webhook URL should start with '{SLACK_WEBHOOK_PREFIX}'"));
            }
        }
        problems
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "***" } else { "" };
        f.debug_struct("Credentials")
            .field("github_token", &mask(&self.github_token))
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("slack_webhook", &mask(&self.slack_webhook))
            .finish()
    }
}
