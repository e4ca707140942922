//! @ai:module:intent Pull request summarization and prompt evaluation library
//! @ai:module:layer application
//! @ai:module:public_api config, dataset, github, prompts, runner, evaluator, metrics, report, notify, summarize

pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod github;
pub mod logging;
pub mod metrics;
pub mod notify;
pub mod prompts;
pub mod report;
pub mod runner;
pub mod summarize;

pub use config::{Credentials, SummaryConfig};
pub use dataset::{DatasetBuilder, TestCase};
pub use error::{CompletionError, ConfigError, PromptError};
pub use evaluator::{AutomatedScorer, AutomatedScores};
pub use metrics::{EvaluationResult, EvaluationRun, ReportAggregator};
pub use prompts::PromptVersion;
pub use report::ReportGenerator;
pub use runner::{CompletionClient, EvaluationRunner, OpenAiClient, SummaryGenerator};
