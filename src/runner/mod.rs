//! @ai:module:intent Completion client, summary generation and the evaluation loop
//! @ai:module:layer infrastructure
//! @ai:module:public_api CompletionClient, OpenAiClient, SummaryGenerator, EvaluationRunner

pub mod client;
pub mod executor;
pub mod generator;

pub use client::{
    ChatCompletion, CompletionClient, CompletionRequest, MockCompletionClient, OpenAiClient,
    DRY_RUN_REPLY,
};
pub use executor::EvaluationRunner;
pub use generator::{GenerationOutcome, Summaries, SummaryGenerator, FALLBACK_MARKETING};
