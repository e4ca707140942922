//! @ai:module:intent Scoring of generated summaries, automated and manual
//! @ai:module:layer application
//! @ai:module:public_api AutomatedScorer, AutomatedScores, SummaryType, human_review

pub mod automated_scorer;
pub mod human_review;

pub use automated_scorer::{AutomatedScorer, AutomatedScores, SummaryType};
