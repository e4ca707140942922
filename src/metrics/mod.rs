//! @ai:module:intent Evaluation records and their reduction into reports
//! @ai:module:layer application
//! @ai:module:public_api EvaluationRun, EvaluationResult, EvaluationMetrics, ReportAggregator

pub mod aggregator;
pub mod types;

pub use aggregator::{pool_by_version, CategoryCoverage, ReportAggregator, VersionStats};
pub use types::{EvaluationMetrics, EvaluationResult, EvaluationRun, TestCaseMetadata, TypedScores};
