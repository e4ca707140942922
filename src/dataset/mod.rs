//! @ai:module:intent Test case dataset: model, builder, persistence and validation
//! @ai:module:layer domain
//! @ai:module:public_api TestCase, Difficulty, Category, DatasetBuilder, save, load, find_issues, Breakdown

pub mod builder;
pub mod store;
pub mod test_case;
pub mod validation;

pub use builder::DatasetBuilder;
pub use store::{load, save, DatasetFile};
pub use test_case::{classify_category, classify_difficulty, Category, Difficulty, TestCase};
pub use validation::{find_issues, Breakdown, DatasetIssue, IssueKind};
