//! @ai:module:intent Chat notifications for merged pull requests
//! @ai:module:layer infrastructure
//! @ai:module:public_api SlackNotifier

pub mod slack;

pub use slack::{merge_payload, test_payload, SlackNotifier};
