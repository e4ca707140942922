//! @ai:module:intent Build the structured log subscriber from resolved configuration
//! @ai:module:layer infrastructure
//! @ai:module:public_api init, directive
//! @ai:module:stateless true

use crate::config::LoggingConfig;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// @ai:intent Filter directive for the crate target at the configured verbosity
/// @ai:effects pure
pub fn directive(config: &LoggingConfig) -> &'static str {
    if config.debug {
        "pr_summary=debug"
    } else {
        "pr_summary=info"
    }
}

/// @ai:intent Install a subscriber for the lifetime of the returned guard
/// @ai:pre called once from main, on the thread that drives the runtime
/// @ai:post RUST_LOG still takes precedence over the configured level
/// @ai:effects global:logging
pub fn init(config: &LoggingConfig) -> DefaultGuard {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(config)));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr),
    );

    tracing::subscriber::set_default(subscriber)
}
