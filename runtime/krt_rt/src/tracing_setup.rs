//! Tracing subscriber setup.

use std::sync::Once;

use crate::config::ENV_LOG;

static TRACING_INIT: Once = Once::new();

/// Install a global subscriber.
///
/// `filter` wins over `KRT_LOG`, which wins over `RUST_LOG`. Nothing is
/// installed when none of them is set. Safe to call multiple times; an
/// embedder's own subscriber is left in place.
pub fn init(filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = filter
            .map(str::to_owned)
            .or_else(|| std::env::var(ENV_LOG).ok())
            .or_else(|| std::env::var(EnvFilter::DEFAULT_ENV).ok());
        let Some(directives) = directives else {
            return;
        };

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(EnvFilter::new(directives))
            .try_init();
    });
}
