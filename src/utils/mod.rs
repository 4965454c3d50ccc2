use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "budget_builder=info";

/// Initializes the global tracing subscriber. `RUST_LOG` wins when set; otherwise the crate logs
/// at `info`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = filter_for(std::env::var(EnvFilter::DEFAULT_ENV).ok());

        // A host application may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

fn filter_for(spec: Option<String>) -> EnvFilter {
    match spec {
        Some(spec) if !spec.trim().is_empty() => EnvFilter::new(spec),
        _ => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}
