//! Shared setup for integration tests

use tracing_subscriber::{fmt, EnvFilter};

/// Install a test-friendly subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("publishing_e2e=debug")))
        .with_test_writer()
        .try_init();
}
