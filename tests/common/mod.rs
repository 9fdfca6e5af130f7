//! Shared test support.

pub mod mocks;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install an env-filtered subscriber once per test binary so `RUST_LOG`
/// controls engine log output during test runs.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}
