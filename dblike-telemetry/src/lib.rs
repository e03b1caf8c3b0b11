//! Tracing setup shared by dblike binaries and tests.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that turns on log output in tests.
const ENABLE_TEST_TRACING: &str = "ENABLE_TRACING";

static INIT_TEST_TRACING: Once = Once::new();

/// Installs the global subscriber for a binary.
///
/// Filtering follows `RUST_LOG` and falls back to `default_directive` when it is not set.
/// Fails if a global subscriber is already installed.
pub fn init_tracing(
    default_directive: &str,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// Installs a subscriber for tests, at most once per process.
///
/// Output is only produced when `ENABLE_TRACING` is set and goes through the test writer so it is
/// captured per test.
pub fn init_test_tracing() {
    INIT_TEST_TRACING.call_once(|| {
        if std::env::var_os(ENABLE_TEST_TRACING).is_none() {
            return;
        }

        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}
