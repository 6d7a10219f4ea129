//! Helpers shared by the integration tests.

use tracing_subscriber::EnvFilter;

/// Installs a log subscriber controlled by the `RUST_LOG` variable.
///
/// Can be called by every test. Only the first call has an effect.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
