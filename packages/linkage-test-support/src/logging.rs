//! One tracing subscriber per test process.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Install the test subscriber; later calls do nothing.
///
/// The filter comes from `TEST_LOG`, falling back to `RUST_LOG`,
/// then `warn,linkage=warn`. Output goes through the test writer so
/// `cargo test` captures it per test.
pub fn init() {
    INSTALLED.get_or_init(|| {
        let filter = ["TEST_LOG", "RUST_LOG"]
            .iter()
            .find_map(|var| std::env::var(var).ok())
            .map(EnvFilter::new)
            .unwrap_or_else(|| EnvFilter::new("warn,linkage=warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .with_target(true)
            .try_init();
    });
}
