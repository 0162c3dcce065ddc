pub use quill_test_macros::test;

use std::sync::Once;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static INIT: Once = Once::new();

fn init_tracing_with_env_like() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = fmt::layer()
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .with_target(false)
        .with_test_writer()
        .pretty();

    // `try_init` also installs the log -> tracing bridge, so the `log` macros of the library crates are captured.
    if let Err(err) = tracing_subscriber::registry().with(fmt).with(filter).try_init() {
        eprintln!("Failed to install test subscriber: {err}");
    }
}

/// Test setup executed before each test.
///
/// Panics raised inside spawned tasks are left to the runtime, as some tests rely on a persist
/// future panicking without tearing down the test process.
pub fn setup_test() {
    INIT.call_once(|| {
        init_tracing_with_env_like();
        log::debug!("Test logging initialized");
    });
}
