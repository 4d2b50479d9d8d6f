use tracing_subscriber::EnvFilter;

/// Routes engine events to the test output. Set `RUST_LOG=veritas=trace` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
