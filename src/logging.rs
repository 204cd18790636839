use tracing_subscriber::EnvFilter;

/// Log filter variable, e.g. `KVNOTES_LOG=kvnotes=debug`
pub const LOG_ENV: &str = "KVNOTES_LOG";

/// Install a stderr subscriber so stdout stays clean for command output
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
