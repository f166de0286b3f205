use tracing_subscriber::EnvFilter;

/// Overrides the level chosen by `-v`.
pub const LOG_ENV: &str = "APEYE_LOG";

pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr subscriber filtered by [`LOG_ENV`] or the `-v` count.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
