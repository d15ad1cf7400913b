use tracing_subscriber::EnvFilter;

/// Environment variable that overrides every other log setting.
pub const LOG_ENV: &str = "POMOTIMER_LOG";

/// Pick the filter directive: `POMOTIMER_LOG`, then `-v` flags, then config.
pub fn directive(env: Option<String>, verbose: u8, configured: &str) -> String {
    if let Some(env) = env.filter(|s| !s.trim().is_empty()) {
        return env;
    }
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the stderr subscriber. Logging never goes to stdout, which carries
/// the widget and JSON output.
pub fn init(verbose: u8, configured: &str) {
    let directive = directive(std::env::var(LOG_ENV).ok(), verbose, configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
