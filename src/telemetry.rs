use tracing_subscriber::EnvFilter;

pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Installs the global subscriber. Filter comes from `RUST_LOG` (default
/// `info`); `LOG_FORMAT=json` switches to JSON lines. Logs go to stderr.
///
/// Calling it again is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // Err only means a subscriber is already installed
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
