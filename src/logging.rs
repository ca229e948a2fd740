use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter directive.
pub const LOG_ENV_VAR: &str = "MESSENGER_ARCHIVE_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber, writing to stderr.
///
/// Filter precedence: `level`, then `MESSENGER_ARCHIVE_LOG`, then `RUST_LOG`, then `warn`.
/// Invalid directives fall through to the next source. Calling this twice is a no-op.
pub fn init_tracing(level: Option<&str>) {
    let filter = resolve_filter(level);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn resolve_filter(level: Option<&str>) -> EnvFilter {
    level
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| {
            std::env::var(LOG_ENV_VAR).ok().and_then(|value| EnvFilter::try_new(value).ok())
        })
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
