use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Directives used when neither `RUST_LOG` nor `logging.filter` is set.
/// Item lifecycle events are logged by `service` at info; request spans come
/// from `tower_http`.
pub const DEFAULT_FILTER: &str = "info,service=info,server=info,tower_http=info,axum=warn";

/// `RUST_LOG` wins, then the configured filter, then [`DEFAULT_FILTER`].
pub fn env_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_directives(configured)))
}

fn fallback_directives(configured: Option<&str>) -> &str {
    match configured.map(str::trim) {
        Some(f) if !f.is_empty() => f,
        _ => DEFAULT_FILTER,
    }
}

/// Install the global subscriber, writing to stdout.
/// - `json`: one JSON object per event, for container log shippers
/// - otherwise compact human-readable lines
///
/// A second call is a no-op.
pub fn init_logging(json: bool, configured_filter: Option<&str>) {
    let builder = fmt()
        .with_env_filter(env_filter(configured_filter))
        .with_target(false)
        .with_writer(io::stdout);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filter_overrides_default() {
        assert_eq!(fallback_directives(Some("debug,hyper=warn")), "debug,hyper=warn");
        assert_eq!(fallback_directives(Some("  ")), DEFAULT_FILTER);
        assert_eq!(fallback_directives(None), DEFAULT_FILTER);
    }
}
