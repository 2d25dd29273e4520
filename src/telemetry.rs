//! Telemetry initialization.
//!
//! Controlled by two environment variables:
//! - `SKINPACK_LOG`: an `EnvFilter` directive (default `warn`), e.g.
//!   `skinpack=debug` to see every rename and discarded duplicate.
//! - `SKINPACK_LOG_FORMAT`: `json` for JSON lines on stderr; anything else
//!   (or unset) gives compact human-readable lines on stderr.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Filter directive environment variable.
pub const LOG_ENV: &str = "SKINPACK_LOG";

/// Output format environment variable.
pub const LOG_FORMAT_ENV: &str = "SKINPACK_LOG_FORMAT";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Log line layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// Interpret a `SKINPACK_LOG_FORMAT` value.
    #[must_use]
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Install the global subscriber. Call once, at the top of `main()`.
///
/// `quiet` raises the default level to `error` when `SKINPACK_LOG` is unset.
pub fn init(quiet: bool) {
    let default = if quiet { "error" } else { DEFAULT_DIRECTIVE };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let format = LogFormat::from_env_value(std::env::var(LOG_FORMAT_ENV).ok().as_deref());

    let registry = tracing_subscriber::registry().with(filter);
    // A second init (e.g. from tests) is not an error worth surfacing.
    let _ = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_from_env_value() {
        assert_eq!(LogFormat::from_env_value(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("pretty")), LogFormat::Compact);
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Compact);
    }

    #[test]
    fn init_twice_is_harmless() {
        init(true);
        init(false);
    }
}
