//! Subscriber installation for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to whoever embeds it. Logs go to stderr so stdout stays a clean
//! JSON-lines channel.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither the environment nor the config names one
pub const DEFAULT_LOG_FILTER: &str = "recordscope=info";

/// Environment variable that overrides every other filter source
pub const LOG_ENV_VAR: &str = "RECORDSCOPE_LOG";

/// Picks the filter directive: environment, then config, then default.
pub fn resolve_filter(env_value: Option<String>, configured: Option<&str>) -> String {
    env_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init_logging(configured: Option<&str>) {
    let directive = resolve_filter(std::env::var(LOG_ENV_VAR).ok(), configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_wins_over_config() {
        let filter = resolve_filter(Some("debug".into()), Some("warn"));
        assert_eq!(filter, "debug");
    }

    #[test]
    fn test_config_used_when_env_blank() {
        let filter = resolve_filter(Some("  ".into()), Some("warn"));
        assert_eq!(filter, "warn");
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(resolve_filter(None, None), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging(Some("off"));
        init_logging(Some("off"));
    }
}
