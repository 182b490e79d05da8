use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` provides one.
///
/// wgpu internals are chatty at `info`; keep them at `warn` unless asked.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "lattice_engine=debug,wgpu_core=warn").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Call early in `main`, before the event loop
/// is created, so window and adapter setup is visible.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized (filter: {filter})");
    });
}

/// Picks the effective filter: explicit config, then `RUST_LOG`, then [`DEFAULT_FILTER`].
///
/// Blank strings count as unset.
fn resolve_filter(configured: Option<String>, env: Option<String>) -> String {
    configured
        .filter(|f| !f.trim().is_empty())
        .or_else(|| env.filter(|f| !f.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filter_wins_over_env() {
        let f = resolve_filter(Some("debug".into()), Some("warn".into()));
        assert_eq!(f, "debug");
    }

    #[test]
    fn env_used_when_config_missing() {
        assert_eq!(resolve_filter(None, Some("trace".into())), "trace");
    }

    #[test]
    fn blank_values_fall_through_to_default() {
        assert_eq!(resolve_filter(Some("  ".into()), Some(String::new())), DEFAULT_FILTER);
        assert_eq!(resolve_filter(None, None), DEFAULT_FILTER);
    }
}
