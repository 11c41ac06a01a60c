//! Tracing setup for the CLI.
//!
//! Logs go to stderr; stdout is reserved for segment records.

use shoplens_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directives for our own crates at `level`, dependencies at `warn`.
fn default_directives(level: &str) -> String {
    format!("warn,shoplens={level},shoplens_core={level}")
}

/// Install the global subscriber. `RUST_LOG` replaces the default filter.
pub fn init(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        let ansi = console::Term::stderr().features().colors_supported();
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(ansi)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Resolve level and format from `[logging]`, letting the global flags win.
pub fn init_from_config(logging: &LoggingConfig, verbose: bool, json_logs: bool) {
    let level = if verbose {
        "debug"
    } else {
        logging.level.as_str()
    };
    init(level, json_logs || logging.format == "json");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_scope_level_to_own_crates() {
        assert_eq!(
            default_directives("debug"),
            "warn,shoplens=debug,shoplens_core=debug"
        );
        assert!(EnvFilter::try_new(default_directives("info")).is_ok());
    }
}
