use std::env;
use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

static INIT: Once = Once::new();

/// Directive used when neither AITK_LOG nor RUST_LOG says otherwise
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "ai_toolkit=debug,aitk=debug,tower_http=debug,warn"
    } else {
        "warn"
    }
}

/// Pick the filter: explicit AITK_LOG / config value, then RUST_LOG, then the default
pub fn filter_directive(explicit: Option<&str>, rust_log: Option<&str>, verbose: bool) -> String {
    explicit
        .or(rust_log)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| default_directive(verbose))
        .to_string()
}

/// Logs go to stderr so they never mix with command output
pub fn init(config: &Config) {
    INIT.call_once(|| {
        let rust_log = env::var("RUST_LOG").ok();
        let directive = filter_directive(
            config.log_filter.as_deref(),
            rust_log.as_deref(),
            config.verbose,
        );
        let filter = EnvFilter::try_new(&directive)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(config.verbose)));

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.verbose),
            )
            .init();
    });
}
