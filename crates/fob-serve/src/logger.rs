//! Logging setup for the dev server.
//!
//! Verbosity is resolved in this order:
//!
//! 1. `--verbose`: DEBUG for the fob crates
//! 2. `--quiet`: ERROR only
//! 3. `RUST_LOG`, when set
//! 4. INFO for the fob crates
//!
//! ```rust,no_run
//! use fob_serve::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("serving assets");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "fob_serve=debug,fob_memfs=debug,fob_reload=debug";
const QUIET_FILTER: &str = "fob_serve=error,fob_memfs=error,fob_reload=error";
const DEFAULT_FILTER: &str = "fob_serve=info,fob_memfs=info,fob_reload=info";

/// Pick the filter for the given global flags.
///
/// `verbose` wins over `quiet`.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global tracing subscriber. Call once, before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Install the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_filter_enables_debug_for_all_crates() {
        let filter = filter_for(true, true).to_string();
        assert!(filter.contains("fob_serve=debug"));
        assert!(filter.contains("fob_memfs=debug"));
        assert!(filter.contains("fob_reload=debug"));
    }

    #[test]
    fn test_quiet_filter_is_errors_only() {
        let filter = filter_for(false, true).to_string();
        assert!(filter.contains("fob_reload=error"));
        assert!(!filter.contains("info"));
    }

    #[test]
    fn test_repeated_init_does_not_panic() {
        init_logger(false, false, true);
        init_logger(true, false, true);
    }
}
