//! Logging and tracing configuration
//!
//! Both binaries log to stderr so stdout stays free for reports.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "burnham=info,warn";

/// Filter used for `--verbose`
const VERBOSE_FILTER: &str = "burnham=debug,info";

/// Pick the filter directives for a run
///
/// `RUST_LOG` always wins over the `--verbose` flag.
pub fn filter_directives(verbose: bool, env: Option<&str>) -> String {
    match env {
        Some(directives) if !directives.trim().is_empty() => directives.to_string(),
        _ if verbose => VERBOSE_FILTER.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize tracing for the CLI (stderr logging)
pub fn init_cli(verbose: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::try_new(filter_directives(verbose, env.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
