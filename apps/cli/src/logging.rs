//! Logging setup for the `gauge` binary. Events go to stderr so that command
//! output on stdout stays machine-readable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over the configured level; `verbose` forces `debug`.
pub fn init_logging(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into()))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn default_filter(level: &str) -> String {
    format!("gauge={level},gauge_units={level}")
}
