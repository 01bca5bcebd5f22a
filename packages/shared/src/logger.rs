//! Logger setup with tracing-subscriber.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The filter defaults to `<bin_name>=<default_level>,tower_http=<default_level>`
/// and can be overridden with the `RUST_LOG` environment variable.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    // Cargo bin names use dashes, tracing targets use underscores
    let target = bin_name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{target}={default_level},tower_http={default_level}"
        ))
    });
    let filter_text = filter.to_string();

    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::debug!("Logger initialized with filter '{}'", filter_text);
}
