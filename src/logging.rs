//! Tracing setup shared by the CLI and the web server

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter for a given base level; `RUST_LOG` wins when set.
pub fn default_filter(level: &str) -> String {
    format!("product_catalog={level},catalog={level},catalog_server={level},tower_http=debug,axum={level}")
}

/// Install a stderr `fmt` subscriber. Safe to call more than once.
pub fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_uses_level() {
        let filter = default_filter("debug");
        assert!(filter.contains("product_catalog=debug"));
        assert!(filter.contains("catalog_server=debug"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_tracing("warn");
        init_tracing("info");
    }
}
