//! Logging setup based on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is not set.
///
/// The GPU stack is very chatty at `debug`, so its crates are capped at `info`.
pub const DEFAULT_FILTER: &str = "debug,wgpu_core=info,wgpu_hal=info,naga=info";

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence over [`DEFAULT_FILTER`].
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    init_with_filter(filter);
}

/// Install the global fmt subscriber with an explicit filter.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_filter(filter: impl Into<EnvFilter>) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter.into())
        .try_init();

    if result.is_err() {
        tracing::trace!("global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_with_filter("warn");
        init_with_filter("warn");
    }
}
