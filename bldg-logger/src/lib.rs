//! Subscriber setup for binaries built on the bldg crates; call [`init`] once at startup.

use tracing_subscriber::{
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level comes from `BLDG_LOG_LEVEL`.
pub fn init() -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&bldg_config::CONFIG.log_level));
    install(filter)
}

/// Install the global subscriber with an explicit filter directive, e.g. `"bldg_footprints=debug"`.
pub fn init_with_filter(directive: &str) -> Result<(), TryInitError> {
    install(default_filter(directive))
}

fn install(filter: EnvFilter) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
}

fn default_filter(directive: &str) -> EnvFilter {
    match EnvFilter::try_new(directive.to_lowercase()) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Invalid log filter {:?} ({}), falling back to info", directive, e);
            EnvFilter::new("info")
        }
    }
}
