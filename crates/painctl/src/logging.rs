//! Log subscriber setup.
//!
//! `PAIN_LOG` takes an `EnvFilter` directive (falls back to `RUST_LOG`).

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default = if verbose { "pain=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_env("PAIN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
