//! Log output for the CLI.
//!
//! Events go to stderr so stdout carries only command output. Filtering
//! follows `RUST_LOG` and defaults to `info`:
//!
//! ```bash
//! RUST_LOG=linklet=debug linklet resolve 4dL2Zk1a0Bq
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

pub fn init_telemetry(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}
