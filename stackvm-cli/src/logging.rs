//! Diagnostic logging setup.
//!
//! Engine events go through `tracing` to stderr. The filter comes from
//! `RUST_LOG` when set, `warn` otherwise; `--trace` forces `trace`.

use tracing_subscriber::EnvFilter;

pub fn init(trace: bool) {
    let filter = if trace {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
