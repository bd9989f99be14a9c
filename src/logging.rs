use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr; stdout carries responses.
///
/// `RUST_LOG` wins when set, otherwise `driver_rank=info` (or `debug` with verbose).
pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "driver_rank=debug"
    } else {
        "driver_rank=info"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
