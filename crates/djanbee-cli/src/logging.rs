use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr; `RUST_LOG` wins over the `-v` count.
pub(crate) fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

pub(crate) fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,djanbee=debug",
        _ => "warn,djanbee=trace",
    }
}
