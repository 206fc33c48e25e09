use tracing_subscriber::EnvFilter;

/// Log to stderr. `-v` forces debug, `-vv` trace; otherwise `TRIAGE_LOG` or warn.
pub fn init(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("TRIAGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
