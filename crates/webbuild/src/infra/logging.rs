//! Tracing subscriber setup for the command-line binary.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a full `EnvFilter` directive.
pub const LOG_ENV: &str = "WEBBUILD_LOG";

/// Install the global fmt subscriber writing to stderr.
///
/// `verbosity` counts `-v` flags. `WEBBUILD_LOG` wins when set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,webbuild=info",
        1 => "warn,webbuild=debug",
        _ => "webbuild=trace,info",
    }
}
