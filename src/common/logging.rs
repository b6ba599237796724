//! Logging and tracing configuration
//!
//! Logs always go to stderr: stdout is reserved for command output such as
//! `ara config list`, which is meant to be piped.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a given number of `-v` flags
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "ara=warn,warn",
        1 => "ara=info,warn",
        2 => "ara=debug,warn",
        _ => "ara=trace,info",
    }
}

/// Initialize tracing for the CLI (stderr logging)
///
/// `RUST_LOG` takes precedence over the verbosity flag when set.
pub fn init_cli(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
