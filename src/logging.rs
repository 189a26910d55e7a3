use crate::constants::LOG_ENV_VAR;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter for a `-v` count
fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "dirsort=info",
        2 => "dirsort=debug",
        _ => "dirsort=trace",
    }
}

/// Install the global tracing subscriber.
///
/// `DIRSORT_LOG` takes precedence over `verbosity`. Logs go to stderr so that
/// stdout only carries the plan and the report.
pub fn init_logger(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
