use std::error::Error;

use dual_log_sink::init::init_tracing;
use dual_log_sink::{emit, AttrValue, Level};
use tracing::{debug, error, info, warn};

fn main() -> Result<(), Box<dyn Error>> {
    // Writes to stdout and storage/logs/app_YYYY-MM-DD.log.
    let handler = init_tracing(true);

    info!(port = 8080, "server started");
    debug!(cache = "warm", entries = 1024, "cache ready");
    warn!(elapsed_ms = 1250, "slow request");

    let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
    let err: &(dyn Error + 'static) = &io_err;
    error!(error = err, peer = "10.0.0.7:5432", "database unreachable");

    // Direct API: delivery errors come back to the caller.
    emit!(
        handler,
        Level::Info,
        "shutdown requested",
        signal = "SIGTERM",
        pending = AttrValue::any(vec!["flush", "close"]),
    )?;

    Ok(())
}
