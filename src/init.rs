use crate::config::HandlerConfig;
use crate::error::Result;
use crate::handler::Handler;
use crate::layer::DualSinkLayer;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Install the dual sink as the global `tracing` subscriber.
///
/// **Parameters**
/// - `config`: [`HandlerConfig`] selecting level, log directory and colors.
///
/// **Returns**
/// - The shared [`Handler`], so the embedding application can also log
///   through [`emit!`](crate::emit) and get delivery errors back.
/// - `Err(Error::OpenLogFile)` if the dated log file cannot be opened.
/// - `Err(Error::SetGlobalDefault)` if a global subscriber already exists.
pub fn try_init_tracing_with_config(config: HandlerConfig) -> Result<Arc<Handler>> {
    let handler = Arc::new(Handler::from_config(config)?);
    let subscriber = Registry::default().with(DualSinkLayer::new(Arc::clone(&handler)));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(handler)
}

/// Same as [`try_init_tracing_with_config`], but a missing log destination
/// is fatal: the process cannot run without somewhere to log.
pub fn init_tracing_with_config(config: HandlerConfig) -> Arc<Handler> {
    try_init_tracing_with_config(config)
        .unwrap_or_else(|e| panic!("failed to initialize logging: {}", e))
}

/// Initialize logging with the default layout under `storage/logs`.
///
/// **Parameters**
/// - `debug`: accept `Debug` records and pretty-print file entries.
pub fn init_tracing(debug: bool) -> Arc<Handler> {
    init_tracing_with_config(HandlerConfig::new(debug))
}
