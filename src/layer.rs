use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::subscriber::Interest;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::handler::Handler;
use crate::level::Level;
use crate::record::{Attr, AttrValue, Record, SourceLocation};

/// `tracing_subscriber` layer that turns events into [`Record`]s and hands
/// them to a [`Handler`] on the calling thread.
///
/// Events below the handler's minimum level are disabled through
/// [`Layer::enabled`], so `tracing` never builds them. Delivery errors
/// cannot travel back through the `tracing` macros, so they are reported
/// on stderr and counted.
pub struct DualSinkLayer {
    handler: Arc<Handler>,
    /// Events that reached `on_event`.
    pub total_events: Arc<AtomicU64>,
    /// Events written to every sink.
    pub delivered_events: Arc<AtomicU64>,
    /// Events the handler rejected with an error.
    pub failed_events: Arc<AtomicU64>,
}

impl DualSinkLayer {
    pub fn new(handler: Arc<Handler>) -> Self {
        Self {
            handler,
            total_events: Arc::new(AtomicU64::new(0)),
            delivered_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<S> Layer<S> for DualSinkLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        // `sometimes` keeps the per-event `enabled` check alive when another
        // subscriber with a lower minimum shares the callsite.
        if self.handler.enabled(Level::from(*metadata.level())) {
            Interest::always()
        } else {
            Interest::sometimes()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.handler.enabled(Level::from(*metadata.level()))
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(LevelFilter::from(self.handler.min_level()))
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        let meta = event.metadata();
        let level = Level::from(*meta.level());
        if !self.handler.enabled(level) {
            return;
        }

        let mut record = Record::new(level, String::new());
        let mut visitor = FieldVisitor {
            attributes: &mut record.attributes,
            message: &mut record.message,
        };
        event.record(&mut visitor);

        record.location = meta.file().map(|file| SourceLocation {
            file,
            line: meta.line().unwrap_or_default(),
            module_path: meta.module_path(),
            function: None,
        });

        match self.handler.handle(&record) {
            Ok(()) => {
                self.delivered_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.failed_events.fetch_add(1, Ordering::Relaxed);
                eprintln!("failed to deliver log record: {}", e);
            }
        }
    }
}

/// Collects an event's fields into record attributes, pulling out the
/// `message` field.
pub struct FieldVisitor<'a> {
    pub attributes: &'a mut Vec<Attr>,
    pub message: &'a mut String,
}

impl FieldVisitor<'_> {
    fn push(&mut self, field: &Field, value: AttrValue) {
        self.attributes.push(Attr::new(field.name(), value));
    }
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = value.to_string();
        } else {
            self.push(field, AttrValue::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, AttrValue::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, AttrValue::from(value));
    }

    fn record_i128(&mut self, field: &Field, value: i128) {
        self.push(field, AttrValue::from(value));
    }

    fn record_u128(&mut self, field: &Field, value: u128) {
        self.push(field, AttrValue::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, AttrValue::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, AttrValue::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, AttrValue::error(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // `info!("...")` records its message through `fmt::Arguments`.
        if field.name() == "message" {
            *self.message = format!("{:?}", value);
        } else {
            self.push(field, AttrValue::Str(format!("{:?}", value)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caller::ProcessRoot;
    use crate::console::{ColorChoice, ConsoleSink};
    use crate::file::FileSink;
    use crate::level::MinLevel;
    use crate::record::LogEntry;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::io::{self, Write};
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn layer(min: Level, file: SharedBuf) -> DualSinkLayer {
        let handler = Handler::builder(MinLevel(min), ProcessRoot::capture())
            .with_sink(ConsoleSink::from_writer(io::sink(), ColorChoice::Never))
            .with_sink(FileSink::from_writer(file))
            .build();
        DualSinkLayer::new(Arc::new(handler))
    }

    fn entries(buf: &SharedBuf) -> Vec<LogEntry> {
        let bytes = buf.0.lock().clone();
        serde_json::Deserializer::from_slice(&bytes)
            .into_iter::<LogEntry>()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn event_becomes_file_entry_with_call_site() {
        let file = SharedBuf::default();
        let layer = layer(Level::Info, file.clone());
        let delivered = Arc::clone(&layer.delivered_events);
        let subscriber = Registry::default().with(layer);

        let line = tracing::subscriber::with_default(subscriber, || {
            let line = line!() + 1;
            tracing::info!(port = 8080, tls = true, "server started");
            line
        });

        let entries = entries(&file);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.message, "server started");
        assert_eq!(entry.level, "INFO");
        assert_eq!(entry.file, "src/layer.rs");
        assert_eq!(entry.line, line);
        assert_eq!(entry.function, module_path!());
        assert_eq!(
            serde_json::Value::Object(entry.fields.clone()),
            serde_json::json!({"port": 8080, "tls": true})
        );
        assert_eq!(delivered.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn debug_events_follow_min_level() {
        let file = SharedBuf::default();
        let layer = layer(Level::Info, file.clone());
        let total = Arc::clone(&layer.total_events);
        assert_eq!(Layer::<Registry>::max_level_hint(&layer), Some(LevelFilter::INFO));
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(tracing::Level::DEBUG));
            tracing::debug!("hidden");
            tracing::trace!("hidden too");
        });
        assert!(entries(&file).is_empty());
        assert_eq!(total.load(Ordering::Relaxed), 0);

        let file = SharedBuf::default();
        let subscriber = Registry::default().with(self::layer(Level::Debug, file.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(attempt = 2, "cache miss");
        });
        let entries = entries(&file);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, "DEBUG");
    }

    #[test]
    fn rejected_events_are_counted_as_failed() {
        let file = SharedBuf::default();
        let layer = layer(Level::Info, file.clone());
        let total = Arc::clone(&layer.total_events);
        let delivered = Arc::clone(&layer.delivered_events);
        let failed = Arc::clone(&layer.failed_events);
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(ratio = f64::NAN, "ratio computed");
            tracing::info!(ratio = 0.5, "ratio computed");
        });

        assert_eq!(total.load(Ordering::Relaxed), 2);
        assert_eq!(delivered.load(Ordering::Relaxed), 1);
        assert_eq!(failed.load(Ordering::Relaxed), 1);
        let entries = entries(&file);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, "INFO");
        assert_eq!(entries[0].fields["ratio"], 0.5);
    }

    #[test]
    fn error_fields_keep_their_message() {
        let file = SharedBuf::default();
        let subscriber = Registry::default().with(layer(Level::Info, file.clone()));
        let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
        let err: &(dyn std::error::Error + 'static) = &io_err;
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(error = err, peer = ?"10.0.0.1", "dial failed");
        });
        let entries = entries(&file);
        assert_eq!(entries[0].fields["error"], "connection refused");
        assert_eq!(entries[0].fields["peer"], "\"10.0.0.1\"");
    }
}
