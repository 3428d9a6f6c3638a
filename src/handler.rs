use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::caller::{CallerResolver, ProcessRoot};
use crate::config::HandlerConfig;
use crate::console::ConsoleSink;
use crate::error::Result;
use crate::fields;
use crate::file::FileSink;
use crate::level::{Level, Leveler, MinLevel};
use crate::record::Record;
use crate::sink::{LogSink, RecordView};

/// Fans each accepted record out to the console, the log file and any
/// extra sinks.
///
/// The call site is resolved once per record and shared by every sink.
/// A record is rendered for all sinks before the first write; writes then
/// happen in sink order and stop at the first failure. There is no retry.
pub struct Handler {
    leveler: Arc<dyn Leveler>,
    resolver: CallerResolver,
    sinks: Vec<Box<dyn LogSink>>,
    log_file: Option<PathBuf>,
}

impl Handler {
    /// Handler writing to stdout and `storage/logs/app_YYYY-MM-DD.log`.
    ///
    /// **Returns**
    /// - `Err(Error::OpenLogFile)` if the dated log file cannot be opened.
    pub fn new(debug: bool) -> Result<Self> {
        Self::from_config(HandlerConfig::new(debug))
    }

    pub fn from_config(config: HandlerConfig) -> Result<Self> {
        let path = config.log_file_path(Local::now().date_naive());
        let file = FileSink::open(&path)?;

        let mut handler = Handler::builder(MinLevel(config.min_level()), config.root.clone())
            .with_sink(ConsoleSink::stdout(config.color))
            .with_sink(file)
            .build();
        handler.log_file = Some(path);
        Ok(handler)
    }

    pub fn builder(leveler: impl Leveler + 'static, root: ProcessRoot) -> HandlerBuilder {
        HandlerBuilder {
            leveler: Arc::new(leveler),
            resolver: CallerResolver::new(root),
            sinks: Vec::new(),
        }
    }

    /// Whether records of `level` should reach [`Handler::handle`].
    pub fn enabled(&self, level: Level) -> bool {
        self.leveler.accept(level)
    }

    pub fn min_level(&self) -> Level {
        self.leveler.min_level()
    }

    /// Path of the dated log file, when built from a [`HandlerConfig`].
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Deliver one accepted record to every sink.
    ///
    /// **Returns**
    /// - `Ok(())` once every sink has written the record.
    /// - `Err(Error::Serialize)` if a field cannot be rendered; nothing
    ///   was written anywhere.
    /// - `Err(Error::Write)` from the first sink whose write failed; later
    ///   sinks were not attempted.
    pub fn handle(&self, record: &Record) -> Result<()> {
        let site = self.resolver.resolve(record.location.as_ref());
        let fields = fields::extract(record);
        let view = RecordView {
            timestamp: record.timestamp,
            level: record.level,
            site: &site,
            message: &record.message,
            fields: &fields,
        };

        let rendered = self
            .sinks
            .iter()
            .map(|sink| sink.render(&view))
            .collect::<Result<Vec<_>>>()?;

        for (sink, bytes) in self.sinks.iter().zip(&rendered) {
            sink.write(bytes)?;
        }
        Ok(())
    }
}

/// Assembles a [`Handler`] from a leveler, a process root and sinks.
///
/// Sinks are written in the order they were added.
pub struct HandlerBuilder {
    leveler: Arc<dyn Leveler>,
    resolver: CallerResolver,
    sinks: Vec<Box<dyn LogSink>>,
}

impl HandlerBuilder {
    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn build(self) -> Handler {
        Handler {
            leveler: self.leveler,
            resolver: self.resolver,
            sinks: self.sinks,
            log_file: None,
        }
    }
}
