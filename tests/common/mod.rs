use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

use dual_log_sink::caller::ProcessRoot;
use dual_log_sink::console::{ColorChoice, ConsoleSink};
use dual_log_sink::file::FileSink;
use dual_log_sink::level::MinLevel;
use dual_log_sink::{Handler, Level, LogEntry};

/// In-memory stream shared between a sink and the test.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).unwrap()
    }

    /// Parse every JSON object written so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        let bytes = self.0.lock().clone();
        serde_json::Deserializer::from_slice(&bytes)
            .into_iter::<LogEntry>()
            .collect::<Result<_, _>>()
            .unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Captured {
    pub handler: Handler,
    pub console: SharedBuf,
    pub file: SharedBuf,
}

pub fn captured(min: Level) -> Captured {
    let console = SharedBuf::default();
    let file = SharedBuf::default();
    let handler = Handler::builder(MinLevel(min), ProcessRoot::capture())
        .with_sink(ConsoleSink::from_writer(console.clone(), ColorChoice::Never))
        .with_sink(FileSink::from_writer(file.clone()))
        .build();
    Captured {
        handler,
        console,
        file,
    }
}
