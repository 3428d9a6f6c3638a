use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fields::FieldMap;
use crate::record::LogEntry;
use crate::sink::{LogSink, RecordView};

/// Append-only structured sink writing one indented JSON [`LogEntry`] per
/// record, each followed by a newline.
///
/// The file is never rewritten, rotated or truncated.
pub struct FileSink {
    writer: Mutex<Box<dyn Write + Send>>,
    path: Option<PathBuf>,
}

impl FileSink {
    /// Open `path` for appending, creating it and its parent directories
    /// if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open_err = |source| Error::OpenLogFile {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(open_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_err)?;

        Ok(FileSink {
            writer: Mutex::new(Box::new(file)),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        FileSink {
            writer: Mutex::new(Box::new(writer)),
            path: None,
        }
    }

    /// Location on disk, `None` for sinks built from a writer.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Build the entry persisted for `view`.
    pub fn entry<'a>(view: &RecordView<'a>) -> LogEntry<&'a FieldMap> {
        LogEntry {
            date: view.timestamp.format("%Y-%m-%d").to_string(),
            time: view.timestamp.format("%H:%M:%S").to_string(),
            file: view.site.file.clone(),
            line: view.site.line,
            function: view.site.function.clone(),
            level: view.level.as_str().to_string(),
            message: view.message.to_string(),
            fields: view.fields,
        }
    }
}

impl LogSink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    fn render(&self, view: &RecordView<'_>) -> Result<Vec<u8>> {
        let entry = Self::entry(view);
        let mut bytes = serde_json::to_vec_pretty(&entry)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn write(&self, rendered: &[u8]) -> Result<()> {
        let mut writer = self.writer.lock();
        writer
            .write_all(rendered)
            .and_then(|_| writer.flush())
            .map_err(|source| Error::Write { sink: self.name(), source })
    }
}
