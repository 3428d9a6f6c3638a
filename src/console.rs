use colored::{Color, Colorize};
use parking_lot::Mutex;
use std::io::{self, IsTerminal, Write};

use crate::error::{Error, Result};
use crate::level::Level;
use crate::sink::{LogSink, RecordView};

/// Whether the console sink decorates its output with ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Color only when stdout is a terminal.
    #[default]
    Auto,
    /// Skip the terminal check and always decorate through `colored`.
    /// `colored` still applies its own process-wide checks, so escapes
    /// only reach a pipe when `CLICOLOR_FORCE` is set or
    /// `colored::control::set_override(true)` was called.
    Always,
    Never,
}

impl ColorChoice {
    fn should_colorize(self) -> bool {
        match self {
            ColorChoice::Auto => io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Human-oriented sink writing one line per record.
///
/// Resolved records look like
/// `[10:00:00] INFO: src/main.rs:42 [ server started ] {"port": 8080}`;
/// without a call site the `path:line` segment is dropped.
pub struct ConsoleSink {
    writer: Mutex<Box<dyn Write + Send>>,
    colorize: bool,
}

impl ConsoleSink {
    /// Console sink on standard output.
    pub fn stdout(color: ColorChoice) -> Self {
        Self::from_writer(io::stdout(), color)
    }

    pub fn from_writer(writer: impl Write + Send + 'static, color: ColorChoice) -> Self {
        ConsoleSink {
            writer: Mutex::new(Box::new(writer)),
            colorize: color.should_colorize(),
        }
    }

    fn paint(&self, text: &str, color: Option<Color>) -> String {
        match color {
            Some(color) if self.colorize => text.color(color).to_string(),
            _ => text.to_string(),
        }
    }
}

fn level_color(level: Level) -> Option<Color> {
    match level {
        Level::Debug => Some(Color::Magenta),
        Level::Info => Some(Color::Blue),
        Level::Warn => Some(Color::Yellow),
        Level::Error => Some(Color::Red),
        Level::Trace => None,
    }
}

impl LogSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    fn render(&self, view: &RecordView<'_>) -> Result<Vec<u8>> {
        let fields = serde_json::to_string_pretty(view.fields)?;
        let time = view.timestamp.format("[%H:%M:%S]").to_string();
        let time = self.paint(&time, Some(Color::Green));
        let level = self.paint(&format!("{}:", view.level), level_color(view.level));
        let message = self.paint(view.message, Some(Color::Cyan));

        let line = if view.site.resolved {
            format!(
                "{} {} {}:{} [ {} ] {}\n",
                time,
                level,
                self.paint(&view.site.file, Some(Color::BrightCyan)),
                self.paint(&view.site.line.to_string(), Some(Color::BrightCyan)),
                message,
                self.paint(&fields, Some(Color::BrightWhite)),
            )
        } else {
            format!(
                "{} {} [ {} ] {}\n",
                time,
                level,
                message,
                self.paint(&fields, Some(Color::White)),
            )
        };
        Ok(line.into_bytes())
    }

    fn write(&self, rendered: &[u8]) -> Result<()> {
        let mut writer = self.writer.lock();
        writer
            .write_all(rendered)
            .and_then(|_| writer.flush())
            .map_err(|source| Error::Write { sink: self.name(), source })
    }
}
