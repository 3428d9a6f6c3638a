use std::fmt;

/// Severity of a [`Record`](crate::record::Record).
///
/// Ordered from least to most severe. `Trace` only exists so that
/// `tracing::Level::TRACE` events have somewhere to land; no handler
/// configuration accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Level> for tracing::level_filters::LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => Self::TRACE,
            Level::Debug => Self::DEBUG,
            Level::Info => Self::INFO,
            Level::Warn => Self::WARN,
            Level::Error => Self::ERROR,
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Decides whether a record of a given level is processed at all.
///
/// The handler never filters by itself; the logging API asks the
/// leveler first and only hands accepted records to
/// [`Handler::handle`](crate::handler::Handler::handle).
pub trait Leveler: Send + Sync {
    /// Lowest level that is accepted.
    fn min_level(&self) -> Level;

    fn accept(&self, level: Level) -> bool {
        level >= self.min_level()
    }
}

/// Fixed minimum-level leveler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLevel(pub Level);

impl Leveler for MinLevel {
    fn min_level(&self) -> Level {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn min_level_accepts_equal_and_above() {
        let info = MinLevel(Level::Info);
        assert!(!info.accept(Level::Debug));
        assert!(info.accept(Level::Info));
        assert!(info.accept(Level::Error));

        let debug = MinLevel(Level::Debug);
        assert!(debug.accept(Level::Debug));
        assert!(!debug.accept(Level::Trace));
    }

    #[test]
    fn maps_tracing_levels() {
        assert_eq!(Level::from(tracing::Level::WARN), Level::Warn);
        assert_eq!(Level::from(tracing::Level::TRACE).to_string(), "TRACE");
        assert_eq!(
            tracing::level_filters::LevelFilter::from(Level::Info),
            tracing::level_filters::LevelFilter::INFO
        );
    }
}
