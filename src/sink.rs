use chrono::{DateTime, Local};

use crate::caller::ResolvedCallSite;
use crate::error::Result;
use crate::fields::FieldMap;
use crate::level::Level;

/// Everything a sink needs to render one record.
///
/// Borrowed from the [`Handler::handle`](crate::handler::Handler::handle)
/// call that resolved it; sinks must not keep it around.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub site: &'a ResolvedCallSite,
    pub message: &'a str,
    pub fields: &'a FieldMap,
}

/// Synchronous destination for records accepted by the handler.
///
/// Rendering and writing are split so the handler can render a record
/// for every sink before any of them is written. A record that fails to
/// render in one sink therefore shows up in none.
pub trait LogSink: Send + Sync {
    /// Short name used in error messages, e.g. `"console"`.
    fn name(&self) -> &'static str;

    /// Render a record into the exact bytes this sink will append.
    ///
    /// **Returns**
    /// - `Err(Error::Serialize)` if a field value has no JSON form.
    fn render(&self, view: &RecordView<'_>) -> Result<Vec<u8>>;

    /// Append previously rendered bytes to the underlying stream.
    ///
    /// Implementations serialize concurrent calls so bytes of two
    /// records never interleave.
    fn write(&self, rendered: &[u8]) -> Result<()>;
}
