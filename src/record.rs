use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize, Serializer};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::level::Level;

/// One structured log event as produced at a call site.
///
/// Built by the logging API ([`emit!`](crate::emit) or the tracing layer)
/// and handed to [`Handler::handle`](crate::handler::Handler::handle).
/// The handler only ever borrows it.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
    /// Attributes in call order. Keys may repeat.
    pub attributes: Vec<Attr>,
    /// Call site captured by the logging API, `None` when it was not
    /// available.
    pub location: Option<SourceLocation>,
}

impl Record {
    /// Create a record stamped with the current local time.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Record {
            timestamp: Local::now(),
            level,
            message: message.into(),
            attributes: Vec::new(),
            location: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push(Attr::new(key, value));
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

/// Raw call-site information as the compiler reported it.
///
/// `file` is whatever `file!()` expanded to, which may be relative to the
/// crate being compiled or absolute (path remapping, generated code).
/// `function` is the path of the enclosing function when the logging API
/// can name it; `tracing` metadata cannot, so events only carry
/// `module_path`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
    pub module_path: Option<&'static str>,
    pub function: Option<&'static str>,
}

/// A single key/value attribute of a record.
#[derive(Debug, Clone)]
pub struct Attr {
    pub key: String,
    pub value: AttrValue,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Attr {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Value attached to a record, unwrapped to its native representation.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Str(String),
    I64(i64),
    U64(u64),
    I128(i128),
    U128(u128),
    F64(f64),
    Bool(bool),
    /// An error rendered with its source chain, `outer: inner: root`.
    Error(String),
    Json(serde_json::Value),
    /// Arbitrary serializable value, converted when the record is rendered.
    Any(Arc<dyn ToJson>),
}

impl AttrValue {
    /// Wrap any serializable value. Conversion is deferred until rendering,
    /// so a value whose `Serialize` impl fails makes the whole record fail.
    pub fn any<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + fmt::Debug + 'static,
    {
        AttrValue::Any(Arc::new(value))
    }

    pub fn error(err: &(dyn StdError + 'static)) -> Self {
        let mut rendered = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            rendered.push_str(": ");
            rendered.push_str(&cause.to_string());
            source = cause.source();
        }
        AttrValue::Error(rendered)
    }
}

/// Type-erased JSON conversion for [`AttrValue::Any`].
pub trait ToJson: Send + Sync + fmt::Debug {
    fn to_json(&self) -> serde_json::Result<serde_json::Value>;
}

impl<T> ToJson for T
where
    T: Serialize + Send + Sync + fmt::Debug,
{
    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttrValue::Str(v) | AttrValue::Error(v) => serializer.serialize_str(v),
            AttrValue::I64(v) => serializer.serialize_i64(*v),
            AttrValue::U64(v) => serializer.serialize_u64(*v),
            AttrValue::I128(v) => serializer.serialize_i128(*v),
            AttrValue::U128(v) => serializer.serialize_u128(*v),
            // JSON has no NaN or infinity; refuse rather than write `null`.
            AttrValue::F64(v) if !v.is_finite() => Err(<S::Error as serde::ser::Error>::custom(
                format_args!("non-finite float {} has no JSON representation", v),
            )),
            AttrValue::F64(v) => serializer.serialize_f64(*v),
            AttrValue::Bool(v) => serializer.serialize_bool(*v),
            AttrValue::Json(v) => v.serialize(serializer),
            AttrValue::Any(v) => v
                .to_json()
                .map_err(<S::Error as serde::ser::Error>::custom)?
                .serialize(serializer),
        }
    }
}

macro_rules! attr_value_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for AttrValue {
                fn from(value: $source) -> Self {
                    AttrValue::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

attr_value_from!(I64 as i64: i8, i16, i32, i64);
attr_value_from!(U64 as u64: u8, u16, u32, u64);
attr_value_from!(F64 as f64: f32, f64);
attr_value_from!(I128 as i128: i128);
attr_value_from!(U128 as u128: u128);
attr_value_from!(Bool as bool: bool);
attr_value_from!(Str as String: String, &str);
attr_value_from!(Json as serde_json::Value: serde_json::Value);

impl From<usize> for AttrValue {
    fn from(value: usize) -> Self {
        AttrValue::U64(value as u64)
    }
}

impl From<isize> for AttrValue {
    fn from(value: isize) -> Self {
        AttrValue::I64(value as i64)
    }
}

/// Durable shape of one record in the log file.
///
/// `fields` is generic so the file sink can serialize a borrowed
/// [`FieldMap`](crate::fields::FieldMap) directly, while readers parse
/// it back into a plain JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry<F = serde_json::Map<String, serde_json::Value>> {
    pub date: String,
    pub time: String,
    pub file: String,
    pub line: u32,
    pub function: String,
    pub level: String,
    pub message: String,
    pub fields: F,
}
