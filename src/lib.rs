pub mod caller;
pub mod config;
pub mod console;
pub mod error;
pub mod fields;
pub mod file;
pub mod handler;
pub mod init;
pub mod layer;
pub mod level;
pub mod record;
pub mod sink;

mod macros;

pub use config::HandlerConfig;
pub use error::{Error, Result};
pub use handler::Handler;
pub use level::Level;
pub use record::{Attr, AttrValue, LogEntry, Record};
