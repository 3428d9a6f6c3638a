use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::record::SourceLocation;

/// Working directory of the process, captured once and never changed.
///
/// Absolute call-site paths are reported relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRoot(PathBuf);

impl ProcessRoot {
    /// Capture the current working directory, or `.` if it cannot be read.
    pub fn capture() -> Self {
        std::env::current_dir()
            .map(ProcessRoot)
            .unwrap_or_else(|_| ProcessRoot(PathBuf::from(".")))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProcessRoot(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Path of `file` relative to this root with `/` separators.
    ///
    /// Paths outside the root, and paths that are already relative, are
    /// kept as they are apart from separator normalization.
    pub fn relativize(&self, file: &str) -> String {
        let path = Path::new(file);
        let relative = path.strip_prefix(&self.0).unwrap_or(path);
        to_slash(relative)
    }
}

fn to_slash(path: &Path) -> String {
    let lossy = path.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        lossy.into_owned()
    } else {
        lossy.replace(MAIN_SEPARATOR, "/")
    }
}

/// Call site of a record after resolution against the process root.
///
/// Computed once per record and shared by every sink, so all of them
/// report the same location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedCallSite {
    /// Path relative to the process root, `/`-separated. Empty when
    /// unresolved.
    pub file: String,
    /// Path exactly as the compiler reported it.
    pub absolute: String,
    pub line: u32,
    /// Enclosing function of the call, or its module path when the
    /// function is unknown. Empty when unresolved.
    pub function: String,
    pub resolved: bool,
}

/// Turns raw [`SourceLocation`]s into [`ResolvedCallSite`]s.
///
/// Locations are captured by the logging API at the call itself
/// (`file!()`/`line!()` via tracing callsite metadata or [`emit!`](crate::emit)),
/// so there are no wrapper frames to skip.
#[derive(Debug, Clone)]
pub struct CallerResolver {
    root: ProcessRoot,
}

impl CallerResolver {
    pub fn new(root: ProcessRoot) -> Self {
        CallerResolver { root }
    }

    pub fn resolve(&self, location: Option<&SourceLocation>) -> ResolvedCallSite {
        match location {
            Some(loc) => ResolvedCallSite {
                file: self.root.relativize(loc.file),
                absolute: loc.file.to_string(),
                line: loc.line,
                function: loc
                    .function
                    .or(loc.module_path)
                    .unwrap_or_default()
                    .to_string(),
                resolved: true,
            },
            None => ResolvedCallSite::default(),
        }
    }
}
