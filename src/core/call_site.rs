//! Call-site capture
//!
//! Everything the library knows about "where a log call came from" passes
//! through [`CallSite`]. It is built from `#[track_caller]` locations and,
//! when a macro is involved, the caller's `module_path!()`. Tests can build
//! one by hand.

use std::panic::Location;
use std::path::Path;

/// Fallback logger name when no caller identity is available
pub const UNKNOWN_CALLER: &str = "unknown.unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub module_path: Option<&'static str>,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self {
            file,
            line,
            module_path: None,
        }
    }

    #[must_use]
    pub const fn with_module_path(mut self, module_path: &'static str) -> Self {
        self.module_path = Some(module_path);
        self
    }

    /// Location of whoever called the outermost `#[track_caller]` function
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// Final path component of the source file
    pub fn file_name(&self) -> &'static str {
        Path::new(self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(self.file)
    }
}

/// Turn a caller's qualified path into a dotted logger name.
///
/// `project_root` is stripped first, then path separators (`::` and `/`)
/// become `.` and anything outside `[A-Za-z0-9_.-]` becomes `_`.
pub fn derive_logger_name(qualified: Option<&str>, project_root: &str) -> String {
    let qualified = match qualified {
        Some(q) if !q.is_empty() => q,
        _ => return UNKNOWN_CALLER.to_string(),
    };
    let stripped = qualified.strip_prefix(project_root).unwrap_or(qualified);
    let dotted = stripped.replace("::", ".").replace('/', ".");
    let name: String = dotted
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.is_empty() {
        UNKNOWN_CALLER.to_string()
    } else {
        name
    }
}

/// Capture the current call site including the enclosing module path
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::core::CallSite::new(file!(), line!()).with_module_path(module_path!())
    };
}
