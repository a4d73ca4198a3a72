//! Report path resolution.

use std::path::{Path, PathBuf};

use vkfriends_core::ReportFormat;

/// File stem used when the report path names a directory.
pub const DEFAULT_REPORT_STEM: &str = "report";

/// Resolves the file a report of `format` is written to.
///
/// - an existing directory gets `report.<ext>` inside it
/// - a path with an extension is used as is
/// - any other path gets `.<ext>` appended
pub fn resolve_report_path(path: &Path, format: ReportFormat) -> PathBuf {
    if path.as_os_str().is_empty() || path.is_dir() {
        return path.join(format!("{DEFAULT_REPORT_STEM}{}", format.extension()));
    }

    if path.extension().is_some() {
        return path.to_path_buf();
    }

    let mut file = path.as_os_str().to_owned();
    file.push(format.extension());
    PathBuf::from(file)
}
