use std::fmt;
use std::path::PathBuf;

/// Failures surfaced to the user when loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("data file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

/// Non-fatal conditions reported alongside a filter result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterWarning {
    /// No posting matches the current criteria.
    EmptyResult,
}

impl fmt::Display for FilterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterWarning::EmptyResult => {
                f.write_str("No postings match the current filters. Try changing them.")
            }
        }
    }
}
