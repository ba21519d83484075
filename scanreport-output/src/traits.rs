use crate::report::Report;

/// Renders a consolidated scan report into one output format.
pub trait ReportFormatter: Send + Sync {
    fn format(&self, report: &Report<'_>) -> Result<String, OutputError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("formatting error: {0}")]
    FormatError(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::fmt::Error> for OutputError {
    fn from(e: std::fmt::Error) -> Self {
        Self::FormatError(e.to_string())
    }
}
