use std::path::PathBuf;

/// Fatal ingestion errors. Any of these aborts the batch.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed XML at byte {position}: {message}")]
    Xml { message: String, position: u64 },
    #[error("document has no <nmaprun> root element")]
    MissingRoot,
    #[error("vulnerability '{id}' has invalid cvss score {value:?}")]
    InvalidSeverity { id: String, value: Option<String> },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach the originating file to an error raised while parsing its contents.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            err @ (Self::Io { .. } | Self::File { .. }) => err,
            err => Self::File {
                path: path.into(),
                source: Box::new(err),
            },
        }
    }
}
