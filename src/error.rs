//! Error types for the session booklet library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the session booklet library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source document could not be loaded
    #[error("Failed to load PDF {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// Neither input directory contained a session file
    #[error(
        "No Ses*.pdf files found in '{}' or '{}'",
        .summary_dir.display(),
        .problem_dir.display()
    )]
    NoSessions {
        summary_dir: PathBuf,
        problem_dir: PathBuf,
    },

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Page has no usable MediaBox
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid session id
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),
}
