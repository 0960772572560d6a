//! Error kinds surfaced by the pipeline.
//!
//! Every stage either succeeds or aborts the whole run; errors carry the
//! stage name and the file involved so `main` can print one diagnostic.

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A required, externally produced input file is absent or unreadable.
    #[error("[{stage}] required input not found: {} ({source})", .path.display())]
    MissingInput {
        stage: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external build tool failed or produced nothing.
    #[error("[{stage}] {message}")]
    ExternalTool { stage: &'static str, message: String },

    /// Walking, creating a directory or writing an output failed.
    #[error("[{stage}] I/O failure on {}: {source}", .path.display())]
    Io {
        stage: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured template file is not usable.
    #[error("template {}: {message}", .path.display())]
    Template { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(stage: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            stage,
            path: path.into(),
            source,
        }
    }

    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::MissingInput { stage, .. }
            | Error::ExternalTool { stage, .. }
            | Error::Io { stage, .. } => stage,
            Error::Template { .. } => "config",
        }
    }
}
