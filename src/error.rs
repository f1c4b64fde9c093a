use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while reading a spreadsheet archive and extracting its media.
#[derive(Debug, Error)]
pub enum Error {
    #[error("source document not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("not a valid zip archive: {reason}")]
    ArchiveFormat { reason: String },

    #[error("permission denied: {}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("output directory already exists: {}", .path.display())]
    OutputExists { path: PathBuf },

    #[error("entry '{entry}' would be written outside the output directory")]
    UnsafeEntryPath { entry: String },

    #[error("entry '{entry}' uses unsupported compression method {method}")]
    UnsupportedCompression { entry: String, method: u16 },

    #[error("entry '{entry}' is encrypted")]
    Encrypted { entry: String },

    #[error("cannot determine the home directory")]
    HomeDirUnavailable,

    /// A failure after the output folder was created; the folder may hold
    /// some of the media already.
    #[error("extraction stopped, partial output left in {}", .output_dir.display())]
    Partial {
        output_dir: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// The underlying error, looking through [`Error::Partial`].
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Partial { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn archive(reason: impl Into<String>) -> Self {
        Error::ArchiveFormat {
            reason: reason.into(),
        }
    }

    /// Attach a path to an I/O error, splitting out permission failures.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Error::PermissionDenied { path, source },
            _ => Error::Io { path, source },
        }
    }

    /// Like [`Error::io`], for failures opening the source document.
    pub(crate) fn source_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Error::NotFound { path: path.into() },
            _ => Error::io(path, source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
