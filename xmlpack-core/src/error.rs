use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlpackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("cannot open archive {path}: {source}")]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("cannot write archive {path}: {source}")]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("{phase} worker #{index} failed: {source}")]
    WorkerFailure {
        phase: &'static str,
        index: usize,
        #[source]
        source: Box<XmlpackError>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("random source unavailable: {0}")]
    Entropy(#[from] getrandom::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("cannot start {requested} while pipeline is {current}")]
    InvalidPhase {
        requested: &'static str,
        current: &'static str,
    },

    #[error("worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl XmlpackError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        XmlpackError::MalformedDocument(msg.into())
    }

    /// Strips any `WorkerFailure` wrapping and returns the error raised by the unit of work.
    pub fn root_cause(&self) -> &XmlpackError {
        match self {
            XmlpackError::WorkerFailure { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, XmlpackError>;
