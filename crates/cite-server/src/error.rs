//! Error types for cite-server

use std::path::PathBuf;

use crate::engine::{EngineError, UnsupportedLocale};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was rejected before the engine was involved, or the
    /// style could not be parsed.
    #[error("{0}")]
    BadInput(String),

    #[error("Unsupported locale: {tag}")]
    UnsupportedLocale { tag: String },

    /// Any other failure raised by the citation engine.
    #[error("Citation engine error: {0}")]
    Engine(String),

    #[error("Failed to read locale file {path}: {source}")]
    LocaleFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bundled locale {0} is missing or not valid UTF-8")]
    BundledLocale(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// Short machine-readable classification reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::BadInput(_) => "bad_input",
            Error::UnsupportedLocale { .. } => "unsupported_locale",
            _ => "internal",
        }
    }
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidStyle(message) => {
                Error::BadInput(format!("Invalid style: {message}"))
            }
            EngineError::Locale(UnsupportedLocale { tag }) => Error::UnsupportedLocale { tag },
            EngineError::Processing(message) => Error::Engine(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
