//! Error types

use std::path::PathBuf;

use bibtidy_bibtex::ParseError;

use crate::config::ConfigError;

/// Errors that abort a normalization run
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Malformed BibTeX input: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl NormalizeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NormalizeError::Io {
            path: path.into(),
            source,
        }
    }
}
