//! Error type for settings persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading or persisting the `config.ron` settings file.
///
/// Every filesystem variant carries the path involved so a world host can
/// report which file in which config directory went wrong.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("could not read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file or its directory could not be written.
    #[error("could not write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid RON for this config schema.
    #[error("malformed settings in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// In-memory settings could not be rendered to RON.
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}

impl ConfigError {
    /// Path of the file or directory the error refers to, when there is one.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::Malformed { path, .. } => {
                Some(path)
            }
            Self::Serialize(_) => None,
        }
    }
}
