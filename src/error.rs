//! Error type shared by the project host, the parser and the pipeline.

use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while reading a project or generating artifacts.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("the {artifact} artifact has not been produced yet")]
    MissingArtifact { artifact: &'static str },

    #[error("entity '{entity}' has no mappable fields")]
    EmptyEntity { entity: String },

    #[error("stage '{stage}' failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<GenerateError>,
    },

    #[error("unsupported project layout: {0}")]
    ProjectLayout(String),
}

impl GenerateError {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        GenerateError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        GenerateError::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
