use std::path::PathBuf;

use pw_codegen::CodegenError;
use pw_schema::SchemaError;
use thiserror::Error;

/// A failure of a driver command.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: invalid configuration: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("{}: {source}", path.display())]
    Codegen {
        path: PathBuf,
        #[source]
        source: CodegenError,
    },
}

impl DriverError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DriverError::Io {
            path: path.into(),
            source,
        }
    }
}
