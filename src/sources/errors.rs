//! Source error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::resolver::ResolveError;
use crate::sources::remote::TransportError;

/// Error returned by every [`ManifestSource`](crate::sources::ManifestSource) operation.
///
/// A lookup that legitimately finds nothing is not an error: those
/// operations return `Ok(None)`.
#[derive(Debug, Error)]
pub enum HubError {
    /// The query transport failed after the retry budget was exhausted.
    #[error("while executing query to {operation}")]
    Transport {
        operation: &'static str,
        #[source]
        source: TransportError,
    },

    /// The transport succeeded but the response did not have the expected shape.
    #[error("while decoding response of query to {operation}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot find latest revision for Interface `{path}`")]
    LatestRevisionNotFound { path: String },

    #[error("invalid manifest reference `{reference}`: {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The local directory could not be loaded; no source is returned.
    #[error("while loading Hub manifest {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },
}

/// Failure while loading one manifest document from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("while walking through manifest dir")]
    Walk(#[from] walkdir::Error),

    #[error("while reading file")]
    Io(#[from] std::io::Error),

    #[error("while converting YAML to JSON")]
    Yaml(#[from] serde_yaml::Error),

    #[error("while decoding {kind} document")]
    Decode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} `{path}` revision `{revision}` is defined more than once")]
    DuplicateRevision {
        kind: &'static str,
        path: String,
        revision: String,
    },

    #[error("TypeInstance `{id}` is defined more than once")]
    DuplicateTypeInstance { id: String },
}
