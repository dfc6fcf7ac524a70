//! Resolution error types.

use thiserror::Error;

/// Error while resolving, filtering or ordering revisions.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid revision `{revision}` for `{path}`")]
    InvalidRevision {
        path: String,
        revision: String,
        #[source]
        source: semver::Error,
    },

    #[error("revision `{revision}` of `{path}` is defined more than once")]
    DuplicateRevision { path: String, revision: String },

    #[error("no revisions found for `{path}`")]
    NoRevisions { path: String },

    #[error("invalid path pattern `{pattern}`")]
    InvalidPathPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_revision_keeps_source() {
        let source = semver::Version::parse("one").unwrap_err();
        let err = ResolveError::InvalidRevision {
            path: "cap.interface.db.install".to_string(),
            revision: "one".to_string(),
            source,
        };

        assert_eq!(
            err.to_string(),
            "invalid revision `one` for `cap.interface.db.install`"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_duplicate_revision_message() {
        let err = ResolveError::DuplicateRevision {
            path: "cap.implementation.a".to_string(),
            revision: "1.0.0".to_string(),
        };
        assert!(err.to_string().contains("more than once"));
    }
}
