//! Revision resolution: "latest" versus "exact".
//!
//! Latest always means the semver maximum by precedence, so build metadata
//! never decides between two revisions. Nothing here falls back to lexical
//! or insertion order; an unparsable revision is an error.

use std::cmp::Ordering;

use semver::Version;

use crate::resolver::ResolveError;

/// Which revision of a path a lookup targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionSpec {
    /// The maximum revision by semver precedence.
    Latest,
    /// Exactly this revision string.
    Exact(String),
}

/// Decide between latest and exact resolution for a path.
///
/// An explicit revision must be valid semver.
pub fn resolve_revision(path: &str, revision: Option<&str>) -> Result<RevisionSpec, ResolveError> {
    match revision {
        None | Some("") => Ok(RevisionSpec::Latest),
        Some(rev) => {
            parse_revision(path, rev)?;
            Ok(RevisionSpec::Exact(rev.to_string()))
        }
    }
}

/// Parse a revision string as a semantic version.
pub fn parse_revision(path: &str, revision: &str) -> Result<Version, ResolveError> {
    Version::parse(revision).map_err(|source| ResolveError::InvalidRevision {
        path: path.to_string(),
        revision: revision.to_string(),
        source,
    })
}

/// Compute the latest revision among the given revision strings.
pub fn latest_revision<'a, I>(path: &str, revisions: I) -> Result<Version, ResolveError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut latest: Option<Version> = None;
    let mut latest_is_duplicated = false;

    for revision in revisions {
        let version = parse_revision(path, revision)?;

        match latest.as_ref().map(|current| version.cmp_precedence(current)) {
            None | Some(Ordering::Greater) => {
                latest = Some(version);
                latest_is_duplicated = false;
            }
            Some(Ordering::Equal) => latest_is_duplicated = true,
            Some(Ordering::Less) => {}
        }
    }

    match latest {
        Some(version) if latest_is_duplicated => Err(ResolveError::DuplicateRevision {
            path: path.to_string(),
            revision: version.to_string(),
        }),
        Some(version) => Ok(version),
        None => Err(ResolveError::NoRevisions {
            path: path.to_string(),
        }),
    }
}

/// Apply a [`RevisionSpec`] to an in-memory set of candidates for one path.
///
/// Returns `Ok(None)` when nothing matches.
pub fn select_revision<'a, T, F>(
    path: &str,
    spec: &RevisionSpec,
    candidates: &'a [T],
    revision_of: F,
) -> Result<Option<&'a T>, ResolveError>
where
    F: Fn(&T) -> &str,
{
    match spec {
        RevisionSpec::Exact(rev) => Ok(candidates.iter().find(|c| revision_of(c) == rev)),
        RevisionSpec::Latest => {
            if candidates.is_empty() {
                return Ok(None);
            }

            let latest = latest_revision(path, candidates.iter().map(&revision_of))?;

            Ok(candidates
                .iter()
                .find(|c| {
                    Version::parse(revision_of(c))
                        .map_or(false, |v| v.cmp_precedence(&latest) == Ordering::Equal)
                }))
        }
    }
}
