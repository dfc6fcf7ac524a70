//! Filter & sort engine for Implementation revisions.
//!
//! Both sources run their results through [`filter_and_sort`] so that a
//! local directory and the remote Hub produce identical answers for the
//! same logical data set.

use std::cmp::Ordering;

use regex::Regex;
use semver::Version;

use crate::core::{ImplementationRequirementItem, ImplementationRevision, TypeReference};
use crate::resolver::{parse_revision, ResolveError};

/// Whether an attribute filter requires or forbids the attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRule {
    Include,
    Exclude,
}

/// Filter on one Attribute of an Implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    pub path: String,
    pub rule: FilterRule,
    /// Matches any attribute revision when `None`.
    pub revision: Option<String>,
}

impl AttributeFilter {
    fn matches(&self, rev: &ImplementationRevision) -> bool {
        rev.metadata.attributes.iter().any(|attr| {
            attr.metadata.path == self.path
                && self
                    .revision
                    .as_ref()
                    .map_or(true, |wanted| &attr.revision == wanted)
        })
    }
}

/// Options for listing Implementation revisions.
///
/// Every populated field is a predicate; a revision is kept only when all
/// of them hold. The default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImplementationRevisionFilter {
    /// Regular expression matched against the whole Implementation path.
    pub path_pattern: Option<String>,
    pub attributes: Vec<AttributeFilter>,
    /// TypeInstances the caller can provide. When set, every requirement of
    /// an Implementation must be satisfiable from this list.
    pub requirements_satisfied_by: Option<Vec<TypeReference>>,
}

impl ImplementationRevisionFilter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only paths matching the given regular expression.
    pub fn with_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.path_pattern = Some(pattern.into());
        self
    }

    /// Keep only revisions carrying the attribute.
    pub fn require_attribute(mut self, path: impl Into<String>, revision: Option<String>) -> Self {
        self.attributes.push(AttributeFilter {
            path: path.into(),
            rule: FilterRule::Include,
            revision,
        });
        self
    }

    /// Drop revisions carrying the attribute.
    pub fn reject_attribute(mut self, path: impl Into<String>, revision: Option<String>) -> Self {
        self.attributes.push(AttributeFilter {
            path: path.into(),
            rule: FilterRule::Exclude,
            revision,
        });
        self
    }

    /// Keep only revisions whose requirements the given TypeInstances satisfy.
    pub fn satisfied_by(mut self, type_refs: Vec<TypeReference>) -> Self {
        self.requirements_satisfied_by = Some(type_refs);
        self
    }

    /// Whether no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.path_pattern.is_none()
            && self.attributes.is_empty()
            && self.requirements_satisfied_by.is_none()
    }
}

/// Filter and deterministically order Implementation revisions.
///
/// Order: revision descending by semver precedence, then path ascending.
/// Fails on an invalid revision or on two revisions sharing the same
/// `(path, revision)`.
pub fn filter_and_sort(
    revisions: Vec<ImplementationRevision>,
    filter: &ImplementationRevisionFilter,
) -> Result<Vec<ImplementationRevision>, ResolveError> {
    let path_pattern = filter
        .path_pattern
        .as_deref()
        .map(compile_path_pattern)
        .transpose()?;

    let mut keyed: Vec<(Version, ImplementationRevision)> = Vec::with_capacity(revisions.len());

    for rev in revisions {
        if let Some(re) = &path_pattern {
            if !re.is_match(rev.path()) {
                continue;
            }
        }

        let attributes_ok = filter.attributes.iter().all(|attr| match attr.rule {
            FilterRule::Include => attr.matches(&rev),
            FilterRule::Exclude => !attr.matches(&rev),
        });
        if !attributes_ok {
            continue;
        }

        if let Some(available) = &filter.requirements_satisfied_by {
            if !requirements_satisfied(&rev, available) {
                continue;
            }
        }

        let version = parse_revision(rev.path(), &rev.revision)?;
        keyed.push((version, rev));
    }

    keyed.sort_by(|(va, a), (vb, b)| {
        vb.cmp_precedence(va).then_with(|| a.path().cmp(b.path()))
    });

    // Build metadata is ignored, so `1.0.0+a` and `1.0.0+b` of one path collide.
    if let Some(pair) = keyed.windows(2).find(|pair| {
        pair[0].0.cmp_precedence(&pair[1].0) == Ordering::Equal
            && pair[0].1.path() == pair[1].1.path()
    }) {
        return Err(ResolveError::DuplicateRevision {
            path: pair[0].1.path().to_string(),
            revision: pair[0].1.revision.clone(),
        });
    }

    Ok(keyed.into_iter().map(|(_, rev)| rev).collect())
}

/// Compile a pattern that must match the whole path.
pub(crate) fn compile_path_pattern(pattern: &str) -> Result<Regex, ResolveError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| ResolveError::InvalidPathPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn requirements_satisfied(rev: &ImplementationRevision, available: &[TypeReference]) -> bool {
    let present = |item: &ImplementationRequirementItem| {
        available.iter().any(|type_ref| {
            type_ref.path == item.type_ref.path
                && (item.type_ref.revision.is_empty() || type_ref.revision == item.type_ref.revision)
        })
    };

    rev.spec.requires.iter().all(|req| {
        let all_of = req.all_of.iter().all(present);
        let any_of = req.any_of.is_empty() || req.any_of.iter().any(present);
        let one_of = req.one_of.is_empty() || req.one_of.iter().filter(|item| present(*item)).count() == 1;
        all_of && any_of && one_of
    })
}
