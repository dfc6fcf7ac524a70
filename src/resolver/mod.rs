//! Revision resolution and result ordering.
//!
//! This module is pure: it never performs I/O. Sources fetch or load
//! manifests and then hand them to the functions here, so both sources
//! share exactly one definition of "latest", of filtering and of ordering.

pub mod errors;
pub mod filter;
pub mod revision;

pub use errors::ResolveError;
pub use filter::{
    filter_and_sort, AttributeFilter, FilterRule, ImplementationRevisionFilter,
};
pub use revision::{latest_revision, parse_revision, resolve_revision, select_revision, RevisionSpec};
