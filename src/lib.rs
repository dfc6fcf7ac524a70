//! hubq - client for a capability manifest Hub
//!
//! This crate resolves versioned capability manifests (Interfaces and the
//! Implementations that satisfy them) either from a remote Hub GraphQL API
//! or from a local directory of YAML manifests. Both sources implement
//! [`ManifestSource`] and share revision resolution, filtering and
//! ordering.

pub mod core;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities and mocks for hubq unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted query transport and manifest
/// directory fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    ImplementationRevision, Interface, InterfaceReference, InterfaceRevision, ManifestKind,
    ManifestReference, TypeInstance, TypeReference,
};

pub use resolver::{filter_and_sort, ImplementationRevisionFilter, ResolveError};
pub use sources::{
    HubError, ListInterfacesOptions, LocalSource, ManifestSource, RemoteSource, RetryPolicy,
};
pub use util::context::GlobalContext;
