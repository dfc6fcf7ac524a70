//! ManifestSource trait - common interface for the remote and local Hub clients.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::{
    ImplementationRevision, Interface, InterfaceReference, InterfaceRevision, ManifestReference,
};
use crate::resolver::ImplementationRevisionFilter;
use crate::sources::HubError;

/// A source of capability manifests.
///
/// Implementations must give identical answers for the same logical data,
/// so callers can swap a local directory for the remote Hub (or the other
/// way around) without behavior changes.
pub trait ManifestSource: Send + Sync {
    /// Get the source name for display.
    fn name(&self) -> &str;

    /// Find one Interface revision: the latest when `iface.revision` is
    /// empty, otherwise exactly that revision. `Ok(None)` when nothing matches.
    fn find_interface_revision(
        &self,
        iface: &InterfaceReference,
    ) -> Result<Option<InterfaceRevision>, HubError>;

    /// List Interfaces.
    fn list_interfaces(&self, opts: &ListInterfacesOptions) -> Result<Vec<Interface>, HubError>;

    /// Get the latest revision string of an Interface.
    fn get_interface_latest_revision_string(
        &self,
        iface: &InterfaceReference,
    ) -> Result<String, HubError>;

    /// List all Implementation revisions, filtered and sorted.
    fn list_implementation_revisions(
        &self,
        filter: &ImplementationRevisionFilter,
    ) -> Result<Vec<ImplementationRevision>, HubError>;

    /// List the Implementation revisions of one Interface revision, filtered and sorted.
    fn list_implementation_revisions_for_interface(
        &self,
        iface: &InterfaceReference,
        filter: &ImplementationRevisionFilter,
    ) -> Result<Vec<ImplementationRevision>, HubError>;

    /// Check which of the given manifest revisions exist.
    fn check_manifest_revisions_exist(
        &self,
        refs: &[ManifestReference],
    ) -> Result<HashMap<ManifestReference, bool>, HubError>;
}

/// Server-side filter for [`ManifestSource::list_interfaces`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceFilter {
    /// Regular expression matched against the whole Interface path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_pattern: Option<String>,
}

/// Options for [`ManifestSource::list_interfaces`].
///
/// By default only root fields (path, name, prefix) are populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListInterfacesOptions {
    pub filter: InterfaceFilter,
    /// Populate `latest_revision`.
    pub latest_revision: bool,
    /// Populate `revisions`.
    pub revisions: bool,
}

impl ListInterfacesOptions {
    /// Only list Interfaces whose path matches the pattern.
    pub fn with_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.filter.path_pattern = Some(pattern.into());
        self
    }

    /// Also fetch the latest revision of each Interface.
    pub fn with_latest_revision(mut self) -> Self {
        self.latest_revision = true;
        self
    }

    /// Also fetch every revision of each Interface.
    pub fn with_revisions(mut self) -> Self {
        self.revisions = true;
        self
    }
}
