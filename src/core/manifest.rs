//! Manifest object model.
//!
//! These types mirror the Hub GraphQL schema (camelCase wire names) and are
//! decoded either from query responses or from YAML manifests converted to
//! JSON. All of them own their data, so `clone()` is a deep copy.

use serde::{Deserialize, Serialize};

use crate::core::{InterfaceReference, TypeReference};

/// An Interface and (optionally) its revisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_revision: Option<InterfaceRevision>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub revisions: Vec<InterfaceRevision>,
}

/// Metadata shared by Interface and Implementation revisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericMetadata {
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One revision of an Interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceRevision {
    pub metadata: GenericMetadata,
    pub revision: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implementation_revisions: Vec<ImplementationRevision>,
}

impl InterfaceRevision {
    /// The Interface path.
    pub fn path(&self) -> &str {
        &self.metadata.path
    }
}

/// One revision of an Implementation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationRevision {
    pub metadata: ImplementationMetadata,
    pub revision: String,
    #[serde(default)]
    pub spec: ImplementationSpec,
}

impl ImplementationRevision {
    /// The Implementation path.
    pub fn path(&self) -> &str {
        &self.metadata.path
    }

    /// Whether this revision declares that it implements the given Interface
    /// path (any revision).
    pub fn implements_path(&self, interface_path: &str) -> bool {
        self.spec
            .implements
            .iter()
            .any(|implements| implements.path == interface_path)
    }

    /// Whether this revision implements exactly the given Interface revision.
    pub fn implements_revision(&self, interface_path: &str, revision: &str) -> bool {
        self.spec
            .implements
            .iter()
            .any(|implements| implements.path == interface_path && implements.revision == revision)
    }
}

/// Implementation metadata, including the attributes used for filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationMetadata {
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeRevision>,
}

/// An Attribute attached to an Implementation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRevision {
    pub metadata: AttributeMetadata,
    #[serde(default)]
    pub revision: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeMetadata {
    pub path: String,
}

/// Implementation spec: which Interfaces are implemented and what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default)]
    pub implements: Vec<InterfaceReference>,
    #[serde(default)]
    pub requires: Vec<ImplementationRequirement>,
}

/// Requirements under a common prefix.
///
/// * `all_of` - every item must be satisfied
/// * `any_of` - at least one item must be satisfied (when non-empty)
/// * `one_of` - exactly one item must be satisfied (when non-empty)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationRequirement {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub one_of: Vec<ImplementationRequirementItem>,
    #[serde(default)]
    pub any_of: Vec<ImplementationRequirementItem>,
    #[serde(default)]
    pub all_of: Vec<ImplementationRequirementItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationRequirementItem {
    pub type_ref: TypeReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A TypeInstance stored next to the manifests (local backend only).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInstance {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeReference>,
}

/// A Type revision with its JSON schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRevision {
    pub metadata: TypeMetadata,
    pub revision: String,
    #[serde(default)]
    pub spec: TypeSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMetadata {
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<serde_json::Value>,
}
