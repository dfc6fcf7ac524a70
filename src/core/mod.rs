//! Core data structures.
//!
//! - Manifest references (path + revision) and manifest kinds
//! - The manifest object model shared by every source

pub mod manifest;
pub mod reference;

pub use manifest::{
    AttributeMetadata, AttributeRevision, GenericMetadata, ImplementationMetadata,
    ImplementationRequirement, ImplementationRequirementItem, ImplementationRevision,
    ImplementationSpec, Interface, InterfaceRevision, TypeInstance, TypeMetadata, TypeRevision,
    TypeSpec,
};
pub use reference::{InterfaceReference, ManifestKind, ManifestReference, TypeReference};
