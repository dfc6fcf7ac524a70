//! Manifest references - WHICH manifest (dotted path + revision).
//!
//! References are plain values: equality and hashing are by exact field
//! match, with no normalization of either the path or the revision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sources::HubError;

/// Reference to one revision of any manifest kind.
///
/// Used as the key type of existence-check results, so two references are
/// equal only when both `path` and `revision` are byte-for-byte identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManifestReference {
    pub path: String,
    pub revision: String,
}

impl ManifestReference {
    /// Create a new manifest reference.
    pub fn new(path: impl Into<String>, revision: impl Into<String>) -> Self {
        ManifestReference {
            path: path.into(),
            revision: revision.into(),
        }
    }

    /// Derive the manifest kind from the dotted path.
    ///
    /// Paths look like `cap.<kind>.<name...>`; core manifests use
    /// `cap.core.<kind>.<name...>`.
    pub fn kind(&self) -> Result<ManifestKind, HubError> {
        ManifestKind::from_path(&self.path)
    }
}

impl fmt::Display for ManifestReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.revision)
    }
}

impl FromStr for ManifestReference {
    type Err = HubError;

    /// Parse `path:revision`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((path, revision)) if !path.is_empty() && !revision.is_empty() => {
                Ok(ManifestReference::new(path, revision))
            }
            _ => Err(HubError::InvalidReference {
                reference: s.to_string(),
                reason: "expected `<path>:<revision>`".to_string(),
            }),
        }
    }
}

/// Reference to an Interface.
///
/// An empty `revision` means "the latest revision". The same shape is used
/// for the `implements` entries of an Implementation, where the revision is
/// always set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceReference {
    pub path: String,
    #[serde(default)]
    pub revision: String,
}

impl InterfaceReference {
    /// Reference the latest revision of an Interface.
    pub fn latest(path: impl Into<String>) -> Self {
        InterfaceReference {
            path: path.into(),
            revision: String::new(),
        }
    }

    /// Reference a specific revision of an Interface.
    pub fn new(path: impl Into<String>, revision: impl Into<String>) -> Self {
        InterfaceReference {
            path: path.into(),
            revision: revision.into(),
        }
    }

    /// The explicit revision, if any.
    pub fn revision(&self) -> Option<&str> {
        if self.revision.is_empty() {
            None
        } else {
            Some(&self.revision)
        }
    }
}

impl fmt::Display for InterfaceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.revision() {
            Some(rev) => write!(f, "{}:{}", self.path, rev),
            None => write!(f, "{}", self.path),
        }
    }
}

/// Reference to a Type revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeReference {
    pub path: String,
    #[serde(default)]
    pub revision: String,
}

impl TypeReference {
    /// Create a new type reference.
    pub fn new(path: impl Into<String>, revision: impl Into<String>) -> Self {
        TypeReference {
            path: path.into(),
            revision: revision.into(),
        }
    }
}

/// Kind of a manifest, as encoded in the second segment of its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    Interface,
    Implementation,
    Type,
    Attribute,
    InterfaceGroup,
}

impl ManifestKind {
    /// Parse the kind out of a manifest path.
    pub fn from_path(path: &str) -> Result<Self, HubError> {
        let invalid = |reason: &str| HubError::InvalidReference {
            reference: path.to_string(),
            reason: reason.to_string(),
        };

        if path.is_empty() {
            return Err(invalid("manifest path cannot be empty"));
        }

        let parts: Vec<&str> = path.split('.').collect();
        if parts.len() < 3 {
            return Err(invalid("manifest path must have a prefix, kind and name"));
        }

        let segment = if parts[1] == "core" {
            parts
                .get(2)
                .filter(|_| parts.len() >= 4)
                .ok_or_else(|| invalid("core manifest path must have a kind and name"))?
        } else {
            &parts[1]
        };

        match *segment {
            "interface" => Ok(ManifestKind::Interface),
            "implementation" => Ok(ManifestKind::Implementation),
            "type" => Ok(ManifestKind::Type),
            "attribute" => Ok(ManifestKind::Attribute),
            "interfaceGroup" => Ok(ManifestKind::InterfaceGroup),
            other => Err(invalid(&format!("unknown manifest kind `{}`", other))),
        }
    }

    /// Name of the GraphQL root field that serves this kind.
    pub fn query_name(self) -> &'static str {
        match self {
            ManifestKind::Interface => "interface",
            ManifestKind::Implementation => "implementation",
            ManifestKind::Type => "type",
            ManifestKind::Attribute => "attribute",
            ManifestKind::InterfaceGroup => "interfaceGroup",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_name())
    }
}
