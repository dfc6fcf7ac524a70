//! Manifest directory fixtures.
//!
//! [`ManifestDir`] writes YAML manifests into a temporary directory laid
//! out the way Hub manifest repositories are (`interface/`,
//! `implementation/`, `typeinstance/`), so the local source classifies
//! them by location.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary manifest directory.
pub struct ManifestDir {
    tmp: TempDir,
}

impl ManifestDir {
    /// Create an empty manifest directory.
    pub fn new() -> Self {
        ManifestDir {
            tmp: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Root of the directory.
    pub fn path(&self) -> &Path {
        self.tmp.path()
    }

    /// Write a raw file relative to the root.
    pub fn write(&self, relative: impl AsRef<Path>, content: &str) -> PathBuf {
        let path = self.tmp.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture dir");
        }
        std::fs::write(&path, content).expect("failed to write fixture");
        path
    }

    /// Write an Interface revision.
    pub fn interface(&self, path: &str, revision: &str) -> PathBuf {
        self.write(
            format!("interface/{}-{}.yaml", file_stem(path), revision),
            &interface_yaml(path, revision),
        )
    }

    /// Write an Implementation revision implementing the given Interfaces.
    pub fn implementation(&self, path: &str, revision: &str, implements: &[(&str, &str)]) -> PathBuf {
        self.write(
            format!("implementation/{}-{}.yaml", file_stem(path), revision),
            &implementation_yaml(path, revision, implements, &[]),
        )
    }

    /// Write an Implementation revision carrying attributes.
    pub fn implementation_with_attributes(
        &self,
        path: &str,
        revision: &str,
        implements: &[(&str, &str)],
        attributes: &[(&str, &str)],
    ) -> PathBuf {
        self.write(
            format!("implementation/{}-{}.yaml", file_stem(path), revision),
            &implementation_yaml(path, revision, implements, attributes),
        )
    }

    /// Write a TypeInstance.
    pub fn type_instance(&self, id: &str, type_ref: Option<(&str, &str)>) -> PathBuf {
        self.write(
            format!("typeinstance/{}.yaml", id),
            &type_instance_yaml(id, type_ref),
        )
    }
}

impl Default for ManifestDir {
    fn default() -> Self {
        Self::new()
    }
}

fn file_stem(path: &str) -> String {
    path.replace('.', "-")
}

fn split_path(path: &str) -> (&str, &str) {
    path.rsplit_once('.').unwrap_or(("", path))
}

/// YAML document of an Interface revision.
pub fn interface_yaml(path: &str, revision: &str) -> String {
    let (prefix, name) = split_path(path);
    format!(
        r#"metadata:
  path: {path}
  name: {name}
  prefix: {prefix}
  displayName: {name}
revision: {revision}
"#
    )
}

/// YAML document of an Implementation revision.
pub fn implementation_yaml(
    path: &str,
    revision: &str,
    implements: &[(&str, &str)],
    attributes: &[(&str, &str)],
) -> String {
    let (prefix, name) = split_path(path);
    let mut yaml = format!(
        r#"metadata:
  path: {path}
  name: {name}
  prefix: {prefix}
"#
    );

    if attributes.is_empty() {
        yaml.push_str("  attributes: []\n");
    } else {
        yaml.push_str("  attributes:\n");
        for (attr_path, attr_rev) in attributes {
            yaml.push_str(&format!(
                "    - metadata:\n        path: {}\n      revision: {}\n",
                attr_path, attr_rev
            ));
        }
    }

    yaml.push_str(&format!("revision: {}\nspec:\n  appVersion: 1.x.x\n", revision));

    if implements.is_empty() {
        yaml.push_str("  implements: []\n");
    } else {
        yaml.push_str("  implements:\n");
        for (iface_path, iface_rev) in implements {
            yaml.push_str(&format!(
                "    - path: {}\n      revision: {}\n",
                iface_path, iface_rev
            ));
        }
    }

    yaml
}

/// YAML document of a TypeInstance.
pub fn type_instance_yaml(id: &str, type_ref: Option<(&str, &str)>) -> String {
    let mut yaml = format!("id: {}\n", id);
    if let Some((path, revision)) = type_ref {
        yaml.push_str(&format!(
            "typeRef:\n  path: {}\n  revision: {}\n",
            path, revision
        ));
    }
    yaml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implementation_yaml_is_valid() {
        let yaml = implementation_yaml(
            "cap.implementation.bitnami.postgresql.install",
            "0.1.0",
            &[("cap.interface.database.postgresql.install", "0.1.0")],
            &[("cap.attribute.cloud.provider.aws", "0.1.0")],
        );

        let value: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value["metadata"]["name"], "install");
        assert_eq!(value["metadata"]["prefix"], "cap.implementation.bitnami.postgresql");
        assert_eq!(
            value["spec"]["implements"][0]["path"],
            "cap.interface.database.postgresql.install"
        );
        assert_eq!(value["revision"], "0.1.0");
    }

    #[test]
    fn test_manifest_dir_layout() {
        let dir = ManifestDir::new();
        let iface = dir.interface("cap.interface.db.install", "0.1.0");
        let ti = dir.type_instance("abc", None);

        assert!(iface.starts_with(dir.path().join("interface")));
        assert!(ti.ends_with("typeinstance/abc.yaml"));
        assert!(iface.exists());
    }
}
