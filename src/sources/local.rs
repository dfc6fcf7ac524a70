//! Local source - manifests loaded from a directory of YAML files.
//!
//! The directory is walked once, at construction. Each `.yaml` file is
//! converted to JSON and decoded according to where it lives: a relative
//! path containing `typeinstance`, `implementation` or `interface` (checked
//! in that order) selects the document kind. Files matching none of them
//! are skipped.
//!
//! After loading, the source is immutable and every lookup returns owned
//! copies, so callers can never alter the loaded set.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::de::DeserializeOwned;
use walkdir::WalkDir;

use crate::core::{
    ImplementationRevision, Interface, InterfaceReference, InterfaceRevision, ManifestKind,
    ManifestReference, TypeInstance, TypeReference,
};
use crate::resolver::filter::compile_path_pattern;
use crate::resolver::{
    filter_and_sort, latest_revision, parse_revision, resolve_revision, select_revision,
    ImplementationRevisionFilter, RevisionSpec,
};
use crate::sources::{HubError, ListInterfacesOptions, LoadError, ManifestSource};

const MANIFEST_EXTENSION: &str = "yaml";

/// Kind of document, as decided by its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    TypeInstance,
    Implementation,
    Interface,
}

impl DocumentKind {
    fn classify(relative: &Path) -> Option<Self> {
        let path = relative.to_string_lossy();
        if path.contains("typeinstance") {
            Some(DocumentKind::TypeInstance)
        } else if path.contains("implementation") {
            Some(DocumentKind::Implementation)
        } else if path.contains("interface") {
            Some(DocumentKind::Interface)
        } else {
            None
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            DocumentKind::TypeInstance => "TypeInstance",
            DocumentKind::Implementation => "Implementation",
            DocumentKind::Interface => "Interface",
        }
    }
}

/// A source serving manifests from a local directory.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
    name: String,
    interfaces: Vec<InterfaceRevision>,
    implementations: Vec<ImplementationRevision>,
    type_instances: HashMap<String, TypeInstance>,
    interface_index: HashSet<ManifestReference>,
    implementation_index: HashSet<ManifestReference>,
}

impl LocalSource {
    /// Load every manifest under `dir`.
    ///
    /// TypeInstance documents are only decoded when `load_type_instances`
    /// is set. Any failure aborts the load; no partially loaded source is
    /// ever returned.
    pub fn from_directory(dir: &Path, load_type_instances: bool) -> Result<Self, HubError> {
        let mut source = LocalSource {
            root: dir.to_path_buf(),
            name: dir.display().to_string(),
            interfaces: Vec::new(),
            implementations: Vec::new(),
            type_instances: HashMap::new(),
            interface_index: HashSet::new(),
            implementation_index: HashSet::new(),
        };

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| HubError::Load {
                path: e.path().unwrap_or(dir).to_path_buf(),
                source: LoadError::Walk(e),
            })?;

            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(MANIFEST_EXTENSION)
            {
                continue;
            }

            let relative = path.strip_prefix(dir).unwrap_or(path);
            let kind = match DocumentKind::classify(relative) {
                Some(DocumentKind::TypeInstance) if !load_type_instances => continue,
                Some(kind) => kind,
                None => {
                    tracing::debug!("Skipping unclassified file {}", relative.display());
                    continue;
                }
            };

            source
                .load_manifest(path, kind)
                .map_err(|e| HubError::Load {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }

        tracing::info!(
            "Loaded {} Interface revisions, {} Implementation revisions and {} TypeInstances from {}",
            source.interfaces.len(),
            source.implementations.len(),
            source.type_instances.len(),
            dir.display()
        );

        Ok(source)
    }

    /// Directory the manifests were loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a TypeInstance by ID.
    pub fn find_type_instance(&self, id: &str) -> Option<TypeInstance> {
        self.type_instances.get(id).cloned()
    }

    /// Type references of all loaded TypeInstances, sorted by path then revision.
    ///
    /// TypeInstances without a type reference are left out.
    pub fn list_type_instances_type_ref(&self) -> Vec<TypeReference> {
        let mut refs: Vec<TypeReference> = self
            .type_instances
            .values()
            .filter_map(|ti| ti.type_ref.clone())
            .collect();
        refs.sort();
        refs
    }

    fn load_manifest(&mut self, path: &Path, kind: DocumentKind) -> Result<(), LoadError> {
        tracing::debug!("Loading {} from {}", kind.as_str(), path.display());

        let content = fs::read_to_string(path)?;
        let json: serde_json::Value = serde_yaml::from_str(&content)?;
        if json.is_null() {
            tracing::debug!("Skipping empty document {}", path.display());
            return Ok(());
        }

        match kind {
            DocumentKind::TypeInstance => {
                let ti: TypeInstance = decode(kind, json)?;
                if self.type_instances.contains_key(&ti.id) {
                    return Err(LoadError::DuplicateTypeInstance { id: ti.id });
                }
                self.type_instances.insert(ti.id.clone(), ti);
            }
            DocumentKind::Implementation => {
                let rev: ImplementationRevision = decode(kind, json)?;
                let key = ManifestReference::new(rev.path(), rev.revision.as_str());
                if !self.implementation_index.insert(key) {
                    return Err(duplicate(kind, rev.path(), &rev.revision));
                }
                self.implementations.push(rev);
            }
            DocumentKind::Interface => {
                let rev: InterfaceRevision = decode(kind, json)?;
                let key = ManifestReference::new(rev.path(), rev.revision.as_str());
                if !self.interface_index.insert(key) {
                    return Err(duplicate(kind, rev.path(), &rev.revision));
                }
                self.interfaces.push(rev);
            }
        }

        Ok(())
    }

    fn interface_candidates(&self, path: &str) -> Vec<&InterfaceRevision> {
        self.interfaces.iter().filter(|i| i.path() == path).collect()
    }

    /// Latest revision of the Interface at `path`.
    ///
    /// Loaded Interface documents decide when there are any; otherwise the
    /// revisions named by Implementations' `implements` entries do.
    fn latest_interface_revision(&self, path: &str) -> Result<Option<String>, HubError> {
        let candidates = self.interface_candidates(path);
        if !candidates.is_empty() {
            let latest = select_revision(path, &RevisionSpec::Latest, &candidates, |rev| {
                rev.revision.as_str()
            })?;
            return Ok(latest.map(|rev| rev.revision.clone()));
        }

        let implemented: BTreeSet<&str> = self
            .implementations
            .iter()
            .flat_map(|rev| rev.spec.implements.iter())
            .filter(|implements| implements.path == path)
            .map(|implements| implements.revision.as_str())
            .collect();

        if implemented.is_empty() {
            return Ok(None);
        }

        Ok(Some(latest_revision(path, implemented)?.to_string()))
    }

    /// Interface revision for `iface`: the explicit one, or the latest.
    fn implemented_revision(&self, iface: &InterfaceReference) -> Result<Option<String>, HubError> {
        match resolve_revision(&iface.path, iface.revision())? {
            RevisionSpec::Exact(revision) => Ok(Some(revision)),
            RevisionSpec::Latest => self.latest_interface_revision(&iface.path),
        }
    }
}

fn decode<T: DeserializeOwned>(kind: DocumentKind, json: serde_json::Value) -> Result<T, LoadError> {
    serde_json::from_value(json).map_err(|source| LoadError::Decode {
        kind: kind.as_str(),
        source,
    })
}

fn duplicate(kind: DocumentKind, path: &str, revision: &str) -> LoadError {
    LoadError::DuplicateRevision {
        kind: kind.as_str(),
        path: path.to_string(),
        revision: revision.to_string(),
    }
}

/// Interface revisions ordered newest first.
fn sorted_descending(path: &str, revs: &[&InterfaceRevision]) -> Result<Vec<InterfaceRevision>, HubError> {
    let mut keyed: Vec<(Version, &InterfaceRevision)> = revs
        .iter()
        .map(|rev| Ok((parse_revision(path, &rev.revision)?, *rev)))
        .collect::<Result<_, HubError>>()?;
    keyed.sort_by(|(a, _), (b, _)| b.cmp_precedence(a));

    Ok(keyed.into_iter().map(|(_, rev)| rev.clone()).collect())
}

impl ManifestSource for LocalSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_interface_revision(
        &self,
        iface: &InterfaceReference,
    ) -> Result<Option<InterfaceRevision>, HubError> {
        let spec = resolve_revision(&iface.path, iface.revision())?;
        let candidates = self.interface_candidates(&iface.path);

        let found = select_revision(&iface.path, &spec, &candidates, |rev| rev.revision.as_str())?;

        Ok(found.map(|rev| (*rev).clone()))
    }

    fn list_interfaces(&self, opts: &ListInterfacesOptions) -> Result<Vec<Interface>, HubError> {
        let pattern = opts
            .filter
            .path_pattern
            .as_deref()
            .map(compile_path_pattern)
            .transpose()?;

        let mut by_path: BTreeMap<&str, Vec<&InterfaceRevision>> = BTreeMap::new();
        for rev in &self.interfaces {
            if pattern.as_ref().map_or(true, |re| re.is_match(rev.path())) {
                by_path.entry(rev.path()).or_default().push(rev);
            }
        }

        let mut interfaces = Vec::with_capacity(by_path.len());
        for (path, revs) in by_path {
            let (prefix, name) = path.rsplit_once('.').unwrap_or(("", path));

            let mut interface = Interface {
                path: path.to_string(),
                name: name.to_string(),
                prefix: prefix.to_string(),
                ..Interface::default()
            };

            if opts.latest_revision {
                interface.latest_revision =
                    select_revision(path, &RevisionSpec::Latest, &revs, |rev| rev.revision.as_str())?
                        .map(|rev| (*rev).clone());
            }
            if opts.revisions {
                interface.revisions = sorted_descending(path, &revs)?;
            }

            interfaces.push(interface);
        }

        Ok(interfaces)
    }

    fn get_interface_latest_revision_string(
        &self,
        iface: &InterfaceReference,
    ) -> Result<String, HubError> {
        self.latest_interface_revision(&iface.path)?
            .ok_or_else(|| HubError::LatestRevisionNotFound {
                path: iface.path.clone(),
            })
    }

    fn list_implementation_revisions(
        &self,
        filter: &ImplementationRevisionFilter,
    ) -> Result<Vec<ImplementationRevision>, HubError> {
        Ok(filter_and_sort(self.implementations.clone(), filter)?)
    }

    fn list_implementation_revisions_for_interface(
        &self,
        iface: &InterfaceReference,
        filter: &ImplementationRevisionFilter,
    ) -> Result<Vec<ImplementationRevision>, HubError> {
        let revision = match self.implemented_revision(iface)? {
            Some(revision) => revision,
            None => return Ok(Vec::new()),
        };

        let matching: Vec<ImplementationRevision> = self
            .implementations
            .iter()
            .filter(|rev| rev.implements_revision(&iface.path, &revision))
            .cloned()
            .collect();

        Ok(filter_and_sort(matching, filter)?)
    }

    fn check_manifest_revisions_exist(
        &self,
        refs: &[ManifestReference],
    ) -> Result<HashMap<ManifestReference, bool>, HubError> {
        let mut result = HashMap::with_capacity(refs.len());

        for reference in refs {
            let exists = match reference.kind()? {
                ManifestKind::Interface => self.interface_index.contains(reference),
                ManifestKind::Implementation => self.implementation_index.contains(reference),
                ManifestKind::Type | ManifestKind::Attribute | ManifestKind::InterfaceGroup => false,
            };
            result.insert(reference.clone(), exists);
        }

        Ok(result)
    }
}
