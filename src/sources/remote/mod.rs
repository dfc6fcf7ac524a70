//! Remote source - manifests served by the Hub GraphQL API.
//!
//! Every operation builds one query with [`QueryBuilder`], sends it through
//! a [`QueryTransport`] under the configured [`RetryPolicy`], and decodes
//! the `data` object into the shared object model. Implementation listings
//! are filtered and sorted on this side with
//! [`filter_and_sort`](crate::resolver::filter_and_sort), so the remote and
//! local sources order results identically.

pub mod fields;
pub mod query;
pub mod transport;

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::core::{
    ImplementationRevision, Interface, InterfaceReference, InterfaceRevision, ManifestReference,
    TypeRevision,
};
use crate::resolver::{filter_and_sort, resolve_revision, ImplementationRevisionFilter, RevisionSpec};
use crate::sources::{HubError, ListInterfacesOptions, ManifestSource, RetryPolicy};

pub use query::{BatchQuery, Field, QueryBuilder, QueryRequest, VariableRef};
pub use transport::{HttpTransport, QueryTransport, TransportError};

use fields::{
    IFACE_REVISION_ALL_FIELDS, IFACE_REVISION_FIELDS, IMPL_REVISION_FIELDS, INTERFACE_FIELDS,
    TYPE_REVISION_SCHEMA_FIELDS,
};

/// Server-side filter for [`RemoteSource::list_type_ref_revisions_json_schemas`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_pattern: Option<String>,
}

/// A source backed by the Hub GraphQL API.
pub struct RemoteSource<T = HttpTransport> {
    name: String,
    transport: T,
    retry: RetryPolicy,
}

impl RemoteSource<HttpTransport> {
    /// Create a source talking HTTP to the given endpoint.
    pub fn connect(endpoint: Url, timeout: Duration, retry: RetryPolicy) -> Result<Self, HubError> {
        let name = endpoint.to_string();
        let transport =
            HttpTransport::new(endpoint, timeout).map_err(|source| HubError::Transport {
                operation: "create HTTP client",
                source,
            })?;

        Ok(RemoteSource {
            name,
            transport,
            retry,
        })
    }
}

impl<T: QueryTransport> RemoteSource<T> {
    /// Create a source over any transport.
    pub fn new(transport: T, retry: RetryPolicy) -> Self {
        RemoteSource {
            name: "remote".to_string(),
            transport,
            retry,
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The retry policy applied to every query.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// List the revisions of the Types matching the filter, with their JSON schemas.
    ///
    /// Only `revision`, `metadata.path` and `spec.jsonSchema` are populated.
    pub fn list_type_ref_revisions_json_schemas(
        &self,
        filter: &TypeFilter,
    ) -> Result<Vec<TypeRevision>, HubError> {
        let mut query = QueryBuilder::new("ListTypeRefsJSONSchemas");
        let type_filter = query.variable("typeFilter", "TypeFilter!", json!(filter));
        query.field(
            Field::new("types")
                .arg("filter", &type_filter)
                .field(Field::new("revisions").fields(TYPE_REVISION_SCHEMA_FIELDS)),
        );

        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            types: Vec<Revisions<TypeRevision>>,
        }

        let resp: Response = self.execute("list Types", &query.build())?;

        Ok(resp.types.into_iter().flat_map(|t| t.revisions).collect())
    }

    fn execute<R: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: &QueryRequest,
    ) -> Result<R, HubError> {
        let data = self
            .retry
            .run(operation, || self.transport.run(request))
            .map_err(|source| HubError::Transport { operation, source })?;

        serde_json::from_value(data).map_err(|source| HubError::Decode { operation, source })
    }
}

/// Select the Interface revision targeted by `spec` under the `rev` alias.
fn revision_field(query: &mut QueryBuilder, spec: &RevisionSpec, fields: &'static str) -> Field {
    match spec {
        RevisionSpec::Latest => Field::new("latestRevision").alias("rev").fields(fields),
        RevisionSpec::Exact(revision) => {
            let rev = query.variable("interfaceRev", "Version!", revision.as_str());
            Field::new("revision")
                .alias("rev")
                .arg("revision", &rev)
                .fields(fields)
        }
    }
}

/// Build `interface(path: $interfacePath) { rev: ... { fields } }`.
fn interface_revision_query(
    operation: &'static str,
    iface: &InterfaceReference,
    fields: &'static str,
) -> Result<QueryRequest, HubError> {
    let spec = resolve_revision(&iface.path, iface.revision())?;

    let mut query = QueryBuilder::new(operation);
    let path = query.variable("interfacePath", "NodePath!", iface.path.as_str());
    let rev = revision_field(&mut query, &spec, fields);
    query.field(Field::new("interface").arg("path", &path).field(rev));

    Ok(query.build())
}

#[derive(Deserialize)]
struct InterfaceResponse<R> {
    interface: Option<RevHolder<R>>,
}

#[derive(Deserialize)]
struct RevHolder<R> {
    rev: Option<R>,
}

impl<R> InterfaceResponse<R> {
    fn into_rev(self) -> Option<R> {
        self.interface.and_then(|i| i.rev)
    }
}

#[derive(Deserialize)]
struct Revisions<R> {
    #[serde(default)]
    revisions: Vec<R>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImplementationRevisions {
    #[serde(default)]
    implementation_revisions: Vec<ImplementationRevision>,
}

impl<T: QueryTransport> ManifestSource for RemoteSource<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_interface_revision(
        &self,
        iface: &InterfaceReference,
    ) -> Result<Option<InterfaceRevision>, HubError> {
        let request =
            interface_revision_query("FindInterfaceRevision", iface, IFACE_REVISION_ALL_FIELDS)?;

        let resp: InterfaceResponse<InterfaceRevision> =
            self.execute("fetch Hub Interface Revision", &request)?;

        Ok(resp.into_rev())
    }

    fn list_interfaces(&self, opts: &ListInterfacesOptions) -> Result<Vec<Interface>, HubError> {
        let mut query = QueryBuilder::new("ListInterfaces");
        let filter = query.variable("interfaceFilter", "InterfaceFilter!", json!(opts.filter));

        let mut interfaces = Field::new("interfaces")
            .arg("filter", &filter)
            .fields(INTERFACE_FIELDS);
        if opts.latest_revision {
            interfaces = interfaces.field(Field::new("latestRevision").fields(IFACE_REVISION_FIELDS));
        }
        if opts.revisions {
            interfaces = interfaces.field(Field::new("revisions").fields(IFACE_REVISION_FIELDS));
        }
        query.field(interfaces);

        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            interfaces: Vec<Interface>,
        }

        let resp: Response = self.execute("list Hub Interfaces", &query.build())?;
        Ok(resp.interfaces)
    }

    fn get_interface_latest_revision_string(
        &self,
        iface: &InterfaceReference,
    ) -> Result<String, HubError> {
        let latest = InterfaceReference::latest(iface.path.as_str());
        let request =
            interface_revision_query("GetInterfaceLatestRevisionString", &latest, "revision")?;

        #[derive(Deserialize)]
        struct Rev {
            revision: String,
        }

        let resp: InterfaceResponse<Rev> =
            self.execute("fetch Interface latest revision string", &request)?;

        resp.into_rev()
            .map(|rev| rev.revision)
            .ok_or_else(|| HubError::LatestRevisionNotFound {
                path: iface.path.clone(),
            })
    }

    fn list_implementation_revisions(
        &self,
        filter: &ImplementationRevisionFilter,
    ) -> Result<Vec<ImplementationRevision>, HubError> {
        let mut query = QueryBuilder::new("ListImplementationRevisions");
        query.field(
            Field::new("implementations")
                .field(Field::new("revisions").fields(IMPL_REVISION_FIELDS)),
        );

        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            implementations: Vec<Revisions<ImplementationRevision>>,
        }

        let resp: Response = self.execute("fetch Hub Implementations", &query.build())?;

        let revisions = resp
            .implementations
            .into_iter()
            .flat_map(|i| i.revisions)
            .collect();

        Ok(filter_and_sort(revisions, filter)?)
    }

    fn list_implementation_revisions_for_interface(
        &self,
        iface: &InterfaceReference,
        filter: &ImplementationRevisionFilter,
    ) -> Result<Vec<ImplementationRevision>, HubError> {
        let request = interface_revision_query(
            "ListImplementationRevisionsForInterface",
            iface,
            IFACE_REVISION_ALL_FIELDS,
        )?;

        let resp: InterfaceResponse<ImplementationRevisions> =
            self.execute("fetch Hub Implementation", &request)?;

        let revisions = resp
            .into_rev()
            .map(|rev| rev.implementation_revisions)
            .unwrap_or_default();

        Ok(filter_and_sort(revisions, filter)?)
    }

    fn check_manifest_revisions_exist(
        &self,
        refs: &[ManifestReference],
    ) -> Result<HashMap<ManifestReference, bool>, HubError> {
        if refs.is_empty() {
            return Ok(HashMap::new());
        }

        let mut batch = BatchQuery::new("CheckManifestRevisionsExist");
        for reference in refs {
            batch.push(reference)?;
        }

        const OPERATION: &str = "check manifest revisions exist";
        let data: serde_json::Value = self.execute(OPERATION, &batch.request())?;

        batch.demux(data).map_err(|source| HubError::Decode {
            operation: OPERATION,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TypeReference;
    use crate::test_support::MockTransport;
    use serde_json::json;
    use std::error::Error as _;

    fn source(transport: MockTransport) -> RemoteSource<MockTransport> {
        RemoteSource::new(transport, RetryPolicy::new(1, Duration::ZERO))
    }

    fn impl_rev(path: &str, revision: &str) -> serde_json::Value {
        json!({
            "metadata": { "path": path, "name": "install", "prefix": "cap.implementation" },
            "revision": revision,
            "spec": { "implements": [{ "path": "cap.interface.db.install", "revision": "0.1.0" }] }
        })
    }

    #[test]
    fn test_find_interface_revision_latest() {
        let transport = MockTransport::new();
        transport.respond(json!({
            "interface": {
                "rev": { "metadata": { "path": "cap.interface.db.install" }, "revision": "0.2.0" }
            }
        }));
        let source = source(transport);

        let rev = source
            .find_interface_revision(&InterfaceReference::latest("cap.interface.db.install"))
            .unwrap()
            .unwrap();
        assert_eq!(rev.revision, "0.2.0");

        let requests = source.transport().requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].query.contains("rev: latestRevision {"));
        assert!(!requests[0].variables.contains_key("interfaceRev"));
    }

    #[test]
    fn test_find_interface_revision_exact() {
        let transport = MockTransport::new();
        transport.respond(json!({ "interface": { "rev": null } }));
        let source = source(transport);

        let rev = source
            .find_interface_revision(&InterfaceReference::new("cap.interface.db.install", "0.3.0"))
            .unwrap();
        assert!(rev.is_none());

        let requests = source.transport().requests();
        assert!(requests[0].query.contains("rev: revision(revision: $interfaceRev) {"));
        assert!(requests[0].query.contains("$interfaceRev: Version!"));
        assert_eq!(requests[0].variables.get("interfaceRev"), Some(&json!("0.3.0")));
    }

    #[test]
    fn test_find_interface_revision_missing_interface() {
        let transport = MockTransport::new();
        transport.respond(json!({ "interface": null }));
        let source = source(transport);

        let rev = source
            .find_interface_revision(&InterfaceReference::latest("cap.interface.missing"))
            .unwrap();
        assert!(rev.is_none());
    }

    #[test]
    fn test_find_interface_revision_rejects_invalid_revision() {
        let source = source(MockTransport::new());

        let err = source
            .find_interface_revision(&InterfaceReference::new("cap.interface.db.install", "latest"))
            .unwrap_err();
        assert!(matches!(err, HubError::Resolve(_)));
        assert!(source.transport().requests().is_empty());
    }

    #[test]
    fn test_transport_failure_names_operation() {
        let transport = MockTransport::new();
        transport.fail(TransportError::MissingData);
        let source = source(transport);

        let err = source
            .find_interface_revision(&InterfaceReference::latest("cap.interface.db.install"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "while executing query to fetch Hub Interface Revision"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_retry_policy_is_applied() {
        let transport = MockTransport::new();
        transport.fail(TransportError::MissingData);
        transport.respond(json!({ "interface": { "rev": { "revision": "1.0.0" } } }));
        let source = RemoteSource::new(transport, RetryPolicy::new(2, Duration::ZERO));

        let latest = source
            .get_interface_latest_revision_string(&InterfaceReference::latest("cap.interface.a"))
            .unwrap();
        assert_eq!(latest, "1.0.0");
        assert_eq!(source.transport().requests().len(), 2);
    }

    #[test]
    fn test_decode_failure() {
        let transport = MockTransport::new();
        transport.respond(json!({ "interfaces": "not-a-list" }));
        let source = source(transport);

        let err = source
            .list_interfaces(&ListInterfacesOptions::default())
            .unwrap_err();
        assert!(matches!(err, HubError::Decode { operation: "list Hub Interfaces", .. }));
    }

    #[test]
    fn test_list_interfaces_passes_filter_as_variable() {
        let transport = MockTransport::new();
        transport.respond(json!({
            "interfaces": [
                { "path": "cap.interface.db.install", "name": "install", "prefix": "cap.interface.db" }
            ]
        }));
        let source = source(transport);

        let opts = ListInterfacesOptions::default()
            .with_path_pattern("cap.interface.db.*")
            .with_latest_revision();
        let interfaces = source.list_interfaces(&opts).unwrap();
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].name, "install");

        let requests = source.transport().requests();
        assert_eq!(
            requests[0].variables.get("interfaceFilter"),
            Some(&json!({ "pathPattern": "cap.interface.db.*" }))
        );
        assert!(requests[0].query.contains("latestRevision {"));
        assert!(!requests[0].query.contains("revisions {"));
    }

    #[test]
    fn test_latest_revision_not_found() {
        let transport = MockTransport::new();
        transport.respond(json!({ "interface": { "rev": null } }));
        let source = source(transport);

        let err = source
            .get_interface_latest_revision_string(&InterfaceReference::latest("cap.interface.a"))
            .unwrap_err();
        assert!(matches!(err, HubError::LatestRevisionNotFound { ref path } if path == "cap.interface.a"));
    }

    #[test]
    fn test_list_implementation_revisions_sorted() {
        let transport = MockTransport::new();
        transport.respond(json!({
            "implementations": [
                { "revisions": [impl_rev("cap.implementation.a", "1.0.0"), impl_rev("cap.implementation.a", "1.5.0")] },
                { "revisions": [impl_rev("cap.implementation.b", "2.0.0")] }
            ]
        }));
        let source = source(transport);

        let revs = source
            .list_implementation_revisions(&ImplementationRevisionFilter::default())
            .unwrap();
        let order: Vec<(&str, &str)> = revs
            .iter()
            .map(|r| (r.path(), r.revision.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("cap.implementation.b", "2.0.0"),
                ("cap.implementation.a", "1.5.0"),
                ("cap.implementation.a", "1.0.0"),
            ]
        );
    }

    #[test]
    fn test_list_implementation_revisions_for_interface() {
        let transport = MockTransport::new();
        transport.respond(json!({
            "interface": {
                "rev": {
                    "metadata": { "path": "cap.interface.db.install" },
                    "revision": "0.1.0",
                    "implementationRevisions": [
                        impl_rev("cap.implementation.a", "0.1.0"),
                        impl_rev("cap.implementation.b", "0.1.0")
                    ]
                }
            }
        }));
        let source = source(transport);

        let filter = ImplementationRevisionFilter::new().with_path_pattern("cap.implementation.b");
        let revs = source
            .list_implementation_revisions_for_interface(
                &InterfaceReference::latest("cap.interface.db.install"),
                &filter,
            )
            .unwrap();
        assert_eq!(revs.len(), 1);
        assert_eq!(revs[0].path(), "cap.implementation.b");
    }

    #[test]
    fn test_list_implementation_revisions_for_missing_interface() {
        let transport = MockTransport::new();
        transport.respond(json!({ "interface": null }));
        let source = source(transport);

        let revs = source
            .list_implementation_revisions_for_interface(
                &InterfaceReference::latest("cap.interface.missing"),
                &ImplementationRevisionFilter::default(),
            )
            .unwrap();
        assert!(revs.is_empty());
    }

    #[test]
    fn test_check_manifest_revisions_exist_single_request() {
        let refs = vec![
            ManifestReference::new("cap.interface.db.install", "0.1.0"),
            ManifestReference::new("cap.implementation.bitnami.db.install", "0.1.0"),
            ManifestReference::new("cap.core.type.platform.kubernetes", "0.1.0"),
        ];

        let transport = MockTransport::new();
        transport.respond(json!({
            "partial0": { "revision": { "revision": "0.1.0" } },
            "partial1": { "revision": null },
            "partial2": { "revision": { "revision": "0.1.0" } }
        }));
        let source = source(transport);

        let result = source.check_manifest_revisions_exist(&refs).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result[&refs[0]], true);
        assert_eq!(result[&refs[1]], false);
        assert_eq!(result[&refs[2]], true);

        let requests = source.transport().requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].query.contains("partial2: type(path: $partial2Path)"));
    }

    #[test]
    fn test_check_manifest_revisions_exist_empty_input() {
        let source = source(MockTransport::new());

        let result = source.check_manifest_revisions_exist(&[]).unwrap();
        assert!(result.is_empty());
        assert!(source.transport().requests().is_empty());
    }

    #[test]
    fn test_list_type_ref_revisions_json_schemas() {
        let transport = MockTransport::new();
        transport.respond(json!({
            "types": [
                { "revisions": [
                    { "metadata": { "path": "cap.type.db.config" }, "revision": "0.1.0", "spec": { "jsonSchema": { "type": "object" } } }
                ] },
                { "revisions": [
                    { "metadata": { "path": "cap.type.db.user" }, "revision": "0.2.0", "spec": { "jsonSchema": null } }
                ] }
            ]
        }));
        let source = source(transport);

        let filter = TypeFilter {
            path_pattern: Some("cap.type.db.*".to_string()),
        };
        let revs = source.list_type_ref_revisions_json_schemas(&filter).unwrap();
        assert_eq!(revs.len(), 2);
        assert_eq!(
            TypeReference::new(revs[1].metadata.path.as_str(), revs[1].revision.as_str()),
            TypeReference::new("cap.type.db.user", "0.2.0")
        );
        assert_eq!(revs[0].spec.json_schema, Some(json!({ "type": "object" })));

        let requests = source.transport().requests();
        assert!(requests[0].query.contains("types(filter: $typeFilter)"));
    }
}
