//! Manifest sources.
//!
//! Sources answer queries about capability manifests. Two exist: the
//! remote Hub (GraphQL) and a local directory of YAML manifests. Both
//! implement [`ManifestSource`] with identical semantics.

pub mod errors;
pub mod local;
pub mod remote;
pub mod retry;
pub mod source;

pub use errors::{HubError, LoadError};
pub use local::LocalSource;
pub use remote::{HttpTransport, QueryTransport, RemoteSource, TransportError, TypeFilter};
pub use retry::RetryPolicy;
pub use source::{InterfaceFilter, ListInterfacesOptions, ManifestSource};
