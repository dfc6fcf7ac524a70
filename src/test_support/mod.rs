//! Test utilities and mocks for hubq unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use hubq::test_support::{ManifestDir, MockTransport};
//!
//! #[test]
//! fn test_example() {
//!     let transport = MockTransport::new();
//!     transport.respond(serde_json::json!({ "interface": null }));
//!
//!     let dir = ManifestDir::new();
//!     dir.interface("cap.interface.db.install", "0.1.0");
//! }
//! ```

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::sources::remote::{QueryRequest, QueryTransport, TransportError};

pub use fixtures::*;

/// Scripted query transport.
///
/// Replies are consumed in order, one per request; every request is
/// recorded so tests can assert on the query text and variables.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<Value, TransportError>>>,
    requests: Mutex<Vec<QueryRequest>>,
}

impl MockTransport {
    /// Create a transport with no scripted replies.
    pub fn new() -> Self {
        MockTransport::default()
    }

    /// Queue a successful reply carrying `data`.
    pub fn respond(&self, data: Value) -> &Self {
        self.replies.lock().unwrap().push_back(Ok(data));
        self
    }

    /// Queue a failed reply.
    pub fn fail(&self, error: TransportError) -> &Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl QueryTransport for MockTransport {
    fn run(&self, request: &QueryRequest) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted reply for {}", request.operation_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn request(name: &str) -> QueryRequest {
        QueryRequest {
            operation_name: name.to_string(),
            query: format!("query {} {{}}", name),
            variables: Map::new(),
        }
    }

    #[test]
    fn test_mock_transport_replies_in_order() {
        let transport = MockTransport::new();
        transport
            .respond(json!({ "first": true }))
            .fail(TransportError::MissingData);

        assert_eq!(transport.run(&request("A")).unwrap(), json!({ "first": true }));
        assert!(transport.run(&request("B")).is_err());

        let names: Vec<String> = transport
            .requests()
            .into_iter()
            .map(|r| r.operation_name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    #[should_panic(expected = "no scripted reply")]
    fn test_mock_transport_without_reply() {
        let transport = MockTransport::new();
        let _ = transport.run(&request("A"));
    }
}
