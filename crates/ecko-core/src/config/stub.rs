//! Stub definitions declared in fixture files.

use crate::types::frequency::Frequency;
use crate::types::method::HttpMethod;
use crate::types::response::{MockResponse, ResponseDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Static response registration read from a stub file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StubDefinition {
    /// Route, optionally with a literal query string
    pub route: String,
    pub method: HttpMethod,
    pub frequency: Frequency,
    /// HTTP status code, 200 when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    /// Response body; strings are sent as is, anything else as JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl StubDefinition {
    pub fn descriptor(&self) -> ResponseDescriptor {
        let response = MockResponse {
            status: self.status,
            headers: self.headers.clone(),
            payload: self.payload.clone(),
            before_response: None,
            after_response: None,
        };
        ResponseDescriptor::new(self.frequency, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::response::Responder;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn test_stub_deserialize_minimal() {
        let stub: StubDefinition =
            serde_json::from_str(r#"{"route": "/test", "method": "get", "frequency": "once"}"#)
                .expect("Should deserialize");

        assert_eq!(stub.route, "/test");
        assert_eq!(stub.method, HttpMethod::Get);
        assert_eq!(stub.frequency, Frequency::Once);
        assert_eq!(stub.status, None);
        assert!(stub.headers.is_empty());
    }

    #[rstest]
    #[case("status")]
    #[case("headers")]
    #[case("payload")]
    fn test_stub_optional_fields_omitted(#[case] field: &str) {
        let stub = StubDefinition {
            route: "/a".to_string(),
            method: HttpMethod::Post,
            frequency: Frequency::Always,
            status: None,
            headers: HashMap::new(),
            payload: None,
        };

        let json = serde_json::to_string(&stub).expect("Should serialize");
        assert!(
            !json.contains(field),
            "Field '{}' should be omitted when empty",
            field
        );
    }

    #[rstest]
    fn test_stub_descriptor() {
        let stub = StubDefinition {
            route: "/orders".to_string(),
            method: HttpMethod::Post,
            frequency: Frequency::limit(2).unwrap(),
            status: Some(201),
            headers: HashMap::from([("X-Id".to_string(), "1".to_string())]),
            payload: Some(json!({"id": 1})),
        };

        let descriptor = stub.descriptor();
        assert_eq!(descriptor.frequency, Frequency::limit(2).unwrap());
        let Responder::Static(response) = descriptor.responder else {
            panic!("stub descriptors are static");
        };
        assert_eq!(response.status, Some(201));
        assert_eq!(response.payload, Some(json!({"id": 1})));
        assert_eq!(response.headers.get("X-Id"), Some(&"1".to_string()));
    }
}
