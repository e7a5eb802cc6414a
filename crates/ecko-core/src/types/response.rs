//! Registered responses: static payloads, generators and hooks.

use crate::error::BoxError;
use crate::types::frequency::Frequency;
use crate::types::request::CallbackPayload;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Produces a response from the inbound request at serving time.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, payload: CallbackPayload) -> Result<MockResponse, BoxError>;
}

#[async_trait]
impl<F, Fut> ResponseGenerator for F
where
    F: Fn(CallbackPayload) -> Fut + Send + Sync,
    Fut: Future<Output = Result<MockResponse, BoxError>> + Send,
{
    async fn generate(&self, payload: CallbackPayload) -> Result<MockResponse, BoxError> {
        (self)(payload).await
    }
}

/// Side effect run around sending a response.
#[async_trait]
pub trait ResponseHook: Send + Sync {
    async fn call(&self, payload: CallbackPayload) -> Result<(), BoxError>;
}

#[async_trait]
impl<F, Fut> ResponseHook for F
where
    F: Fn(CallbackPayload) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BoxError>> + Send,
{
    async fn call(&self, payload: CallbackPayload) -> Result<(), BoxError> {
        (self)(payload).await
    }
}

/// Static response payload.
#[derive(Clone, Default)]
pub struct MockResponse {
    /// Status code, 200 when unset
    pub status: Option<u16>,
    pub headers: HashMap<String, String>,
    pub payload: Option<Value>,
    /// Called after status and headers are set, before the body is sent
    pub before_response: Option<Arc<dyn ResponseHook>>,
    /// Called after the body is sent
    pub after_response: Option<Arc<dyn ResponseHook>>,
}

impl MockResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn before_response(mut self, hook: impl ResponseHook + 'static) -> Self {
        self.before_response = Some(Arc::new(hook));
        self
    }

    pub fn after_response(mut self, hook: impl ResponseHook + 'static) -> Self {
        self.after_response = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for MockResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("payload", &self.payload)
            .field("before_response", &self.before_response.is_some())
            .field("after_response", &self.after_response.is_some())
            .finish()
    }
}

/// How a registered response produces its payload.
#[derive(Clone)]
pub enum Responder {
    Static(MockResponse),
    Dynamic(Arc<dyn ResponseGenerator>),
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Responder::Static(response) => f.debug_tuple("Static").field(response).finish(),
            Responder::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// One registered response together with its frequency policy.
#[derive(Debug, Clone)]
pub struct ResponseDescriptor {
    pub frequency: Frequency,
    pub responder: Responder,
}

impl ResponseDescriptor {
    pub fn new(frequency: Frequency, response: MockResponse) -> Self {
        Self {
            frequency,
            responder: Responder::Static(response),
        }
    }

    pub fn dynamic(frequency: Frequency, generator: impl ResponseGenerator + 'static) -> Self {
        Self {
            frequency,
            responder: Responder::Dynamic(Arc::new(generator)),
        }
    }

    pub fn always(response: MockResponse) -> Self {
        Self::new(Frequency::Always, response)
    }

    pub fn once(response: MockResponse) -> Self {
        Self::new(Frequency::Once, response)
    }

    /// Serve `response` `limit` times. A zero limit is rejected with `None`.
    pub fn limited(limit: u32, response: MockResponse) -> Option<Self> {
        Frequency::limit(limit).map(|frequency| Self::new(frequency, response))
    }

    /// Resolve the payload, running the generator for dynamic responders.
    pub async fn resolve(&self, payload: CallbackPayload) -> Result<MockResponse, BoxError> {
        match &self.responder {
            Responder::Static(response) => Ok(response.clone()),
            Responder::Dynamic(generator) => generator.generate(payload).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::method::HttpMethod;
    use rstest::rstest;
    use serde_json::json;

    fn payload() -> CallbackPayload {
        CallbackPayload {
            method: HttpMethod::Get,
            headers: HashMap::new(),
            query_params: HashMap::from([("name".to_string(), "ada".to_string())]),
            body: Value::Null,
        }
    }

    #[rstest]
    fn test_builder() {
        let response = MockResponse::new()
            .status(201)
            .header("X-Test", "1")
            .payload(json!({"id": 1}));

        assert_eq!(response.status, Some(201));
        assert_eq!(response.headers.get("X-Test"), Some(&"1".to_string()));
        assert_eq!(response.payload, Some(json!({"id": 1})));
        assert!(response.before_response.is_none());
    }

    #[rstest]
    fn test_limited_rejects_zero() {
        assert!(ResponseDescriptor::limited(0, MockResponse::new()).is_none());
        assert!(ResponseDescriptor::limited(1, MockResponse::new()).is_some());
    }

    #[tokio::test]
    async fn test_resolve_static() {
        let descriptor = ResponseDescriptor::always(MockResponse::new().payload("hello"));
        let response = descriptor.resolve(payload()).await.unwrap();
        assert_eq!(response.payload, Some(json!("hello")));
    }

    #[tokio::test]
    async fn test_resolve_dynamic() {
        let greet = |p: CallbackPayload| async move {
            let name = p.query_params.get("name").cloned().unwrap_or_default();
            Ok::<_, BoxError>(MockResponse::new().payload(format!("hi {name}")))
        };
        let descriptor = ResponseDescriptor::dynamic(Frequency::Always, greet);

        let response = descriptor.resolve(payload()).await.unwrap();
        assert_eq!(response.payload, Some(json!("hi ada")));
    }

    #[tokio::test]
    async fn test_resolve_dynamic_error() {
        let descriptor = ResponseDescriptor::dynamic(Frequency::Once, |_: CallbackPayload| async {
            Err::<MockResponse, BoxError>("generator failed".into())
        });

        let err = descriptor.resolve(payload()).await.unwrap_err();
        assert_eq!(err.to_string(), "generator failed");
    }

    #[rstest]
    fn test_debug_hides_callbacks() {
        let descriptor = ResponseDescriptor::dynamic(Frequency::Always, |_: CallbackPayload| async {
            Ok::<_, BoxError>(MockResponse::new())
        });
        assert!(format!("{:?}", descriptor).contains("Dynamic(..)"));
    }
}
