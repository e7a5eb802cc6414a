//! Ecko core: in-process HTTP response stubbing.
//!
//! Responses are registered per route and method, optionally pinned to an
//! exact set of query parameters. Each inbound request is answered by the
//! most recently registered response that is not used up yet:
//!
//! - `always` responses are served until cleared; registering another
//!   `always` response for the same route replaces the previous one
//! - `once` responses are removed after serving one request
//! - `limit` responses are removed after serving `n` requests
//!
//! A route registered without a query string answers requests with any query
//! parameters, unless a registration with exactly the request's parameters
//! exists.
//!
//! ```ignore
//! let server = MockServer::new();
//! let StartResult { ecko, .. } = server.start(StartOptions::new(3005)).await;
//!
//! ecko.register(
//!     "/orders",
//!     HttpMethod::Post,
//!     ResponseDescriptor::always(MockResponse::new().status(201).payload(json!({"id": 1}))),
//! )
//! .await?;
//!
//! let reply = server.handle(InboundRequest::new(HttpMethod::Post, "/orders")).await?;
//! assert_eq!(reply.status(), 201);
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod matching;
pub mod mocks;
pub mod server;
pub mod types;

pub use api::{EckoApi, StubLoadError};
pub use config::{LogLevel, StartOptions};
pub use error::{BoxError, EckoError};
pub use mocks::registry::Registry;
pub use server::{MockReply, MockServer, RenderedResponse, StartResult};
pub use types::frequency::Frequency;
pub use types::method::HttpMethod;
pub use types::request::{CallbackPayload, HeaderValue, InboundRequest};
pub use types::response::{
    MockResponse, Responder, ResponseDescriptor, ResponseGenerator, ResponseHook,
};
