//! Server context: lifecycle, shared registry and the request handler.
//!
//! [`MockServer`] is the explicit context every operation goes through. It
//! starts unconfigured; [`MockServer::start`] installs an empty registry and
//! hands out an [`EckoApi`] for registering responses. A transport layer
//! normalizes each inbound request into an [`InboundRequest`] and calls
//! [`MockServer::handle`], rendering [`MockReply::NotFound`] as a 404 with an
//! empty body.

use crate::api::EckoApi;
use crate::config::{LogLevel, StartOptions};
use crate::error::EckoError;
use crate::mocks::registry::Registry;
use crate::types::request::{CallbackPayload, InboundRequest};
use crate::types::response::MockResponse;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn, Level};

/// Status sent when no response is registered for a request
pub const NOT_FOUND_STATUS: u16 = 404;

/// Status sent when a response does not set one
pub const DEFAULT_STATUS: u16 = 200;

/// Configuration owned by a started server.
#[derive(Debug)]
struct ServerState {
    options: StartOptions,
    registry: Registry,
}

/// Handle returned by [`MockServer::start`].
#[derive(Debug, Clone)]
pub struct StartResult {
    pub ecko: EckoApi,
    pub base_url: String,
}

/// Response ready to be written by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Outcome of handling one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Found(RenderedResponse),
    /// No registered response; rendered as 404 with an empty body
    NotFound,
}

impl MockReply {
    /// Status to send, 404 for `NotFound`.
    pub fn status(&self) -> u16 {
        match self {
            MockReply::Found(response) => response.status,
            MockReply::NotFound => NOT_FOUND_STATUS,
        }
    }

    /// Body to send, empty for `NotFound`.
    pub fn body(&self) -> &str {
        match self {
            MockReply::Found(response) => &response.body,
            MockReply::NotFound => "",
        }
    }

    /// Case-insensitive lookup of a response header.
    pub fn header(&self, name: &str) -> Option<&str> {
        match self {
            MockReply::Found(response) => response
                .headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            MockReply::NotFound => None,
        }
    }
}

/// In-process mock server context.
///
/// Cloning shares the same state. Independent instances never see each
/// other's registrations.
#[derive(Debug, Clone, Default)]
pub struct MockServer {
    state: Arc<Mutex<Option<ServerState>>>,
}

impl MockServer {
    /// Create an unconfigured server
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the server with an empty registry.
    ///
    /// Starting an already started server keeps its state and options.
    pub async fn start(&self, options: StartOptions) -> StartResult {
        let mut state = self.state.lock().await;

        let base_url = match state.as_ref().map(|s| s.options.base_url()) {
            Some(base_url) => {
                debug!(%base_url, "Server already started");
                base_url
            }
            None => {
                init_logging(options.log_level);
                let base_url = options.base_url();
                if options.log_level.allows(Level::INFO) {
                    info!(port = options.port, "Mock server started");
                }
                *state = Some(ServerState {
                    options,
                    registry: Registry::new(),
                });
                base_url
            }
        };

        StartResult {
            ecko: EckoApi::new(self.clone()),
            base_url,
        }
    }

    /// Drop the configuration and every registered response.
    pub async fn stop(&self) {
        if let Some(state) = self.state.lock().await.take() {
            if state.options.log_level.allows(Level::INFO) {
                info!("Mock server stopped");
            }
        }
    }

    /// Replace the registry with an empty one. Does nothing when the server
    /// is not started.
    pub async fn reset(&self) {
        if let Some(state) = self.state.lock().await.as_mut() {
            state.registry = Registry::new();
            debug!("Registry reset");
        }
    }

    /// Whether `start` has run and `stop` has not.
    pub async fn is_configured(&self) -> bool {
        self.state.lock().await.is_some()
    }

    /// Run `f` against the registry and the server's log level while holding
    /// the state lock.
    pub(crate) async fn with_registry<R>(
        &self,
        f: impl FnOnce(&mut Registry, LogLevel) -> R,
    ) -> Result<R, EckoError> {
        let mut state = self.state.lock().await;
        let state = state.as_mut().ok_or(EckoError::NotConfigured)?;
        Ok(f(&mut state.registry, state.options.log_level))
    }

    /// Answer one inbound request.
    ///
    /// The response is picked and consumed before the lock is released;
    /// generators and hooks run afterwards. A failing callback is returned as
    /// [`EckoError::Callback`] and the consumed response stays consumed.
    pub async fn handle(&self, request: InboundRequest) -> Result<MockReply, EckoError> {
        let info = request.describe();

        let (descriptor, log_level) = self
            .with_registry(|registry, log_level| {
                if log_level.allows(Level::INFO) {
                    info!(request = %info, "Mock endpoint called.");
                }
                let query = &request.query_params;
                let descriptor = registry.resolve_and_consume(request.method, &request.path, query);
                (descriptor, log_level)
            })
            .await?;

        let Some(descriptor) = descriptor else {
            if log_level.allows(Level::WARN) {
                warn!(request = %info, "No response found.");
            }
            return Ok(MockReply::NotFound);
        };

        let payload = request.callback_payload();
        let response = descriptor
            .resolve(payload.clone())
            .await
            .map_err(EckoError::Callback)?;

        render(&info, log_level, response, payload)
            .await
            .map(MockReply::Found)
    }
}

async fn render(
    info: &str,
    log_level: LogLevel,
    response: MockResponse,
    payload: CallbackPayload,
) -> Result<RenderedResponse, EckoError> {
    let mut rendered = RenderedResponse {
        status: response.status.unwrap_or(DEFAULT_STATUS),
        headers: response.headers,
        body: String::new(),
    };

    if let Some(hook) = &response.before_response {
        if log_level.allows(Level::INFO) {
            info!(request = %info, "Calling beforeResponse.");
        }
        hook.call(payload.clone())
            .await
            .map_err(EckoError::Callback)?;
    }

    rendered.body = match response.payload {
        None => String::new(),
        Some(Value::String(text)) => text,
        Some(value) => value.to_string(),
    };

    if let Some(hook) = &response.after_response {
        if log_level.allows(Level::INFO) {
            info!(request = %info, "Calling afterResponse.");
        }
        hook.call(payload).await.map_err(EckoError::Callback)?;
    }

    Ok(rendered)
}

/// Install a fmt subscriber at `level` unless the host already installed one.
fn init_logging(level: LogLevel) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(Level::from(level))
        .with_target(false)
        .try_init();

    if installed.is_err() {
        debug!("Global subscriber already set, keeping it");
    }
}
