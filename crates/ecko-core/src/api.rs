//! Registration API handed out by [`MockServer::start`].

use crate::config::parser;
use crate::config::{ConfigError, StubDefinition};
use crate::error::EckoError;
use crate::matching::normalize_route;
use crate::server::MockServer;
use crate::types::method::HttpMethod;
use crate::types::response::ResponseDescriptor;
use tracing::{debug, info, Level};

/// Registers and clears responses on a started [`MockServer`].
#[derive(Debug, Clone)]
pub struct EckoApi {
    server: MockServer,
}

impl EckoApi {
    pub fn new(server: MockServer) -> Self {
        Self { server }
    }

    /// Register a response for `route`, which may embed a query string
    /// (`/search?q=rust`). Without one the response answers any query.
    pub async fn register(
        &self,
        route: &str,
        method: HttpMethod,
        descriptor: ResponseDescriptor,
    ) -> Result<(), EckoError> {
        self.server
            .with_registry(|registry, log_level| {
                if log_level.allows(Level::INFO) {
                    info!(
                        "Registering mock response for: {} {}",
                        method,
                        normalize_route(route)
                    );
                }
                registry.register(route, method, descriptor)
            })
            .await
    }

    /// Remove every response registered under exactly `route` and `method`.
    pub async fn clear(&self, route: &str, method: HttpMethod) -> Result<(), EckoError> {
        debug!(route = %normalize_route(route), %method, "Clearing mock responses");

        self.server
            .with_registry(|registry, _| registry.clear(route, method))
            .await
    }

    /// Register static responses read from stub files.
    pub async fn register_stubs(&self, stubs: &[StubDefinition]) -> Result<(), EckoError> {
        for stub in stubs {
            self.register(&stub.route, stub.method, stub.descriptor()).await?;
        }
        Ok(())
    }

    /// Load every stub file matching `pattern` and register its responses.
    ///
    /// Returns the number of registered stubs.
    pub async fn load_stubs(&self, pattern: &str) -> Result<usize, StubLoadError> {
        let stubs = parser::load_stubs(pattern).await?;
        self.register_stubs(&stubs).await?;
        Ok(stubs.len())
    }
}

/// Failure while loading and registering stub files
#[derive(Debug, thiserror::Error)]
pub enum StubLoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ecko(#[from] EckoError),
}
