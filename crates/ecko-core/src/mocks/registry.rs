//! Response registry: stacks of registered responses keyed by route.
//!
//! Responses for a route form a stack. The latest one is served; a `once`
//! response, or a `limit` response whose counter runs out, is removed after
//! serving and the next one down is used on the following request. In this
//! way responses for a route can be built up and are played back in order.

use crate::matching::RouteKey;
use crate::types::frequency::Consumption;
use crate::types::method::HttpMethod;
use crate::types::response::ResponseDescriptor;
use std::collections::HashMap;
use tracing::debug;

/// Responses registered for one route, served from the end.
pub type ResponseStack = Vec<ResponseDescriptor>;

/// In-memory store of registered responses.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Map of route key to its response stack
    responses: HashMap<RouteKey, ResponseStack>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    /// Register a response for a route string that may embed a query string.
    ///
    /// Registering an `always` response replaces any earlier `always`
    /// response for the same key.
    pub fn register(&mut self, route: &str, method: HttpMethod, descriptor: ResponseDescriptor) {
        let key = RouteKey::from_route(method, route);
        let stack = self.responses.entry(key).or_default();

        // More than one "always" response per route makes no sense
        if descriptor.frequency.is_always() {
            stack.retain(|existing| !existing.frequency.is_always());
        }

        stack.push(descriptor);
    }

    /// Pick the response for a request and record that it was served.
    ///
    /// Looks up the exact query fingerprint first, then falls back to the
    /// registration without query parameters. Returns `None` when neither
    /// has a response left.
    pub fn resolve_and_consume(
        &mut self,
        method: HttpMethod,
        path: &str,
        query_params: &HashMap<String, String>,
    ) -> Option<ResponseDescriptor> {
        let exact = RouteKey::new(method, path, query_params);
        let key = if self.has_responses(&exact) {
            exact
        } else {
            let fallback = exact.without_query();
            if !self.has_responses(&fallback) {
                debug!(route = %exact, "No registered response");
                return None;
            }
            fallback
        };

        self.consume(&key)
    }

    fn has_responses(&self, key: &RouteKey) -> bool {
        self.responses
            .get(key)
            .is_some_and(|stack| !stack.is_empty())
    }

    fn consume(&mut self, key: &RouteKey) -> Option<ResponseDescriptor> {
        let stack = self.responses.get_mut(key)?;
        let top = stack.last_mut()?;

        let consumption = top.frequency.consume();
        let served = top.clone();

        if consumption == Consumption::Remove {
            stack.pop();
            debug!(route = %key, left = stack.len(), "Response exhausted");
            if stack.is_empty() {
                self.responses.remove(key);
            }
        }

        Some(served)
    }

    /// Remove every response registered under the exact key of `route`.
    pub fn clear(&mut self, route: &str, method: HttpMethod) {
        let key = RouteKey::from_route(method, route);
        self.responses.remove(&key);
    }

    /// Drop every registered response.
    pub fn reset(&mut self) {
        self.responses.clear();
    }

    /// Responses currently stacked for the exact key of `route`.
    pub fn responses(&self, route: &str, method: HttpMethod) -> &[ResponseDescriptor] {
        let key = RouteKey::from_route(method, route);
        self.responses
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether no route has a response left.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}
