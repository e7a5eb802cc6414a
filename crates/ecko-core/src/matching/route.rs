//! Route strings and the keys responses are stored under.

use crate::matching::query::{parse_query_string, query_fingerprint};
use crate::types::method::HttpMethod;
use std::collections::HashMap;
use std::fmt;

/// Make sure the route starts with a slash. Trailing slashes and case are
/// kept as given.
pub fn normalize_route(route: &str) -> String {
    if route.starts_with('/') {
        route.to_string()
    } else {
        format!("/{route}")
    }
}

/// Split a route into its normalized path and its query string.
///
/// The query string is `None` when the route has no `?` or nothing after it.
pub fn split_route(route: &str) -> (String, Option<&str>) {
    match route.split_once('?') {
        Some((path, query)) if !query.is_empty() => (normalize_route(path), Some(query)),
        Some((path, _)) => (normalize_route(path), None),
        None => (normalize_route(route), None),
    }
}

/// Identity of a response stack: method, path and optional query fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: HttpMethod,
    pub path: String,
    pub query: Option<String>,
}

impl RouteKey {
    /// Key for a request or registration with the given query parameters.
    pub fn new(method: HttpMethod, path: &str, query_params: &HashMap<String, String>) -> Self {
        Self {
            method,
            path: normalize_route(path),
            query: query_fingerprint(query_params),
        }
    }

    /// Key for a route string that may embed a literal query string.
    pub fn from_route(method: HttpMethod, route: &str) -> Self {
        let (path, query) = split_route(route);
        let query_params = query.map(parse_query_string).unwrap_or_default();

        Self {
            method,
            path,
            query: query_fingerprint(&query_params),
        }
    }

    /// The same method and path with the query fingerprint unset.
    pub fn without_query(&self) -> Self {
        Self {
            method: self.method,
            path: self.path.clone(),
            query: None,
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{} {}?{}", self.method, self.path, query),
            None => write!(f, "{} {}", self.method, self.path),
        }
    }
}
