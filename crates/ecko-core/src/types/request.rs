//! Inbound request normalization.
//!
//! A transport layer turns whatever request object it has into an
//! [`InboundRequest`]; the handler and the callbacks only ever see the
//! normalized form.

use crate::matching::{parse_query_string, split_route};
use crate::types::method::HttpMethod;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Header value as seen by callbacks: repeated headers become a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Single(String),
    Multiple(Vec<String>),
}

impl HeaderValue {
    /// First value of the header.
    pub fn first(&self) -> Option<&str> {
        match self {
            HeaderValue::Single(v) => Some(v),
            HeaderValue::Multiple(vs) => vs.first().map(String::as_str),
        }
    }
}

/// Request data handed to response generators and hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackPayload {
    pub method: HttpMethod,
    /// Header keys are always lower-case
    pub headers: HashMap<String, HeaderValue>,
    pub query_params: HashMap<String, String>,
    pub body: Value,
}

impl CallbackPayload {
    /// Case-insensitive header lookup returning the first value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(HeaderValue::first)
    }
}

/// Normalized inbound HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundRequest {
    pub method: HttpMethod,
    /// Original url (path + query string), used for logging
    pub url: String,
    pub path: String,
    pub query_params: HashMap<String, String>,
    pub headers: HashMap<String, HeaderValue>,
    pub body: Value,
}

impl InboundRequest {
    /// Build a request from a method and a url; the query string is parsed
    /// out of the url.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        let url = url.into();
        let (path, query) = split_route(&url);
        let query_params = query.map(parse_query_string).unwrap_or_default();

        Self {
            method,
            path,
            query_params,
            url,
            headers: HashMap::new(),
            body: Value::Null,
        }
    }

    /// Add a header. The key is lower-cased; adding the same header twice
    /// turns its value into a list.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        let key = name.to_lowercase();
        let merged = match self.headers.remove(&key) {
            None => HeaderValue::Single(value),
            Some(HeaderValue::Single(prev)) => HeaderValue::Multiple(vec![prev, value]),
            Some(HeaderValue::Multiple(mut prev)) => {
                prev.push(value);
                HeaderValue::Multiple(prev)
            }
        };
        self.headers.insert(key, merged);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// `[METHOD url]` prefix used in log lines.
    pub fn describe(&self) -> String {
        format!("[{} {}]", self.method, self.url)
    }

    pub fn callback_payload(&self) -> CallbackPayload {
        CallbackPayload {
            method: self.method,
            headers: self
                .headers
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.clone()))
                .collect(),
            query_params: self.query_params.clone(),
            body: self.body.clone(),
        }
    }
}
