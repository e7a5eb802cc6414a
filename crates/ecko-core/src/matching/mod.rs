//! Route key derivation: path normalization and query fingerprints.

mod query;
mod route;

pub use query::{parse_query_string, query_fingerprint};
pub use route::{normalize_route, split_route, RouteKey};
