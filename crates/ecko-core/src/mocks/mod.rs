//! Mocks storage module.
//!
//! [`Registry`](registry::Registry) stores registered responses per route and
//! decides which one answers a request, consuming `once`/`limit` responses as
//! they are served.

pub mod registry;
