//! Core domain types: methods, frequencies, requests and responses.

pub mod frequency;
pub mod method;
pub mod request;
pub mod response;
