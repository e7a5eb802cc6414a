//! Configuration: server start options and stub files.

pub mod error;
pub mod options;
pub mod parser;
pub mod stub;

pub use error::ConfigError;
pub use options::{LogLevel, StartOptions};
pub use stub::StubDefinition;
