//! Error types surfaced by the registry, the server context and callbacks.

use thiserror::Error;

/// Boxed error returned by response generators and hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by Ecko operations.
///
/// A request with no registered response is not an error, see
/// [`MockReply::NotFound`](crate::server::MockReply::NotFound).
#[derive(Debug, Error)]
pub enum EckoError {
    /// Method string outside the supported HTTP verb set
    #[error("Invalid request method: {0}")]
    InvalidMethod(String),
    /// Operation attempted before the server was started
    #[error("Server must be started before config can be accessed.")]
    NotConfigured,
    /// A response generator or a before/after hook failed
    #[error(transparent)]
    Callback(BoxError),
}
