use http::StatusCode;
use std::fmt;

/// Why a request could not be routed.
///
/// Both variants are answered locally with a JSON error body; they never
/// reach the caller as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// No route is registered for the request's method
    NotAllowed,
    /// Routes exist for the method but none accepted the request's headers/query
    NotAcceptable,
}

impl LookupError {
    /// Status code the error is answered with
    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            LookupError::NotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            LookupError::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotAllowed => write!(f, "not allowed"),
            LookupError::NotAcceptable => write!(f, "not acceptable"),
        }
    }
}

impl std::error::Error for LookupError {}

/// Error returned from [`Dispatcher::handle`](super::Dispatcher::handle).
///
/// Every other failure (unrouteable requests, handler panics, unset status)
/// resolves into a [`Response`](crate::gateway::Response).
#[derive(Debug)]
pub enum DispatchError {
    /// An error response body could not be serialized
    ResponseEncoding {
        /// Status of the response that was being built
        status: StatusCode,
        source: serde_json::Error,
    },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::ResponseEncoding { status, source } => {
                write!(
                    f,
                    "failed to encode response body for status {}: {}",
                    status.as_u16(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::ResponseEncoding { source, .. } => Some(source),
        }
    }
}
