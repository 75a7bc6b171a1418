//! # Gateway Envelope
//!
//! Request and response shapes for API Gateway proxy integrations, plus the
//! per-request [`ResponseSink`] handlers write into.
//!
//! The dispatcher treats [`Request`] as read-only input and produces exactly
//! one [`Response`] per call.

mod request;
mod response;

pub use request::{Params, Request, RequestContext};
pub use response::{json_response, Headers, Response, ResponseSink, UNSET_STATUS_BODY};
