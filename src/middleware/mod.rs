//! # Middleware Module
//!
//! Handlers and middleware share the [`Handler`] signature. Middleware runs in
//! registration order before the route handler, against the same
//! [`ResponseSink`](crate::gateway::ResponseSink); the first one to set a status
//! short-circuits the rest of the pipeline.

mod auth;
mod core;

pub use auth::AuthMiddleware;
pub use core::{Handler, MiddlewareChain};
