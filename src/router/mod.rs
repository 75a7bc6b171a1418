//! # Router Module
//!
//! The router module holds the ordered route table and resolves each incoming
//! request to at most one handler.
//!
//! ## Overview
//!
//! A route is a method plus optional header and query-string filters. Resolution
//! works in two steps:
//!
//! 1. **Method filter**: keep only routes registered for the request's method. If
//!    none are left the request is not allowed (405).
//! 2. **Filter scan**: walk the remaining routes in registration order and take
//!    the first whose filters accept the request. If none do, the request is not
//!    acceptable (406).
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use lux::gateway::{Request, ResponseSink};
//! use lux::router::{RouteLookup, Router};
//!
//! let mut router = Router::new();
//! router
//!     .handler(Method::POST, |w: &mut ResponseSink, _req: &Request| w.set_status(201))
//!     .headers(["X-Key", "abc"])
//!     .queries(["debug"]);
//!
//! let req = Request::new("POST").with_header("X-Key", "abc").with_query("debug", "1");
//! assert!(router.resolve(&req).is_matched());
//! assert!(matches!(router.resolve(&Request::new("POST")), RouteLookup::ConstraintMismatch));
//! assert!(matches!(router.resolve(&Request::new("GET")), RouteLookup::MethodNotAllowed));
//! ```

mod core;
mod matcher;

pub use core::{Route, RouteLookup, Router};
pub use matcher::{parse_pairs, satisfies, Constraint, Constraints, WILDCARD};
