//! # Dispatcher Module
//!
//! The dispatcher is the single entrypoint of the crate: one call to
//! [`Dispatcher::handle`] takes one [`Request`](crate::gateway::Request) and
//! returns one [`Response`](crate::gateway::Response).
//!
//! ## Request Flow
//!
//! 1. Log `"handling incoming request"` (method, query parameters, request id)
//! 2. Resolve the route; answer 405 / 406 with a JSON message on a miss
//! 3. Create a fresh [`ResponseSink`](crate::gateway::ResponseSink)
//! 4. Under the [`PanicGuard`](crate::recovery::PanicGuard), run the middleware
//!    chain and, unless it short-circuited, the route handler
//! 5. Finalize the sink (500 if no status was ever set)
//! 6. Log `"finished handling request"` (status, duration, request id)
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use lux::dispatcher::Dispatcher;
//! use lux::gateway::{Request, ResponseSink};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.handler(Method::GET, |w: &mut ResponseSink, _req: &Request| {
//!     w.set_status(200);
//!     w.write_bytes(b"ok");
//! });
//!
//! let resp = dispatcher.handle(&Request::new("GET")).unwrap();
//! assert_eq!(resp.status_code, 200);
//! assert_eq!(resp.body, "ok");
//!
//! let resp = dispatcher.handle(&Request::new("PUT")).unwrap();
//! assert_eq!(resp.status_code, 405);
//! ```
//!
//! ## Error Handling
//!
//! - No route for the method: 405 `"not allowed"`
//! - Filters not satisfied: 406 `"not acceptable"`
//! - Handler or middleware panic: caught, logged, passed to the recovery
//!   callback if any; the response is built from what was already written
//! - Status never set: 500 `failed to obtain response`
//! - Error body serialization failure: the only [`DispatchError`]

mod core;
mod error;

pub use core::{error_response, Dispatcher};
pub use error::{DispatchError, LookupError};
