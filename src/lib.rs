//! # Lux
//!
//! **Lux** is a request-dispatch core for function handlers behind an API
//! Gateway proxy integration. One call takes one request, picks a registered
//! handler, runs it behind a middleware chain and a panic guard, and returns one
//! response. There is no socket, connection or runtime loop in here.
//!
//! ## Architecture
//!
//! - **[`gateway`]** - Request/response envelopes and the per-request
//!   [`ResponseSink`](gateway::ResponseSink)
//! - **[`router`]** - Ordered route table with header and query-string filters
//! - **[`middleware`]** - The [`Handler`](middleware::Handler) trait, the
//!   middleware chain and stock middleware
//! - **[`recovery`]** - Panic guard and [`PanicInfo`](recovery::PanicInfo)
//! - **[`dispatcher`]** - The [`Dispatcher`](dispatcher::Dispatcher) entrypoint
//! - **[`logging`]** - Subscriber setup and per-dispatcher log ports
//! - **[`cli`]** - The `lux-local` invocation harness
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Dispatcher
//!     participant Router
//!     participant Guard as PanicGuard
//!     participant Chain as Middleware Chain
//!     participant Handler
//!     participant Sink as ResponseSink
//!
//!     Caller->>Dispatcher: handle(request)
//!     Dispatcher->>Router: resolve(request)
//!
//!     alt No route for method
//!         Dispatcher-->>Caller: 405 "not allowed"
//!     else Filters not satisfied
//!         Dispatcher-->>Caller: 406 "not acceptable"
//!     end
//!
//!     Dispatcher->>Guard: guard(request, body)
//!     Guard->>Chain: run(sink, request)
//!     alt Middleware set a status
//!         Chain-->>Guard: short-circuited
//!     else
//!         Guard->>Handler: serve(sink, request)
//!     end
//!
//!     alt Panic
//!         Guard->>Guard: normalize payload, snapshot stack, log
//!         Guard->>Guard: recovery callback (optional)
//!     end
//!
//!     Dispatcher->>Sink: finalize()
//!     Dispatcher-->>Caller: Response
//! ```
//!
//! ## Quick Start
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
//! dispatcher
//!     .handler(Method::POST, |w: &mut ResponseSink, _req: &Request| {
//!         w.set_status(200);
//!         w.write_bytes(b"secure");
//!     })
//!     .headers(["X-Key", "abc"]);
//!
//! let ok = dispatcher.handle(&Request::new("GET")).unwrap();
//! assert_eq!((ok.status_code, ok.body.as_str()), (200, "ok"));
//!
//! let denied = dispatcher.handle(&Request::new("POST")).unwrap();
//! assert_eq!(denied.status_code, 406);
//!
//! let secure = dispatcher
//!     .handle(&Request::new("POST").with_header("X-Key", "abc"))
//!     .unwrap();
//! assert_eq!((secure.status_code, secure.body.as_str()), (200, "secure"));
//! ```
//!
//! ## Concurrency
//!
//! Configuration happens through `&mut Dispatcher`; serving through `&Dispatcher`.
//! Once built, a dispatcher can be shared (e.g. in an `Arc`) and `handle` called
//! from any number of threads. Each call owns its own sink.
//!
//! ## Panics
//!
//! Handler panics are caught with `catch_unwind`. Building with
//! `panic = "abort"` turns every handler panic into a process abort.
//!
//! The process panic hook still runs before recovery, so by default each
//! recovered panic also prints a `thread '...' panicked at` line to stderr.
//! Install a quieter hook with [`std::panic::set_hook`] if the dispatcher's
//! `"recovered from panic"` event should be the only record; see
//! [`recovery`](crate::recovery#panic-hook).

pub mod cli;
pub mod dispatcher;
pub mod echo;
pub mod gateway;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod recovery;
pub mod router;

pub use dispatcher::{DispatchError, Dispatcher};
pub use gateway::{Request, Response, ResponseSink};
pub use logging::LogFormat;
pub use middleware::Handler;
pub use recovery::PanicInfo;
