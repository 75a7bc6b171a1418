//! Dispatcher core module - the request entrypoint.

use http::{Method, StatusCode};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, Dispatch, Level};
use tracing_subscriber::fmt::MakeWriter;

use super::error::{DispatchError, LookupError};
use crate::gateway::{json_response, Request, Response, ResponseSink};
use crate::ids::CorrelationId;
use crate::logging::{log_port, LogFormat};
use crate::middleware::{Handler, MiddlewareChain};
use crate::recovery::{PanicGuard, PanicInfo};
use crate::router::{Route, RouteLookup, Router};

/// Build a JSON error response, mapping encoding failures into
/// [`DispatchError::ResponseEncoding`].
///
/// # Errors
///
/// Fails only when `data` cannot be serialized.
pub fn error_response<T: Serialize + ?Sized>(
    data: &T,
    status: StatusCode,
) -> Result<Response, DispatchError> {
    json_response(data, status)
        .map_err(|source| DispatchError::ResponseEncoding { status, source })
}

/// Routes one request at a time to registered handlers.
///
/// Configure it fully (routes, middleware, recovery, logging) through `&mut
/// self`, then share it read-only; [`Dispatcher::handle`] takes `&self` and may
/// run on many threads at once.
#[derive(Default)]
pub struct Dispatcher {
    router: Router,
    middleware: MiddlewareChain,
    guard: PanicGuard,
    log: Option<Dispatch>,
}

impl Dispatcher {
    /// Create an empty dispatcher. Events go to the current default
    /// subscriber until [`Dispatcher::logging`] is called.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route handler for `method`.
    ///
    /// Header and query filters can be chained on the returned route:
    ///
    /// ```rust
    /// use http::Method;
    /// use lux::dispatcher::Dispatcher;
    /// use lux::gateway::{Request, ResponseSink};
    ///
    /// let mut dispatcher = Dispatcher::new();
    /// dispatcher
    ///     .handler(Method::GET, |w: &mut ResponseSink, _req: &Request| w.set_status(200))
    ///     .headers(["Authorization"])
    ///     .queries(["format", "json"]);
    /// ```
    pub fn handler<H: Handler + 'static>(&mut self, method: Method, handler: H) -> &mut Route {
        self.router.handler(method, handler)
    }

    /// Add a middleware run before every route handler, in registration order.
    pub fn middleware<H: Handler + 'static>(&mut self, mw: H) -> &mut Self {
        self.middleware.push(Arc::new(mw));
        self
    }

    /// Replace the default log-only panic handling with `recovery`.
    ///
    /// Not setting one does not leave panics unhandled: they are still caught,
    /// logged, and the request is finalized from whatever was written.
    pub fn recovery<F>(&mut self, recovery: F) -> &mut Self
    where
        F: Fn(PanicInfo) + Send + Sync + 'static,
    {
        self.guard.set_recovery(Arc::new(recovery));
        self
    }

    /// Send this dispatcher's events to `writer` in `format`, at INFO and above.
    pub fn logging<W>(&mut self, writer: W, format: LogFormat) -> &mut Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.log_port(log_port(writer, format, Level::INFO))
    }

    /// Use a prebuilt `tracing` dispatch as this dispatcher's log port.
    pub fn log_port(&mut self, port: Dispatch) -> &mut Self {
        self.log = Some(port);
        self
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.middleware.len()
    }

    /// Handle one request.
    ///
    /// A request with no route for its method is answered with 405; one whose
    /// method has routes but whose headers/query satisfy none of them with 406.
    /// Both carry a JSON-encoded message body. Otherwise middleware and the
    /// matched handler run under the panic guard and the sink is finalized;
    /// a handler that never sets a status yields a 500.
    ///
    /// # Errors
    ///
    /// Only when a 405/406 body fails to serialize.
    pub fn handle(&self, req: &Request) -> Result<Response, DispatchError> {
        match &self.log {
            Some(port) => tracing::dispatcher::with_default(port, || self.dispatch(req)),
            None => self.dispatch(req),
        }
    }

    fn dispatch(&self, req: &Request) -> Result<Response, DispatchError> {
        let started = Instant::now();
        let request_id = CorrelationId::for_request(req);
        let span = info_span!("request", request_id = %request_id);
        let _entered = span.enter();

        info!(
            method = %req.http_method,
            params = ?req.query_string_parameters,
            request_id = %request_id,
            "handling incoming request"
        );

        let route = match self.router.resolve(req) {
            RouteLookup::Matched(route) => route,
            RouteLookup::MethodNotAllowed => {
                let err = LookupError::NotAllowed;
                return error_response(&err.to_string(), err.status());
            }
            RouteLookup::ConstraintMismatch => {
                let err = LookupError::NotAcceptable;
                return error_response(&err.to_string(), err.status());
            }
        };

        let mut sink = ResponseSink::new();
        self.guard.guard(req, &request_id, || {
            if self.middleware.run(&mut sink, req, &request_id) {
                return;
            }
            route.handler().serve(&mut sink, req);
        });

        let resp = sink.finalize();

        info!(
            status = resp.status_code,
            duration = ?started.elapsed(),
            request_id = %request_id,
            "finished handling request"
        );

        Ok(resp)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("router", &self.router)
            .field("middleware", &self.middleware.len())
            .field("guard", &self.guard)
            .field("log_port", &self.log.is_some())
            .finish()
    }
}
