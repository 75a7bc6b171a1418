//! Router core module - route table and request resolution.

use http::Method;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use super::matcher::{parse_pairs, satisfies, Constraints};
use crate::gateway::Request;
use crate::middleware::Handler;

/// A registered handler together with the request filters it requires.
///
/// Routes are created by [`Router::handler`] and configured through the
/// chainable [`Route::headers`] / [`Route::queries`] setters while the router
/// is still being built. After that they are only read.
pub struct Route {
    method: Method,
    headers: Constraints,
    queries: Constraints,
    handler: Arc<dyn Handler>,
}

impl Route {
    fn new(method: Method, handler: Arc<dyn Handler>) -> Self {
        Self {
            method,
            headers: Constraints::new(),
            queries: Constraints::new(),
            handler,
        }
    }

    /// Require headers on requests for this route.
    ///
    /// Takes a flat `key, value, key, value, ...` list and replaces any header
    /// filters set before. Use `"*"` (or leave the last key unpaired) to only
    /// require the header's presence.
    pub fn headers<I, S>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = parse_pairs(pairs);
        self
    }

    /// Require query-string parameters on requests for this route.
    ///
    /// Same pair-list rules as [`Route::headers`].
    pub fn queries<I, S>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queries = parse_pairs(pairs);
        self
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn header_constraints(&self) -> &Constraints {
        &self.headers
    }

    #[must_use]
    pub fn query_constraints(&self) -> &Constraints {
        &self.queries
    }

    #[must_use]
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Whether the request meets both the header and query filters.
    #[inline]
    #[must_use]
    pub fn accepts(&self, req: &Request) -> bool {
        satisfies(&self.headers, &req.headers) && satisfies(&self.queries, &req.query_string_parameters)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("queries", &self.queries)
            .finish_non_exhaustive()
    }
}

/// Outcome of resolving a request against the route table.
#[derive(Debug)]
pub enum RouteLookup<'a> {
    /// The first route (in registration order) whose method and filters match
    Matched(&'a Route),
    /// No route is registered for the request's method
    MethodNotAllowed,
    /// Routes exist for the method but none accepted the headers/query
    ConstraintMismatch,
}

impl RouteLookup<'_> {
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, RouteLookup::Matched(_))
    }
}

/// Ordered route table.
///
/// Routes are tried in the order they were registered; the first one whose
/// method and filters match wins.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `method` with no header or query filters.
    ///
    /// Returns the new route so filters can be chained onto it.
    pub fn handler<H: Handler + 'static>(&mut self, method: Method, handler: H) -> &mut Route {
        info!(method = %method, "registered new handler");

        let idx = self.routes.len();
        self.routes.push(Route::new(method, Arc::new(handler)));
        &mut self.routes[idx]
    }

    /// Find the route for a request.
    ///
    /// Only routes whose method equals the request's method (exact,
    /// case-sensitive) are considered. Per-candidate mismatch detail is not
    /// kept: a miss is reported as a single [`RouteLookup::ConstraintMismatch`].
    #[must_use]
    pub fn resolve(&self, req: &Request) -> RouteLookup<'_> {
        let mut candidates = self
            .routes
            .iter()
            .filter(|route| route.method.as_str() == req.http_method)
            .peekable();

        if candidates.peek().is_none() {
            debug!(method = %req.http_method, "No route registered for method");
            return RouteLookup::MethodNotAllowed;
        }

        match candidates.find(|route| route.accepts(req)) {
            Some(route) => RouteLookup::Matched(route),
            None => {
                debug!(method = %req.http_method, "No route accepted request headers/query");
                RouteLookup::ConstraintMismatch
            }
        }
    }

    /// Registered routes in registration order
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("routes", &self.routes).finish()
    }
}
