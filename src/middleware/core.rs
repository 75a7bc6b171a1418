use std::sync::Arc;
use tracing::debug;

use crate::gateway::{Request, ResponseSink};
use crate::ids::CorrelationId;

/// A request handler.
///
/// Route handlers and middleware share this signature. A handler reports its
/// outcome by writing to the sink; setting a status from middleware ends the
/// pipeline before the route handler runs.
///
/// Any `Fn(&mut ResponseSink, &Request) + Send + Sync` closure is a handler.
pub trait Handler: Send + Sync {
    fn serve(&self, w: &mut ResponseSink, req: &Request);
}

impl<F> Handler for F
where
    F: Fn(&mut ResponseSink, &Request) + Send + Sync,
{
    fn serve(&self, w: &mut ResponseSink, req: &Request) {
        self(w, req);
    }
}

/// Ordered middleware run before every route handler.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Handler>>,
}

impl MiddlewareChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware. Middleware runs in the order it was added.
    pub fn push(&mut self, mw: Arc<dyn Handler>) {
        self.middlewares.push(mw);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Run every middleware against the shared sink.
    ///
    /// Stops at the first middleware that leaves a status set on the sink and
    /// returns `true` (short-circuited). Returns `false` when the whole chain
    /// ran with the status still unset.
    pub fn run(&self, w: &mut ResponseSink, req: &Request, request_id: &CorrelationId) -> bool {
        for (idx, mw) in self.middlewares.iter().enumerate() {
            mw.serve(w, req);
            if w.has_status() {
                debug!(
                    request_id = %request_id,
                    middleware_idx = idx,
                    status = w.status(),
                    "Middleware returned early response"
                );
                return true;
            }
        }
        false
    }
}
