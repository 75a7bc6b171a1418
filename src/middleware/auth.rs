use http::StatusCode;
use tracing::warn;

use super::Handler;
use crate::gateway::{Request, ResponseSink};

/// Shared-token check on a request header.
///
/// Requests whose `header` is missing or differs from the configured token are
/// answered with `401 {"error":"unauthorized"}` and never reach the route
/// handler.
pub struct AuthMiddleware {
    header: String,
    token: String,
}

impl AuthMiddleware {
    pub fn new(header: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            token: token.into(),
        }
    }
}

impl Handler for AuthMiddleware {
    fn serve(&self, w: &mut ResponseSink, req: &Request) {
        if req.header(&self.header) == Some(self.token.as_str()) {
            return;
        }

        warn!(
            request_id = %req.request_id(),
            header = %self.header,
            "Rejected request with missing or invalid token"
        );
        w.headers()
            .insert("Content-Type".to_string(), "application/json".to_string());
        w.write_bytes(br#"{"error":"unauthorized"}"#);
        w.set_status(StatusCode::UNAUTHORIZED.as_u16());
    }
}
