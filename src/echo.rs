use http::StatusCode;
use serde_json::json;

use crate::gateway::{Request, ResponseSink};

/// Example handler: echoes the request back as JSON with status 200.
pub fn echo_handler(w: &mut ResponseSink, req: &Request) {
    let body = json!({
        "method": req.http_method,
        "path": req.path,
        "query": req.query_string_parameters,
        "body": req.body,
        "requestId": req.request_id(),
    });

    w.headers()
        .insert("Content-Type".to_string(), "application/json".to_string());
    w.write_bytes(body.to_string().as_bytes());
    w.set_status(StatusCode::OK.as_u16());
}
