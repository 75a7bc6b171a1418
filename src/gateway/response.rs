use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;

/// Response header storage. Last write per key wins.
pub type Headers = HashMap<String, String>;

/// Body returned when a handler finishes without setting a status code.
pub const UNSET_STATUS_BODY: &str = "failed to obtain response";

/// An outgoing proxy response, produced once per dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl Response {
    /// Get a header by its exact name
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Build a response whose body is the JSON encoding of `data`, with a
/// `Content-Type: application/json` header.
///
/// # Errors
///
/// Returns the serializer error when `data` cannot be encoded.
pub fn json_response<T: Serialize + ?Sized>(
    data: &T,
    status: StatusCode,
) -> Result<Response, serde_json::Error> {
    let body = serde_json::to_string(data)?;
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    Ok(Response {
        status_code: status.as_u16(),
        headers,
        body,
        is_base64_encoded: false,
    })
}

/// Per-request accumulator for status, headers and body.
///
/// Handlers and middleware share one sink for the life of a dispatch. A status
/// of `0` means "not set yet"; middleware that sets any status stops the chain.
#[derive(Debug, Default)]
pub struct ResponseSink {
    status: u16,
    headers: Headers,
    body: Vec<u8>,
}

impl ResponseSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes to the body. Never fails; returns the number of bytes taken.
    pub fn write_bytes(&mut self, data: &[u8]) -> usize {
        self.body.extend_from_slice(data);
        data.len()
    }

    /// Set the status code. The last call wins.
    pub fn set_status(&mut self, code: u16) {
        self.status = code;
    }

    /// Current status code, `0` when unset.
    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether any status has been set yet.
    #[inline]
    #[must_use]
    pub fn has_status(&self) -> bool {
        self.status != 0
    }

    /// Mutable access to the response headers.
    pub fn headers(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Bytes written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Turn the accumulated state into the final response.
    ///
    /// An unset status always yields a bare 500 with [`UNSET_STATUS_BODY`],
    /// discarding anything already written.
    #[must_use]
    pub fn finalize(self) -> Response {
        if self.status == 0 {
            return Response {
                status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                headers: Headers::new(),
                body: UNSET_STATUS_BODY.to_string(),
                is_base64_encoded: false,
            };
        }

        Response {
            status_code: self.status,
            headers: self.headers,
            body: String::from_utf8_lossy(&self.body).into_owned(),
            is_base64_encoded: false,
        }
    }
}

impl io::Write for ResponseSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
