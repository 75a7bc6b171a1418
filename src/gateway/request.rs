use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Header and query-string storage for the request envelope.
///
/// Keys are kept exactly as delivered by the gateway; lookups are
/// case-sensitive.
pub type Params = HashMap<String, String>;

/// Per-invocation context supplied by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Correlation identifier assigned by the gateway
    #[serde(default)]
    pub request_id: String,
    /// Deployment stage (e.g. `prod`)
    #[serde(default)]
    pub stage: String,
}

/// An incoming proxy request.
///
/// Field names follow the API Gateway proxy event so that events can be
/// deserialized directly. The dispatcher never mutates a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Resource template the gateway matched (e.g. `/pets/{id}`)
    #[serde(default)]
    pub resource: String,
    /// Raw request path
    #[serde(default)]
    pub path: String,
    /// HTTP method exactly as received (e.g. `GET`)
    #[serde(default)]
    pub http_method: String,
    /// Request headers
    #[serde(default, deserialize_with = "null_as_empty")]
    pub headers: Params,
    /// Query string parameters
    #[serde(default, deserialize_with = "null_as_empty")]
    pub query_string_parameters: Params,
    /// Path parameters extracted by the gateway
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path_parameters: Params,
    /// Gateway request context
    #[serde(default)]
    pub request_context: RequestContext,
    /// Raw request body
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    /// Whether `body` is base64 encoded
    #[serde(default)]
    pub is_base64_encoded: bool,
}

// The gateway sends `null` rather than `{}` / `""` for absent members.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Request {
    /// Create a request with the given method and nothing else set.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            ..Self::default()
        }
    }

    /// Add a header (last write wins).
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query string parameter (last write wins).
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the gateway correlation identifier.
    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_context.request_id = id.into();
        self
    }

    /// Get a header by its exact name
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Get a query string parameter by its exact name
    #[inline]
    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_string_parameters.get(name).map(String::as_str)
    }

    /// The gateway correlation identifier (empty when not supplied)
    #[inline]
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_context.request_id
    }
}
