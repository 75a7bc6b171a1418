use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

use crate::gateway::Request;

/// Identifier used to correlate the log events of one dispatch.
///
/// Taken from the gateway request context when present; otherwise a fresh ULID
/// is generated so that events from the same request can still be joined.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Use the request's gateway id, or generate one if it is empty.
    #[must_use]
    pub fn for_request(req: &Request) -> Self {
        match req.request_id() {
            "" => Self::generate(),
            id => Self(id.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CorrelationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CorrelationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
