//! # Panic Recovery
//!
//! [`PanicGuard`] runs the middleware chain and route handler inside
//! [`std::panic::catch_unwind`]. A panic raised below the guard is turned into a
//! [`PanicInfo`], logged, optionally handed to a user callback, and then
//! swallowed: the dispatcher goes on to finalize whatever the handler had
//! already written.
//!
//! Panic payloads are normalized into an [`anyhow::Error`]:
//!
//! | payload                                   | resulting error            |
//! |-------------------------------------------|----------------------------|
//! | `anyhow::Error`                           | passed through             |
//! | `Box<dyn Error + Send + Sync>`            | wrapped, source kept       |
//! | `io::Error` and other std error values    | wrapped, source kept       |
//! | `Box<dyn Error + Send>`                   | error with its message     |
//! | `String` / `&'static str`                 | error with that message    |
//! | integer, float, `bool`, `char`            | stringified value          |
//! | anything else                             | generic "non-displayable"  |
//!
//! Note that a release profile with `panic = "abort"` disables this entirely.
//!
//! ## Panic hook
//!
//! `catch_unwind` does not replace the process panic hook. The default hook
//! still prints `thread '...' panicked at ...` to stderr before the guard sees
//! the panic, outside any dispatcher log port. Binaries that want the
//! `"recovered from panic"` event to be the only record can install their own
//! hook:
//!
//! ```rust
//! std::panic::set_hook(Box::new(|info| {
//!     tracing::debug!(panic = %info, "panic hook");
//! }));
//! # let _ = std::panic::take_hook();
//! ```

use std::any::Any;
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::anyhow;
use tracing::error;

use crate::gateway::Request;
use crate::ids::CorrelationId;

/// Upper bound on the captured stack snapshot, in bytes.
pub const STACK_SNAPSHOT_LIMIT: usize = 8 * 1024;

/// Details of a panic intercepted while serving a request.
#[derive(Debug)]
pub struct PanicInfo {
    /// The normalized panic payload
    pub error: anyhow::Error,
    /// Stack trace text captured at interception, at most [`STACK_SNAPSHOT_LIMIT`] bytes
    pub stack: Vec<u8>,
    /// The request being served when the panic happened
    pub request: Request,
    /// Correlation id of the dispatch, as logged on its other events
    pub request_id: CorrelationId,
}

impl PanicInfo {
    /// The stack snapshot as text
    #[must_use]
    pub fn stack_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.stack)
    }
}

/// User callback invoked with each recovered panic.
pub type RecoverFn = Arc<dyn Fn(PanicInfo) + Send + Sync>;

/// Catches panics from request processing.
#[derive(Clone, Default)]
pub struct PanicGuard {
    recovery: Option<RecoverFn>,
}

impl PanicGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default log-only behaviour with `recovery`.
    pub fn set_recovery(&mut self, recovery: RecoverFn) {
        self.recovery = Some(recovery);
    }

    #[must_use]
    pub fn has_recovery(&self) -> bool {
        self.recovery.is_some()
    }

    /// Run `body`, containing any panic it raises.
    ///
    /// Returns `true` when a panic was intercepted. A panic from the recovery
    /// callback itself is contained and logged as well; nothing unwinds past
    /// this call. Events are tagged with `request_id`.
    pub fn guard<F: FnOnce()>(&self, req: &Request, request_id: &CorrelationId, body: F) -> bool {
        let Err(payload) = panic::catch_unwind(AssertUnwindSafe(body)) else {
            return false;
        };

        let info = PanicInfo {
            error: normalize_payload(payload),
            stack: stack_snapshot(),
            request: req.clone(),
            request_id: request_id.clone(),
        };

        error!(
            request_id = %request_id,
            error = %info.error,
            "recovered from panic"
        );

        if let Some(recovery) = &self.recovery {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| recovery(info))) {
                error!(
                    request_id = %request_id,
                    error = %normalize_payload(payload),
                    "recovery callback panicked"
                );
            }
        }

        true
    }
}

impl fmt::Debug for PanicGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanicGuard")
            .field("recovery", &self.recovery.is_some())
            .finish()
    }
}

macro_rules! wrap_errors {
    ($payload:ident, $($ty:ty),+) => {
        $(
            let $payload = match $payload.downcast::<$ty>() {
                Ok(err) => return anyhow::Error::new(*err),
                Err(other) => other,
            };
        )+
    };
}

macro_rules! stringify_scalars {
    ($payload:ident, $($ty:ty),+) => {
        $(
            if let Some(value) = $payload.downcast_ref::<$ty>() {
                return anyhow!("{}", value);
            }
        )+
    };
}

/// Convert a panic payload into an error value.
#[must_use]
pub fn normalize_payload(payload: Box<dyn Any + Send>) -> anyhow::Error {
    let payload = match payload.downcast::<anyhow::Error>() {
        Ok(err) => return *err,
        Err(other) => other,
    };
    let payload = match payload.downcast::<Box<dyn std::error::Error + Send + Sync>>() {
        Ok(err) => return anyhow!(*err),
        Err(other) => other,
    };
    wrap_errors!(
        payload,
        std::io::Error,
        std::fmt::Error,
        std::num::ParseIntError,
        std::num::ParseFloatError,
        std::str::Utf8Error,
        std::string::FromUtf8Error,
        serde_json::Error
    );
    let payload = match payload.downcast::<Box<dyn std::error::Error + Send>>() {
        Ok(err) => return anyhow::Error::msg(err.to_string()),
        Err(other) => other,
    };
    let payload = match payload.downcast::<String>() {
        Ok(msg) => return anyhow::Error::msg(*msg),
        Err(other) => other,
    };
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        return anyhow::Error::msg(*msg);
    }

    stringify_scalars!(
        payload, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool,
        char
    );

    anyhow!("panic with non-displayable payload")
}

fn stack_snapshot() -> Vec<u8> {
    let mut trace = Backtrace::force_capture().to_string();
    if trace.len() > STACK_SNAPSHOT_LIMIT {
        let mut end = STACK_SNAPSHOT_LIMIT;
        while !trace.is_char_boundary(end) {
            end -= 1;
        }
        trace.truncate(end);
    }
    trace.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct QuotaExceeded;

    impl fmt::Display for QuotaExceeded {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "quota exceeded")
        }
    }

    impl std::error::Error for QuotaExceeded {}

    #[test]
    fn test_normalize_str_and_string() {
        assert_eq!(normalize_payload(Box::new("boom")).to_string(), "boom");
        assert_eq!(
            normalize_payload(Box::new(String::from("bang"))).to_string(),
            "bang"
        );
    }

    #[test]
    fn test_normalize_structured_errors() {
        let err = normalize_payload(Box::new(anyhow::Error::new(QuotaExceeded)));
        assert!(err.downcast_ref::<QuotaExceeded>().is_some());

        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(QuotaExceeded);
        let err = normalize_payload(Box::new(boxed));
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_normalize_concrete_std_errors() {
        let err = normalize_payload(Box::new(io::Error::new(io::ErrorKind::Other, "disk full")));
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(
            err.downcast_ref::<io::Error>().map(io::Error::kind),
            Some(io::ErrorKind::Other)
        );

        let err = normalize_payload(Box::new(fmt::Error));
        assert!(err.downcast_ref::<fmt::Error>().is_some());

        let parse = "x1".parse::<u8>().unwrap_err();
        let expected = parse.to_string();
        assert_eq!(normalize_payload(Box::new(parse)).to_string(), expected);

        let json = serde_json::from_str::<u8>("nope").unwrap_err();
        let expected = json.to_string();
        assert_eq!(normalize_payload(Box::new(json)).to_string(), expected);
    }

    #[test]
    fn test_normalize_send_only_boxed_error() {
        let boxed: Box<dyn std::error::Error + Send> = Box::new(QuotaExceeded);
        assert_eq!(normalize_payload(Box::new(boxed)).to_string(), "quota exceeded");
    }

    #[test]
    fn test_normalize_other_values() {
        assert_eq!(normalize_payload(Box::new(42_i32)).to_string(), "42");
        assert_eq!(normalize_payload(Box::new(-7_i8)).to_string(), "-7");
        assert_eq!(normalize_payload(Box::new(255_u8)).to_string(), "255");
        assert_eq!(normalize_payload(Box::new(-300_i16)).to_string(), "-300");
        assert_eq!(normalize_payload(Box::new(65_535_u16)).to_string(), "65535");
        assert_eq!(normalize_payload(Box::new(-1_i128)).to_string(), "-1");
        assert_eq!(normalize_payload(Box::new(u128::MAX)).to_string(), u128::MAX.to_string());
        assert_eq!(normalize_payload(Box::new(1.5_f32)).to_string(), "1.5");
        assert_eq!(normalize_payload(Box::new(true)).to_string(), "true");
        assert_eq!(
            normalize_payload(Box::new(vec![1_u8, 2])).to_string(),
            "panic with non-displayable payload"
        );
    }

    #[test]
    fn test_guard_without_panic() {
        let guard = PanicGuard::new();
        let mut ran = false;
        let id = CorrelationId::generate();
        assert!(!guard.guard(&Request::new("GET"), &id, || ran = true));
        assert!(ran);
    }

    #[test]
    fn test_guard_contains_panic_and_calls_recovery() {
        let seen = Arc::new(Mutex::new(None));
        let captured = Arc::clone(&seen);

        let mut guard = PanicGuard::new();
        guard.set_recovery(Arc::new(move |info: PanicInfo| {
            *captured.lock().unwrap() = Some((
                info.error.to_string(),
                info.stack.len(),
                info.request.request_id().to_string(),
                info.request_id.to_string(),
            ));
        }));
        assert!(guard.has_recovery());

        let req = Request::new("GET").with_request_id("req-1");
        let id = CorrelationId::for_request(&req);
        assert!(guard.guard(&req, &id, || panic!("handler exploded")));

        let (msg, stack_len, gateway_id, correlation_id) = seen.lock().unwrap().take().unwrap();
        assert_eq!(msg, "handler exploded");
        assert!(stack_len > 0 && stack_len <= STACK_SNAPSHOT_LIMIT);
        assert_eq!(gateway_id, "req-1");
        assert_eq!(correlation_id, "req-1");
    }

    #[test]
    fn test_generated_correlation_id_reaches_recovery() {
        let seen = Arc::new(Mutex::new(None));
        let captured = Arc::clone(&seen);

        let mut guard = PanicGuard::new();
        guard.set_recovery(Arc::new(move |info: PanicInfo| {
            *captured.lock().unwrap() = Some(info.request_id);
        }));

        let req = Request::new("GET");
        let id = CorrelationId::for_request(&req);
        assert!(guard.guard(&req, &id, || panic!("no gateway id")));
        assert_eq!(seen.lock().unwrap().take(), Some(id));
    }

    #[test]
    fn test_panicking_recovery_is_contained() {
        let mut guard = PanicGuard::new();
        guard.set_recovery(Arc::new(|_info: PanicInfo| panic!("recovery failed too")));
        let id = CorrelationId::generate();
        assert!(guard.guard(&Request::new("GET"), &id, || panic!("first")));
    }

    #[test]
    fn test_stack_snapshot_is_bounded() {
        let snapshot = stack_snapshot();
        assert!(snapshot.len() <= STACK_SNAPSHOT_LIMIT);
        assert!(std::str::from_utf8(&snapshot).is_ok());
    }
}
