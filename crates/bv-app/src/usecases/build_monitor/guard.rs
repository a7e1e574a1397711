//! Handler boundary.
//!
//! Every engine callback runs inside [`absorb`]: faults are logged and
//! swallowed so they never reach the event source.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum HandlerFault {
    #[error("handler {handler} failed: {source:#}")]
    Failed {
        handler: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("handler {handler} panicked: {message}")]
    Panicked {
        handler: &'static str,
        message: String,
    },
}

/// Run `body`, logging and discarding any error or panic.
///
/// Returns the fault so callers and tests can inspect it; the coordinator
/// ignores it.
pub fn absorb<F>(handler: &'static str, body: F) -> Option<HandlerFault>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    let fault = match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => return None,
        Ok(Err(source)) => HandlerFault::Failed { handler, source },
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            HandlerFault::Panicked { handler, message }
        }
    };
    error!(handler, error = %fault, "build event handler fault absorbed");
    Some(fault)
}
