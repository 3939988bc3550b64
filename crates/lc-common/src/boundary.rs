//! Error boundary around user-supplied code.
//!
//! User code may fail by returning an error or by panicking. Either way the
//! failure is re-signaled as a typed error chosen by the caller, carrying a
//! diagnostic message that is only built when something went wrong. The
//! boundary never suppresses a failure.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::error;

/// Boxed error type returned by user code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A panic raised inside user code.
#[derive(Error, Debug)]
#[error("user code panicked: {0}")]
pub struct PanicError(pub String);

/// A failure caught at a user-code boundary.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct UserCodeError {
    /// Diagnostic message supplied by the boundary's owner.
    pub message: String,
    /// The error raised by user code.
    #[source]
    pub source: BoxError,
    /// Whether user code panicked rather than returning an error.
    pub panicked: bool,
}

/// Run `f`, re-signaling any error or panic as `E`.
///
/// The error kind is the target type `E`; `message` is evaluated lazily,
/// only on failure.
pub fn user_code_error_boundary<T, E, M, F>(message: M, f: F) -> Result<T, E>
where
    M: FnOnce() -> String,
    F: FnOnce() -> Result<T, BoxError>,
    E: From<UserCodeError>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    let (source, panicked) = match outcome {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(source)) => (source, false),
        Err(payload) => (
            Box::new(PanicError(panic_message(payload.as_ref()))) as BoxError,
            true,
        ),
    };

    let message = message();
    error!(error = %source, panicked, "{}", message);
    Err(E::from(UserCodeError {
        message,
        source,
        panicked,
    }))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
