//! Running provider calls off the async runtime

use std::any::Any;
use std::time::Duration;
use tokio::task::JoinError;

/// Why a blocking call produced no value
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BlockingFailure {
    /// The deadline passed; the thread keeps running until the call returns
    TimedOut(Duration),
    /// The closure panicked
    Panicked(String),
}

/// Run `f` on the blocking pool, optionally bounded by `deadline`
pub(crate) async fn run_blocking<F, T>(f: F, deadline: Option<Duration>) -> Result<T, BlockingFailure>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::task::spawn_blocking(f);

    let joined = match deadline {
        Some(limit) => match tokio::time::timeout(limit, handle).await {
            Ok(joined) => joined,
            Err(_) => return Err(BlockingFailure::TimedOut(limit)),
        },
        None => handle.await,
    };

    joined.map_err(|e| BlockingFailure::Panicked(join_error_message(e)))
}

fn join_error_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    panic_message(&*err.into_panic())
}

/// Text of a panic payload, when it carries one
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
