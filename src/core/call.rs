//! Bounded account service calls
//!
//! Every request to the account service goes through [`bounded_call`], which
//! applies the run's optional timeout and cancellation token to a single
//! future. The caller's unit of work completes only once that future has
//! resolved, timed out, or been cancelled.

use super::options::ExportOptions;
use crate::types::ExportError;
use std::future::Future;

/// Await `call`, giving up on timeout or cancellation
pub async fn bounded_call<T, F>(
    options: &ExportOptions,
    operation: &str,
    call: F,
) -> Result<T, ExportError>
where
    F: Future<Output = Result<T, ExportError>>,
{
    let timed = async {
        match options.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(ExportError::timeout(operation, limit.as_secs())),
            },
            None => call.await,
        }
    };

    tokio::select! {
        biased;
        _ = options.cancel.cancelled() => Err(ExportError::cancelled(operation)),
        result = timed => result,
    }
}
