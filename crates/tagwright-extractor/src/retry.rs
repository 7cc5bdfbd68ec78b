//! Retry-once combinator

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Run `op`, and if it fails, wait `delay` and run it exactly once more
///
/// The second attempt's result is returned as-is.
pub async fn retry_once<T, E, F, Fut>(delay: Duration, label: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!("{} failed, retrying in {:?}: {}", label, delay, e);
            tokio::time::sleep(delay).await;
            op().await
        }
    }
}
