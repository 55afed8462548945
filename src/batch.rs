//! Sequential batch processing with a fixed inter-item delay.
//!
//! Used by the image-bearing deck generators to space out calls to the
//! image endpoint. Exactly one item is in flight at a time, and the
//! fixed delay elapses after every item regardless of success or
//! failure, so the overall pace never exceeds one request per delay.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Process `items` one at a time through `process`, pausing for `delay`
/// after each item completes.
///
/// The output has exactly one entry per input, in input order. When an
/// item's processor fails, the failure is logged and the original item
/// takes that slot; the batch never aborts early.
pub async fn run_sequentially<T, E, F, Fut>(items: Vec<T>, delay: Duration, mut process: F) -> Vec<T>
where
    T: Clone,
    E: std::fmt::Display,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut results = Vec::with_capacity(items.len());

    for item in items {
        let original = item.clone();
        match process(item).await {
            Ok(processed) => results.push(processed),
            Err(e) => {
                log::error!("batch item processing failed, keeping original: {}", e);
                results.push(original);
            }
        }
        sleep(delay).await;
    }

    results
}
