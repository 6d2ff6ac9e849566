//! Bounded-concurrency fan-out
//!
//! Every batch of external calls (triage votes, candidate generation,
//! pairwise judgments) goes through [`fan_out`]: at most `limit` calls are in
//! flight, the whole batch is awaited before returning, and each item gets
//! its own `Result` so one failing call never voids the batch.

use crate::ports::collaborator::CollaboratorError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

/// Run `f` over `items` with at most `limit` concurrent tasks.
///
/// Results are returned in input order. A task that panics or is aborted
/// yields [`CollaboratorError::Aborted`] for its slot.
pub async fn fan_out<I, T, F, Fut>(
    items: Vec<I>,
    limit: usize,
    f: F,
) -> Vec<Result<T, CollaboratorError>>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, CollaboratorError>> + Send + 'static,
{
    let count = items.len();
    let mut results: Vec<Result<T, CollaboratorError>> = (0..count)
        .map(|_| Err(CollaboratorError::Aborted("task did not complete".to_string())))
        .collect();
    if count == 0 {
        return results;
    }

    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut join_set = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let future = f(item);
        join_set.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => future.await,
                Err(e) => Err(CollaboratorError::Aborted(e.to_string())),
            };
            (index, result)
        });
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, result)) => {
                if let Some(slot) = results.get_mut(index) {
                    *slot = result;
                }
            }
            Err(e) => {
                warn!("Fan-out task join error: {}", e);
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_in_input_order() {
        let results = fan_out(vec![30u64, 10, 20], 3, |delay| async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok::<_, CollaboratorError>(delay)
        })
        .await;

        let values: Vec<u64> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_items() {
        let results = fan_out(vec![1, 2, 3, 4], 2, |n| async move {
            if n % 2 == 0 {
                Err(CollaboratorError::RequestFailed(format!("item {n}")))
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(results.len(), 4);
        assert_eq!(results[0], Ok(1));
        assert!(results[1].is_err());
        assert_eq!(results[2], Ok(3));
        assert!(results[3].is_err());
    }

    #[tokio::test]
    async fn test_panicking_task_becomes_aborted() {
        let results = fan_out(vec![0, 1], 2, |n| async move {
            if n == 1 {
                panic!("boom");
            }
            Ok::<_, CollaboratorError>(n)
        })
        .await;

        assert_eq!(results[0], Ok(0));
        assert!(matches!(results[1], Err(CollaboratorError::Aborted(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_is_bounded() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = fan_out((0..10).collect(), 3, |n: usize| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, CollaboratorError>(n)
            }
        })
        .await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let results = fan_out(Vec::<u8>::new(), 4, |n| async move {
            Ok::<_, CollaboratorError>(n)
        })
        .await;
        assert!(results.is_empty());
    }
}
