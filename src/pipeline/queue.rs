//! Bounded-concurrency work queue.
//!
//! Every submitted path runs as its own task, gated by a semaphore with
//! `limit` permits. The queue is drained when [`WorkQueue::run`] returns:
//! at that point every task has finished, successfully or not.

use std::future::Future;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::{FileOutcome, Outcome, ProcessError};
use crate::log;

#[derive(Debug, Clone, Copy)]
pub struct WorkQueue {
    limit: NonZeroUsize,
}

impl WorkQueue {
    pub const fn new(limit: NonZeroUsize) -> Self {
        Self { limit }
    }

    /// Run `task` over `items` with at most `limit` in flight.
    ///
    /// `on_done` is called once per item as it completes, in completion
    /// order. A panicking task is reported as a failure of its item.
    pub async fn run<F, Fut>(
        &self,
        items: Vec<PathBuf>,
        task: F,
        mut on_done: impl FnMut(&FileOutcome),
    ) -> Vec<FileOutcome>
    where
        F: Fn(PathBuf) -> Fut,
        Fut: Future<Output = Result<Outcome, ProcessError>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.limit.get()));
        let mut set = JoinSet::new();
        let mut outcomes = Vec::with_capacity(items.len());

        for path in items {
            // Waiting here keeps at most `limit` tasks spawned and running.
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    let outcome = FileOutcome::new(
                        path.clone(),
                        Err(ProcessError::Join {
                            path,
                            message: e.to_string(),
                        }),
                    );
                    on_done(&outcome);
                    outcomes.push(outcome);
                    continue;
                }
            };
            let fut = task(path.clone());
            set.spawn(async move {
                let result = match tokio::spawn(fut).await {
                    Ok(result) => result,
                    Err(e) => Err(ProcessError::Join {
                        path: path.clone(),
                        message: e.to_string(),
                    }),
                };
                drop(permit);
                FileOutcome::new(path, result)
            });

            // Collect whatever already finished so progress stays live.
            while let Some(joined) = set.try_join_next() {
                collect(joined, &mut outcomes, &mut on_done);
            }
        }

        while let Some(joined) = set.join_next().await {
            collect(joined, &mut outcomes, &mut on_done);
        }

        outcomes
    }
}

fn collect(
    joined: Result<FileOutcome, tokio::task::JoinError>,
    outcomes: &mut Vec<FileOutcome>,
    on_done: &mut impl FnMut(&FileOutcome),
) {
    match joined {
        Ok(outcome) => {
            on_done(&outcome);
            outcomes.push(outcome);
        }
        // The wrapper task only awaits and moves values; it cannot panic.
        Err(e) => log!("error"; "work queue task lost: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("{i}.js"))).collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_bound() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let queue = WorkQueue::new(NonZeroUsize::new(2).unwrap());

        let outcomes = queue
            .run(
                paths(5),
                |_| {
                    let in_flight = Arc::clone(&in_flight);
                    let peak = Arc::clone(&peak);
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(30)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Ok(Outcome::Minified)
                    }
                },
                |_| {},
            )
            .await;

        assert_eq!(outcomes.len(), 5);
        assert_eq!(peak.load(Ordering::SeqCst), 2);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_queue() {
        let queue = WorkQueue::new(NonZeroUsize::new(3).unwrap());
        let mut seen = 0;

        let outcomes = queue
            .run(
                paths(4),
                |path| async move {
                    if path == PathBuf::from("1.js") {
                        Err(ProcessError::NoMatch(path))
                    } else {
                        Ok(Outcome::Minified)
                    }
                },
                |_| seen += 1,
            )
            .await;

        assert_eq!(seen, 4);
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes.iter().filter(|o| o.is_failure()).count(), 1);
    }

    #[tokio::test]
    async fn test_panic_reported_as_failure() {
        let queue = WorkQueue::new(NonZeroUsize::new(1).unwrap());

        let outcomes = queue
            .run(
                paths(2),
                |path| async move {
                    if path == PathBuf::from("0.js") {
                        panic!("boom");
                    }
                    Ok(Outcome::Minified)
                },
                |_| {},
            )
            .await;

        assert_eq!(outcomes.len(), 2);
        let failed = outcomes.iter().find(|o| o.is_failure()).unwrap();
        assert_eq!(failed.path, PathBuf::from("0.js"));
        assert!(matches!(failed.result, Err(ProcessError::Join { .. })));
    }

    #[tokio::test]
    async fn test_empty_queue_drains() {
        let queue = WorkQueue::new(NonZeroUsize::new(3).unwrap());
        let outcomes = queue
            .run(Vec::new(), |_| async { Ok(Outcome::Minified) }, |_| {})
            .await;
        assert!(outcomes.is_empty());
    }
}
