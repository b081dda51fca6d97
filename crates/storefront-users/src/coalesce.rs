//! Single-flight guard for backend fetches.
//!
//! Concurrent callers asking for the same key share one in-flight future
//! instead of each issuing their own request. Every waiter receives a clone of
//! the same output, success or failure.

use std::collections::HashMap;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

type Pending<T> = Shared<BoxFuture<'static, T>>;

pub struct FetchCoalescer<T: Clone> {
    inflight: Mutex<HashMap<String, Pending<T>>>,
}

impl<T> FetchCoalescer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Await the in-flight future for `key`, starting it with `start` if there is none.
    ///
    /// The entry is removed once the future completes, so the next call after
    /// completion starts a fresh fetch. A finished entry left behind by a
    /// cancelled waiter is treated as absent.
    pub async fn run<F>(&self, key: &str, start: F) -> T
    where
        F: FnOnce() -> BoxFuture<'static, T>,
    {
        let pending = {
            let mut inflight = self.inflight.lock().await;
            match inflight.get(key) {
                Some(pending) if pending.peek().is_none() => {
                    tracing::debug!(key, "joining in-flight fetch");
                    pending.clone()
                }
                _ => {
                    let pending = start().shared();
                    inflight.insert(key.to_string(), pending.clone());
                    pending
                }
            }
        };

        let output = pending.clone().await;

        // Only evict our own fetch; a newer one may already sit under this key.
        let mut inflight = self.inflight.lock().await;
        if inflight
            .get(key)
            .is_some_and(|current| current.ptr_eq(&pending))
        {
            inflight.remove(key);
        }
        output
    }

    /// Forget every in-flight fetch. Current waiters still get their result;
    /// later callers start new fetches.
    pub async fn forget_all(&self) {
        self.inflight.lock().await.clear();
    }

    /// Number of keys with a fetch in flight.
    #[cfg(test)]
    pub async fn in_flight(&self) -> usize {
        self.inflight.lock().await.len()
    }
}

impl<T> Default for FetchCoalescer<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn counted(calls: &Arc<AtomicUsize>, value: u32) -> BoxFuture<'static, u32> {
        let calls = Arc::clone(calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            value
        }
        .boxed()
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_one_future() {
        let coalescer = FetchCoalescer::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b, c) = tokio::join!(
            coalescer.run("u1", || counted(&calls, 7)),
            coalescer.run("u1", || counted(&calls, 8)),
            coalescer.run("u1", || counted(&calls, 9)),
        );

        assert_eq!((a, b, c), (7, 7, 7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coalescer.in_flight().await, 0);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_coalesce() {
        let coalescer = FetchCoalescer::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            coalescer.run("u1", || counted(&calls, 1)),
            coalescer.run("u2", || counted(&calls, 2)),
        );

        assert_eq!((a, b), (1, 2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sequential_calls_start_fresh() {
        let coalescer = FetchCoalescer::new();
        let calls = Arc::new(AtomicUsize::new(0));

        assert_eq!(coalescer.run("u1", || counted(&calls, 1)).await, 1);
        assert_eq!(coalescer.run("u1", || counted(&calls, 2)).await, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_forget_all_starts_new_fetch_for_late_callers() {
        let coalescer = Arc::new(FetchCoalescer::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let early = {
            let coalescer = Arc::clone(&coalescer);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move { coalescer.run("u1", || counted(&calls, 1)).await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(coalescer.in_flight().await, 1);

        coalescer.forget_all().await;
        let late = coalescer.run("u1", || counted(&calls, 2)).await;

        assert_eq!(early.await.unwrap(), 1);
        assert_eq!(late, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(coalescer.in_flight().await, 0);
    }

    #[tokio::test]
    async fn test_finished_fetch_left_by_cancelled_waiter_is_not_reused() {
        let coalescer: Arc<FetchCoalescer<Result<u32, String>>> = Arc::new(FetchCoalescer::new());
        let (release, gate) = tokio::sync::oneshot::channel::<()>();

        let waiter = {
            let coalescer = Arc::clone(&coalescer);
            tokio::spawn(async move {
                coalescer
                    .run("u1", || {
                        async move {
                            let _ = gate.await;
                            Err("backend 503".to_string())
                        }
                        .boxed()
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(coalescer.in_flight().await, 1);

        // Let the fetch finish while the waiter cannot reach eviction, then cancel it.
        let guard = coalescer.inflight.lock().await;
        release.send(()).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        waiter.abort();
        assert!(waiter.await.unwrap_err().is_cancelled());
        drop(guard);

        let retried = coalescer.run("u1", || async { Ok(42) }.boxed()).await;
        assert_eq!(retried, Ok(42));
        assert_eq!(coalescer.in_flight().await, 0);
    }
}
