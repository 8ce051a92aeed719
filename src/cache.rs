//! Read-through memo with single-flight semantics.
//!
//! Each key maps to a [`Shared`] future. Callers that ask for a key while its
//! producer is still running await the same future, so at most one producer
//! runs per key at a time. Completed values are served until they are older
//! than the TTL, after which the next caller starts a fresh producer.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a completed article stays cached.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

struct Slot<V> {
    fut: Shared<BoxFuture<'static, V>>,
    created: Instant,
}

impl<V: Clone> Slot<V> {
    /// In-flight slots are always joined; completed ones only while young.
    fn is_live(&self, ttl: Duration) -> bool {
        self.fut.peek().is_none() || self.created.elapsed() < ttl
    }
}

/// Keyed memo shared by all concurrent article fetches of one process.
pub struct Memo<V: Clone> {
    slots: Mutex<HashMap<String, Slot<V>>>,
    ttl: Duration,
}

impl<V> Memo<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Return the value for `key`, running `producer` only when no live entry exists.
    ///
    /// Starting a producer also drops every expired slot. The lock is released
    /// before awaiting, so a slow producer never blocks lookups for other keys.
    pub async fn get_or_insert_with<F, Fut>(&self, key: &str, producer: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let fut = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            match slots.get(key) {
                Some(slot) if slot.is_live(self.ttl) => {
                    debug!(key, "Joining cached entry");
                    slot.fut.clone()
                }
                _ => {
                    let ttl = self.ttl;
                    slots.retain(|_, slot| slot.is_live(ttl));
                    let fut = producer().boxed().shared();
                    slots.insert(
                        key.to_string(),
                        Slot {
                            fut: fut.clone(),
                            created: Instant::now(),
                        },
                    );
                    fut
                }
            }
        };
        fut.await
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for Memo<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_producer(
        calls: &Arc<AtomicUsize>,
        value: &'static str,
    ) -> impl FnOnce() -> BoxFuture<'static, String> {
        let calls = Arc::clone(calls);
        move || {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                value.to_string()
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_producer() {
        let memo: Memo<String> = Memo::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let lookups = (0..5).map(|_| memo.get_or_insert_with("k", counting_producer(&calls, "v")));
        let values = futures::future::join_all(lookups).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(values.iter().all(|v| v == "v"));
        assert_eq!(memo.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_run_separately() {
        let memo: Memo<String> = Memo::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            memo.get_or_insert_with("a", counting_producer(&calls, "A")),
            memo.get_or_insert_with("b", counting_producer(&calls, "B")),
        );

        assert_eq!((a.as_str(), b.as_str()), ("A", "B"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_completed_value_is_reused() {
        let memo: Memo<String> = Memo::default();
        let calls = Arc::new(AtomicUsize::new(0));

        memo.get_or_insert_with("k", counting_producer(&calls, "first"))
            .await;
        let second = memo
            .get_or_insert_with("k", counting_producer(&calls, "second"))
            .await;

        assert_eq!(second, "first");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_value_is_recomputed() {
        let memo: Memo<String> = Memo::new(Duration::ZERO);
        let calls = Arc::new(AtomicUsize::new(0));

        memo.get_or_insert_with("k", counting_producer(&calls, "first"))
            .await;
        let second = memo
            .get_or_insert_with("k", counting_producer(&calls, "second"))
            .await;

        assert_eq!(second, "second");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_slots_are_evicted_on_insert() {
        let memo: Memo<String> = Memo::new(Duration::ZERO);
        let calls = Arc::new(AtomicUsize::new(0));
        assert!(memo.is_empty());

        memo.get_or_insert_with("a", counting_producer(&calls, "A"))
            .await;
        memo.get_or_insert_with("b", counting_producer(&calls, "B"))
            .await;

        assert_eq!(memo.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
