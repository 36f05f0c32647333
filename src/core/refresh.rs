use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// Identity of one refresh batch. Later batches carry larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BatchToken(u64);

impl BatchToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Result of a completed batch.
#[derive(Debug, Clone)]
pub struct Snapshot<V> {
    pub batch: BatchToken,
    pub fetched_at: DateTime<Utc>,
    pub data: V,
}

/// Holds the newest published result for one kind of refresh.
///
/// Every refresh takes a token from [`RefreshSlot::begin`] before fanning
/// out and hands it back with its result. Results from a batch that has
/// been superseded by a newer `begin` are dropped, so a slow old batch can
/// never overwrite a newer one.
#[derive(Clone)]
pub struct RefreshSlot<V>
where
    V: Clone + Send + Sync,
{
    issued: Arc<AtomicU64>,
    inner: Arc<Mutex<Option<Snapshot<V>>>>,
}

impl<V> RefreshSlot<V>
where
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            issued: Arc::new(AtomicU64::new(0)),
            inner: Arc::new(Mutex::new(None)),
        }
    }

    pub fn begin(&self) -> BatchToken {
        let token = BatchToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1);
        debug!(batch = token.0, "Batch started");
        token
    }

    pub fn is_current(&self, token: BatchToken) -> bool {
        self.issued.load(Ordering::SeqCst) == token.0
    }

    /// Publishes `data` if `token` is still the newest batch.
    pub async fn commit(&self, token: BatchToken, data: V) -> Option<Snapshot<V>> {
        let mut slot = self.inner.lock().await;
        let newer_published = slot.as_ref().is_some_and(|s| s.batch >= token);
        if !self.is_current(token) || newer_published {
            debug!(batch = token.0, "Discarding superseded batch");
            return None;
        }

        let snapshot = Snapshot {
            batch: token,
            fetched_at: Utc::now(),
            data,
        };
        debug!(batch = token.0, "Batch published");
        *slot = Some(snapshot.clone());
        Some(snapshot)
    }

    pub async fn latest(&self) -> Option<Snapshot<V>> {
        self.inner.lock().await.clone()
    }
}

impl<V> Default for RefreshSlot<V>
where
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}
