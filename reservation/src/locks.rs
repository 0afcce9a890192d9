use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use abi::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-room mutual exclusion. Attempts on different rooms never contend;
/// attempts on the same room serialize around the read-check-write sequence.
///
/// Locks are created lazily and kept for the life of the manager; the map is
/// bounded by the number of distinct rooms ever booked through it.
#[derive(Debug, Default)]
pub(crate) struct RoomLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a room, waiting at most `timeout`. Expiry
    /// surfaces `LockTimeout` rather than blocking indefinitely.
    pub async fn acquire(
        &self,
        room_id: &str,
        timeout: Duration,
    ) -> Result<OwnedMutexGuard<()>, Error> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(room_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        tokio::time::timeout(timeout, lock.lock_owned())
            .await
            .map_err(|_| Error::LockTimeout)
    }
}
