//! Per-session stream exclusion (spec §4.8 step 1): "assert no other
//! stream is active on this session (else reject with `SessionBusy`)".
//!
//! Unlike [`relay_compaction`]'s per-session lock, which blocks a caller
//! until the prior compaction finishes, this one never waits: a second
//! `triggerStream` on a busy session is rejected immediately.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;

use crate::error::Result;
use crate::error::streaming_error::SessionBusySnafu;

#[derive(Default)]
pub struct StreamLocks {
    active: Mutex<HashSet<String>>,
}

impl StreamLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `session_id`'s slot, or rejects with `SessionBusy` if another
    /// turn already holds it. The returned guard releases the slot on drop
    /// so a cancelled or panicked turn never wedges the session; it owns an
    /// `Arc` handle so it can be moved into a spawned turn task.
    pub fn try_acquire(self: &Arc<Self>, session_id: &str) -> Result<StreamGuard> {
        let mut active = self.active.lock().expect("stream lock set poisoned");
        if !active.insert(session_id.to_string()) {
            return Err(SessionBusySnafu { session_id: session_id.to_string() }.build());
        }
        Ok(StreamGuard { locks: Arc::clone(self), session_id: session_id.to_string() })
    }
}

pub struct StreamGuard {
    locks: Arc<StreamLocks>,
    session_id: String,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.locks.active.lock().expect("stream lock set poisoned").remove(&self.session_id);
    }
}

#[cfg(test)]
#[path = "locks.test.rs"]
mod tests;
