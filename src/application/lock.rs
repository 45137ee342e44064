use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Lock the collection state, recovering the guard if a previous holder
/// panicked mid-update.
pub(crate) fn state_lock<'a, T>(lock: &'a Mutex<T>, op: &'static str) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                op,
                lock_kind = "mutex.lock",
                result = "poisoned_recovered",
                hint = "collection may be stale after a panic in another task",
                "Recovered from poisoned collection lock"
            );
            poisoned.into_inner()
        }
    }
}
