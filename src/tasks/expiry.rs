//! Expiry Timers
//!
//! One-shot background tasks that delete a single key once its TTL elapses.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
#[cfg(test)]
use tokio::task::AbortHandle;
use tracing::trace;

// == Expiry Timer ==
/// Handle to a pending per-key expiry task.
///
/// The `id` is unique per cache, so a task that fires after being replaced
/// can tell it is stale.
#[derive(Debug)]
pub struct ExpiryTimer {
    pub id: u64,
    handle: JoinHandle<()>,
}

impl ExpiryTimer {
    // == Cancel ==
    /// Aborts the task. A no-op if it has already fired.
    pub fn cancel(self) {
        trace!("Cancelling expiry timer {}", self.id);
        self.handle.abort();
    }

    /// Returns a handle that observes the task without owning it.
    #[cfg(test)]
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }
}

/// Spawns a task on `runtime` that sleeps for `delay` and then runs `on_fire`.
///
/// The task is fire-and-forget: nothing awaits it, and `on_fire` runs on the
/// runtime rather than inside the caller.
///
/// # Example
/// ```ignore
/// let timer = spawn_expiry_timer(&Handle::current(), 1, Duration::from_secs(5), move || {
///     state.lock().fire_expiry(&key, 1);
/// });
/// // Later, if the key is deleted first:
/// timer.cancel();
/// ```
pub fn spawn_expiry_timer<F>(runtime: &Handle, id: u64, delay: Duration, on_fire: F) -> ExpiryTimer
where
    F: FnOnce() + Send + 'static,
{
    trace!("Scheduling expiry timer {} in {:?}", id, delay);

    let handle = runtime.spawn(async move {
        tokio::time::sleep(delay).await;
        on_fire();
    });

    ExpiryTimer { id, handle }
}
