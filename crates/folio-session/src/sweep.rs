//! Background expiration sweep
//!
//! The task holds only a weak reference to the manager state and is aborted
//! when its owning `SweepTask` drops, so it never outlives the manager.

use std::sync::Weak;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::manager::Inner;

pub(crate) struct SweepTask {
    handle: JoinHandle<()>,
}

impl SweepTask {
    pub(crate) fn spawn(runtime: &Handle, inner: Weak<Inner>, period: Duration) -> Self {
        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately; construction already checked storage
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let Some(state) = inner.upgrade() else {
                    break;
                };
                tracing::debug!(session_key = %state.session_key(), "Sweeping for expired session");
                state.sweep_expired();
            }
        });

        Self { handle }
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
