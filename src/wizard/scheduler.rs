use std::time::Duration;
use tokio::task::JoinHandle;

/// Single cancellable timer that closes the wizard after a successful submission.
///
/// Scheduling replaces any pending timer, so at most one is ever armed.
/// Dropping the scheduler aborts the pending timer.
#[derive(Debug, Default)]
pub struct AutoCloseScheduler {
    pending: Option<JoinHandle<()>>,
}

impl AutoCloseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer. Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Auto-close scheduled");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire();
        }));
    }

    /// Abort the pending timer. Returns whether one was still armed.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let armed = !handle.is_finished();
                handle.abort();
                if armed {
                    tracing::debug!("Auto-close cancelled");
                }
                armed
            }
            None => false,
        }
    }

    /// Forget the timer without aborting it; used by the timer's own callback.
    pub fn disarm(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for AutoCloseScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
