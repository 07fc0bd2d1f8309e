//! Tokio-backed reconnect timers.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::core::{ScheduledTask, Scheduler};

/// Runs each task on the given runtime after its delay.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }
}

struct TokioTimer(AbortHandle);

impl ScheduledTask for TokioTimer {
    fn cancel(&self) {
        self.0.abort();
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> Box<dyn ScheduledTask> {
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        Box::new(TokioTimer(handle.abort_handle()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let scheduler = TokioScheduler::new(Handle::current());
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let _timer = scheduler.schedule(
            Duration::from_secs(3),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert!(!fired.load(Ordering::SeqCst));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let scheduler = TokioScheduler::new(Handle::current());
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let timer = scheduler.schedule(
            Duration::from_secs(3),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );
        timer.cancel();
        timer.cancel();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
