use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

type Action = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Collapses bursts of triggers into one call of `action`, fired once
/// `delay` has passed without another trigger. Must be triggered from
/// inside a Tokio runtime.
pub struct Debouncer {
    delay: Duration,
    action: Action,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            delay,
            action: Arc::new(move || Box::pin(action())),
            pending: Mutex::new(None),
        }
    }

    pub fn trigger(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }

        let action = self.action.clone();
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so a later trigger only ever cancels the timer.
            tokio::spawn(action());
        }));
    }

    /// Drops a pending trigger, if any.
    pub fn cancel(&self) {
        if let Some(timer) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            timer.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
