use std::sync::Arc;

use async_trait::async_trait;

use super::types::{NewTask, Task, TaskEvent};
use crate::errors::Result;

/// Receives every event published for a subscribed task
pub type TaskCallback = Arc<dyn Fn(TaskEvent) + Send + Sync>;

/// Boundary between the HTTP layer and whatever schedules agent tasks
#[async_trait]
pub trait TaskOrchestrator: Send + Sync {
    async fn get_task(&self, task_id: &str) -> Option<Task>;

    /// Deliver subsequent events for `task_id` until the returned guard is dropped
    fn subscribe(&self, task_id: &str, callback: TaskCallback) -> Subscription;

    /// Register a task and schedule it
    async fn submit(&self, task: NewTask) -> Result<Task>;

    /// Tasks currently retained
    fn task_count(&self) -> usize;
}

/// Unsubscribes when dropped
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to release
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_cancel_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let sub = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        sub.cancel();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_releases() {
        let calls = Arc::new(AtomicUsize::new(0));
        {
            let counter = calls.clone();
            let _sub = Subscription::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        drop(Subscription::noop());
    }
}
