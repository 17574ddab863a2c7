//! In-process task orchestrator
//!
//! Tasks live in a `DashMap` and run on the tokio runtime. Every state
//! change is pushed to the task's subscribers; callbacks run after the map
//! guard is released.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use super::orchestrator::{Subscription, TaskCallback, TaskOrchestrator};
use super::runner::{ProgressSink, ScriptedRunner, TaskRunner};
use super::types::{DEFAULT_TASK_KIND, NewTask, Task, TaskEvent, TaskStatus};
use crate::errors::{AdscopeError, Result};

struct Inner {
    tasks: DashMap<String, Task>,
    subscribers: DashMap<String, Vec<(u64, TaskCallback)>>,
    next_subscriber: AtomicU64,
    runner: Arc<dyn TaskRunner>,
    retention: Duration,
}

impl Inner {
    /// Apply `f` to a task, stamp it, and notify subscribers
    fn update(&self, task_id: &str, f: impl FnOnce(&mut Task)) -> Option<TaskEvent> {
        let event = {
            let mut entry = self.tasks.get_mut(task_id)?;
            f(&mut *entry);
            entry.updated_at = Utc::now();
            TaskEvent::from_task(&entry)
        };
        self.publish(&event);
        Some(event)
    }

    fn publish(&self, event: &TaskEvent) {
        let callbacks: Vec<TaskCallback> = match self.subscribers.get(&event.task_id) {
            Some(subs) => subs.iter().map(|(_, cb)| cb.clone()).collect(),
            None => return,
        };
        for callback in callbacks {
            callback(event.clone());
        }
    }

    fn unsubscribe(&self, task_id: &str, subscriber_id: u64) {
        let now_empty = match self.subscribers.get_mut(task_id) {
            Some(mut subs) => {
                subs.retain(|(id, _)| *id != subscriber_id);
                subs.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.subscribers
                .remove_if(task_id, |_, subs| subs.is_empty());
        }
        debug!("Subscriber {} left task {}", subscriber_id, task_id);
    }

    fn evict(&self, task_id: &str) {
        self.tasks.remove(task_id);
        self.subscribers.remove(task_id);
        debug!("Evicted finished task {}", task_id);
    }
}

struct Reporter {
    inner: Arc<Inner>,
    task_id: String,
}

impl ProgressSink for Reporter {
    fn report(&self, progress: u8, message: &str) {
        self.inner.update(&self.task_id, |task| {
            // 进度只增不减，终态前不超过 99
            task.progress = progress.min(99).max(task.progress);
            task.message = message.to_string();
        });
    }
}

pub struct LocalOrchestrator {
    inner: Arc<Inner>,
}

impl LocalOrchestrator {
    pub fn new(runner: Arc<dyn TaskRunner>, retention: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                tasks: DashMap::new(),
                subscribers: DashMap::new(),
                next_subscriber: AtomicU64::new(1),
                runner,
                retention,
            }),
        }
    }

    /// Scripted runner and retention taken from `[agent]`
    pub fn from_config() -> Self {
        let config = crate::config::get_config();
        Self::new(
            Arc::new(ScriptedRunner::from_config()),
            Duration::from_secs(config.agent.retention_secs),
        )
    }

    async fn execute(inner: Arc<Inner>, task_id: String) {
        let Some(snapshot) = inner.update(&task_id, |task| {
            task.status = TaskStatus::Running;
            task.message = "running".to_string();
        }) else {
            return;
        };
        debug!("Task {} started", snapshot.task_id);

        let task = match inner.tasks.get(&task_id) {
            Some(task) => task.clone(),
            None => return,
        };
        let reporter = Reporter {
            inner: inner.clone(),
            task_id: task_id.clone(),
        };

        let outcome = inner.runner.run(&task, &reporter).await;

        match outcome {
            Ok(result) => {
                inner.update(&task_id, |task| {
                    task.status = TaskStatus::Done;
                    task.progress = 100;
                    task.message = "done".to_string();
                    task.result = Some(result);
                });
                info!("Task {} done", task_id);
            }
            Err(e) => {
                warn!("Task {} failed: {}", task_id, e);
                inner.update(&task_id, |task| {
                    task.status = TaskStatus::Failed;
                    task.message = "failed".to_string();
                    task.error = Some(e.message().to_string());
                });
            }
        }

        // 保留一段时间供查询，之后清理
        let weak: Weak<Inner> = Arc::downgrade(&inner);
        let retention = inner.retention;
        drop(reporter);
        drop(inner);
        tokio::time::sleep(retention).await;
        if let Some(inner) = weak.upgrade() {
            inner.evict(&task_id);
        }
    }
}

#[async_trait]
impl TaskOrchestrator for LocalOrchestrator {
    async fn get_task(&self, task_id: &str) -> Option<Task> {
        self.inner.tasks.get(task_id).map(|t| t.clone())
    }

    fn subscribe(&self, task_id: &str, callback: TaskCallback) -> Subscription {
        let subscriber_id = self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .entry(task_id.to_string())
            .or_default()
            .push((subscriber_id, callback));

        let weak = Arc::downgrade(&self.inner);
        let task_id = task_id.to_string();
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.unsubscribe(&task_id, subscriber_id);
            }
        })
    }

    async fn submit(&self, new_task: NewTask) -> Result<Task> {
        let prompt = new_task.prompt.trim();
        if prompt.is_empty() {
            return Err(AdscopeError::validation("prompt is required"));
        }
        let kind = new_task
            .kind
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(DEFAULT_TASK_KIND)
            .to_string();

        let now = Utc::now();
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            prompt: prompt.to_string(),
            status: TaskStatus::Queued,
            progress: 0,
            message: "queued".to_string(),
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        };
        self.inner.tasks.insert(task.id.clone(), task.clone());
        info!("Task {} queued ({})", task.id, task.kind);

        tokio::spawn(Self::execute(self.inner.clone(), task.id.clone()));
        Ok(task)
    }

    fn task_count(&self) -> usize {
        self.inner.tasks.len()
    }
}
