//! Server-Sent Events relay for agent tasks
//!
//! 第一帧是任务快照 (`event: task`)，之后每次状态变化推送 `event: update`，
//! 空闲时发送 `: keep-alive` 注释帧。观察到终态后延迟 `close_delay` 关闭。

use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, stream};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at, sleep_until};
use tracing::debug;

use crate::agent::{Subscription, Task, TaskEvent};

pub const KEEP_ALIVE_FRAME: &[u8] = b": keep-alive\n\n";

/// SSE 推送参数
#[derive(Debug, Clone, Copy)]
pub struct SseSettings {
    pub keepalive: Duration,
    pub close_delay: Duration,
    /// 每个连接的缓冲事件数，满了就丢弃
    pub channel_capacity: usize,
}

impl Default for SseSettings {
    fn default() -> Self {
        Self {
            keepalive: Duration::from_secs(15),
            close_delay: Duration::from_millis(1000),
            channel_capacity: 64,
        }
    }
}

impl SseSettings {
    pub fn from_config() -> Self {
        let config = crate::config::get_config();
        Self {
            keepalive: Duration::from_secs(config.agent.keepalive_secs.max(1)),
            close_delay: Duration::from_millis(config.agent.close_delay_ms),
            ..Self::default()
        }
    }
}

/// 事件被丢弃的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayDrop {
    /// 普通更新缓冲区已满
    Lagging,
    /// 流已结束
    Closed,
}

/// Subscription side of a relay channel
///
/// Progress updates share a bounded buffer and are dropped when it is full.
/// Terminal events go through a separate one-slot queue so a slow consumer
/// still sees `done`/`failed` and the stream can close.
#[derive(Clone)]
pub struct RelaySender {
    updates: mpsc::Sender<TaskEvent>,
    terminal: mpsc::Sender<TaskEvent>,
}

impl RelaySender {
    pub fn push(&self, event: TaskEvent) -> Result<(), RelayDrop> {
        let queue = if event.status.is_terminal() {
            &self.terminal
        } else {
            &self.updates
        };
        queue.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => RelayDrop::Lagging,
            TrySendError::Closed(_) => RelayDrop::Closed,
        })
    }
}

/// Stream side of a relay channel
pub struct RelayReceiver {
    updates: mpsc::Receiver<TaskEvent>,
    terminal: mpsc::Receiver<TaskEvent>,
}

impl RelayReceiver {
    /// Next event, buffered updates first. `None` once both queues are closed
    /// and drained.
    pub async fn recv(&mut self) -> Option<TaskEvent> {
        tokio::select! {
            biased;
            Some(event) = self.updates.recv() => Some(event),
            Some(event) = self.terminal.recv() => Some(event),
            else => None,
        }
    }
}

pub fn relay_channel(capacity: usize) -> (RelaySender, RelayReceiver) {
    let (updates_tx, updates_rx) = mpsc::channel(capacity.max(1));
    let (terminal_tx, terminal_rx) = mpsc::channel(1);
    (
        RelaySender {
            updates: updates_tx,
            terminal: terminal_tx,
        },
        RelayReceiver {
            updates: updates_rx,
            terminal: terminal_rx,
        },
    )
}

/// Encode one named SSE frame
pub fn encode_frame<T: Serialize>(event: &str, data: &T) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_string(data)?;
    Ok(Bytes::from(format!("event: {}\ndata: {}\n\n", event, json)))
}

struct RelayState {
    task_id: String,
    snapshot: Option<Task>,
    rx: RelayReceiver,
    keepalive: Interval,
    close_at: Option<Instant>,
    close_delay: Duration,
    // 流被丢弃时随之退订
    _subscription: Subscription,
}

impl RelayState {
    fn arm_close(&mut self) {
        if self.close_at.is_none() {
            self.close_at = Some(Instant::now() + self.close_delay);
        }
    }
}

enum Next {
    Close,
    Event(Option<TaskEvent>),
    KeepAlive,
}

fn to_chunk(frame: Result<Bytes, serde_json::Error>) -> Result<Bytes, actix_web::Error> {
    frame.map_err(actix_web::error::ErrorInternalServerError)
}

/// Build the byte stream for one SSE connection
///
/// `rx` is fed by `subscription`; both must be created before `snapshot`
/// is read so no update is lost in between.
pub fn task_event_stream(
    snapshot: Task,
    rx: RelayReceiver,
    subscription: Subscription,
    settings: SseSettings,
) -> impl Stream<Item = Result<Bytes, actix_web::Error>> + 'static {
    let mut keepalive = interval_at(Instant::now() + settings.keepalive, settings.keepalive);
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let state = RelayState {
        task_id: snapshot.id.clone(),
        snapshot: Some(snapshot),
        rx,
        keepalive,
        close_at: None,
        close_delay: settings.close_delay,
        _subscription: subscription,
    };

    stream::unfold(state, |mut state| async move {
        if let Some(task) = state.snapshot.take() {
            if task.status.is_terminal() {
                state.arm_close();
            }
            return Some((to_chunk(encode_frame("task", &task)), state));
        }

        let close_at = state.close_at;
        let next = tokio::select! {
            _ = async {
                match close_at {
                    Some(at) => sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            } => Next::Close,
            event = state.rx.recv() => Next::Event(event),
            _ = state.keepalive.tick() => Next::KeepAlive,
        };

        match next {
            Next::Close => {
                debug!("SSE stream for task {} closed after terminal event", state.task_id);
                None
            }
            Next::Event(None) => {
                debug!("SSE source for task {} went away", state.task_id);
                None
            }
            Next::Event(Some(event)) => {
                if event.status.is_terminal() {
                    state.arm_close();
                }
                Some((to_chunk(encode_frame("update", &event)), state))
            }
            Next::KeepAlive => Some((Ok(Bytes::from_static(KEEP_ALIVE_FRAME)), state)),
        }
    })
}
