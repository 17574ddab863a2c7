//! Agent task orchestration
//!
//! `TaskOrchestrator` is the seam the HTTP layer talks to. The bundled
//! `LocalOrchestrator` runs a placeholder `ScriptedRunner` in process.

mod local;
mod orchestrator;
mod runner;
mod types;

pub use local::LocalOrchestrator;
pub use orchestrator::{Subscription, TaskCallback, TaskOrchestrator};
pub use runner::{ProgressSink, ScriptedRunner, TaskRunner};
pub use types::{DEFAULT_TASK_KIND, NewTask, Task, TaskEvent, TaskStatus};
