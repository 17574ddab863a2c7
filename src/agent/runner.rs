use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::types::Task;
use crate::errors::Result;

/// Progress callback handed to a running task
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: u8, message: &str);
}

/// Executes one task to completion
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn run(&self, task: &Task, progress: &dyn ProgressSink) -> Result<serde_json::Value>;
}

const DEFAULT_STEPS: &[&str] = &[
    "collecting creatives",
    "scoring engagement",
    "clustering hooks",
    "drafting insights",
];

/// Placeholder agent: walks a fixed plan and returns a canned summary
pub struct ScriptedRunner {
    steps: Vec<String>,
    step_delay: Duration,
}

impl ScriptedRunner {
    pub fn new(step_delay: Duration) -> Self {
        Self {
            steps: DEFAULT_STEPS.iter().map(|s| s.to_string()).collect(),
            step_delay,
        }
    }

    pub fn with_steps(steps: Vec<String>, step_delay: Duration) -> Self {
        Self { steps, step_delay }
    }

    pub fn from_config() -> Self {
        let config = crate::config::get_config();
        Self::new(Duration::from_millis(config.agent.step_delay_ms))
    }
}

#[async_trait]
impl TaskRunner for ScriptedRunner {
    async fn run(&self, task: &Task, progress: &dyn ProgressSink) -> Result<serde_json::Value> {
        let total = self.steps.len() + 1;
        for (i, step) in self.steps.iter().enumerate() {
            tokio::time::sleep(self.step_delay).await;
            let pct = ((i + 1) * 100 / total) as u8;
            progress.report(pct, step);
        }

        Ok(json!({
            "kind": task.kind,
            "prompt": task.prompt,
            "summary": format!("Completed {} steps for \"{}\"", self.steps.len(), task.prompt),
            "steps": self.steps,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::types::{DEFAULT_TASK_KIND, TaskStatus};
    use chrono::Utc;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(u8, String)>>);

    impl ProgressSink for Recorder {
        fn report(&self, progress: u8, message: &str) {
            self.0.lock().push((progress, message.to_string()));
        }
    }

    #[tokio::test]
    async fn test_scripted_runner_reports_increasing_progress() {
        let now = Utc::now();
        let task = Task {
            id: "t".to_string(),
            kind: DEFAULT_TASK_KIND.to_string(),
            prompt: "hooks in pet ads".to_string(),
            status: TaskStatus::Running,
            progress: 0,
            message: String::new(),
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        };
        let recorder = Recorder::default();
        let runner = ScriptedRunner::new(Duration::from_millis(1));

        let result = runner.run(&task, &recorder).await.unwrap();

        let reports = recorder.0.lock();
        assert_eq!(reports.len(), DEFAULT_STEPS.len());
        assert!(reports.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(reports.iter().all(|(p, _)| *p < 100));
        assert_eq!(result["steps"].as_array().unwrap().len(), DEFAULT_STEPS.len());
        assert_eq!(result["prompt"], "hooks in pet ads");
    }
}
