use std::collections::HashMap;
use tokio::task::JoinHandle;

pub const MONITOR_TASK: &str = "media_monitor";
pub const AUTOSAVE_TASK: &str = "autosave";

/// Background tasks by name. Spawning under a taken name aborts the old task;
/// everything still running is aborted on drop.
#[derive(Default)]
pub struct TaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, key: &str, task: JoinHandle<()>) {
        if let Some(handle) = self.tasks.insert(key.to_string(), task) {
            handle.abort();
        }
    }

    pub fn is_running(&self, key: &str) -> bool {
        self.tasks.get(key).is_some_and(|handle| !handle.is_finished())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn abort(&mut self, key: &str) {
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    pub fn abort_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn respawning_a_key_aborts_the_previous_task() {
        let mut tasks = TaskManager::new();
        let (alive_tx, alive_rx) = tokio::sync::oneshot::channel::<()>();
        let first = tokio::spawn(async move {
            let _alive = alive_tx;
            std::future::pending::<()>().await;
        });

        tasks.spawn(AUTOSAVE_TASK, first);
        tasks.spawn(AUTOSAVE_TASK, tokio::spawn(std::future::pending::<()>()));

        assert!(alive_rx.await.is_err());
        assert!(tasks.is_running(AUTOSAVE_TASK));
        assert_eq!(tasks.len(), 1);

        tasks.abort_all();
        assert!(tasks.is_empty());
    }
}
