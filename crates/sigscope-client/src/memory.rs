use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use sigscope_protocol::{Command, Event, LogLevel};
use sigscope_types::{SigInfoEntry, TaskKey};
use tokio::sync::mpsc;

use crate::backend::{Backend, EventStream};
use crate::error::ClientResult;

/// In-memory backend for tests and offline experiments.
///
/// Serves scripted signature record entries per task, streamed back as one
/// `PartialResult` per entry followed by `Completed`. A scripted failure
/// replaces the whole response with a single `Failed` terminal event.
#[derive(Default)]
pub struct MemoryBackend {
    inner: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    records: HashMap<TaskKey, Vec<SigInfoEntry>>,
    fail_with: Option<String>,
    log_lines: Vec<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record entry for a task.
    pub fn add_record(&self, task: TaskKey, entry: SigInfoEntry) {
        self.inner
            .write()
            .expect("memory backend lock poisoned")
            .records
            .entry(task)
            .or_default()
            .push(entry);
    }

    /// Script every subsequent command to fail with this message.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.inner
            .write()
            .expect("memory backend lock poisoned")
            .fail_with = Some(message.into());
    }

    /// Script an informational log record to precede each response.
    pub fn log_line(&self, message: impl Into<String>) {
        self.inner
            .write()
            .expect("memory backend lock poisoned")
            .log_lines
            .push(message.into());
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn submit(&self, command: Command) -> ClientResult<EventStream> {
        let Command::FindSigInfo { task, hashes } = command;

        let mut events = Vec::new();
        {
            let state = self.inner.read().expect("memory backend lock poisoned");
            for message in &state.log_lines {
                events.push(Event::LogRecord {
                    level: LogLevel::Info,
                    message: message.clone(),
                });
            }
            if let Some(message) = &state.fail_with {
                events.push(Event::Failed {
                    message: message.clone(),
                });
            } else {
                for entry in state.records.get(&task).into_iter().flatten() {
                    let keep = match &hashes {
                        Some(filter) => filter.contains(&entry.hash),
                        None => true,
                    };
                    if keep {
                        let mut entry = entry.clone();
                        if hashes.is_some() {
                            // Timestamps are only reported in unfiltered scans.
                            entry.modified = None;
                        }
                        events.push(Event::PartialResult {
                            result: [entry].into_iter().collect(),
                        });
                    }
                }
                events.push(Event::Completed);
            }
        }

        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            tx.send(event).await.expect("fresh channel cannot be full");
        }
        Ok(rx)
    }
}
