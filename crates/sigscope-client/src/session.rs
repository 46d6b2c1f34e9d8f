use std::time::Duration;

use sigscope_protocol::{Command, Event, LogLevel};
use sigscope_types::{SigInfoResult, SignatureHash, TaskKey};
use tokio::time::timeout;
use tracing::{debug, error, info, trace, warn};

use crate::backend::Backend;
use crate::error::{ClientError, ClientResult};

/// Default bound on one wait for the next backend event.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Manages one outstanding command against the backend at a time.
///
/// The session is the only place the event stream is consumed: it drains
/// events until the terminal `Completed` or `Failed` arrives, accumulating
/// partial results along the way. A poll that times out simply loops again;
/// only a terminal event (or a closed stream) ends the wait.
pub struct Session {
    backend: Box<dyn Backend>,
    poll_interval: Duration,
}

impl Session {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Locate signature records for `task`.
    ///
    /// `hashes: None` asks for every known record (with recency timestamps);
    /// `Some` restricts the scan to the given one or two hashes. The result
    /// may be empty; that is not an error.
    pub async fn find_sig_info(
        &self,
        task: &TaskKey,
        hashes: Option<&[SignatureHash]>,
    ) -> ClientResult<SigInfoResult> {
        let command = Command::FindSigInfo {
            task: task.clone(),
            hashes: hashes.map(|h| h.to_vec()),
        };
        debug!(%task, command = command.type_name(), "running backend command");
        let mut events = self.backend.submit(command).await?;

        let mut result = SigInfoResult::new();
        loop {
            let event = match timeout(self.poll_interval, events.recv()).await {
                Err(_) => {
                    trace!(%task, "no event within poll interval, waiting again");
                    continue;
                }
                Ok(None) => {
                    return Err(ClientError::BackendUnavailable(
                        "event stream closed before the command completed".into(),
                    ))
                }
                Ok(Some(event)) => event,
            };

            match event {
                Event::LogRecord { level, message } => match level {
                    LogLevel::Debug => debug!(target: "backend", "{message}"),
                    LogLevel::Info => info!(target: "backend", "{message}"),
                    LogLevel::Warn => warn!(target: "backend", "{message}"),
                    LogLevel::Error => error!(target: "backend", "{message}"),
                },
                Event::PartialResult { result: partial } => {
                    trace!(%task, entries = partial.len(), "partial result");
                    result.merge(partial);
                }
                Event::Completed => {
                    debug!(%task, entries = result.len(), "command completed");
                    return Ok(result);
                }
                Event::Failed { message } => {
                    return Err(ClientError::CommandFailed(message));
                }
            }
        }
    }
}
