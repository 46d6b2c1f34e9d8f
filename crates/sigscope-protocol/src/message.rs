use serde::{Deserialize, Serialize};
use sigscope_types::{SigInfoResult, SignatureHash, TaskKey};

pub const PROTOCOL_VERSION: u32 = 1;
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Commands a client may submit to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Locate signature records for a task. `hashes: None` means "all known,
    /// with recency timestamps"; `Some` filters to the given one or two
    /// hashes (no timestamps needed).
    FindSigInfo {
        task: TaskKey,
        hashes: Option<Vec<SignatureHash>>,
    },
}

impl Command {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::FindSigInfo { .. } => "FindSigInfo",
        }
    }
}

/// Severity of a backend log record, mirrored into the client's logger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Events streamed back by the backend while servicing a command.
///
/// `Completed` and `Failed` are terminal: the backend sends exactly one of
/// them per command, and nothing after it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// The command finished; the accumulated partial results are complete.
    Completed,
    /// The command failed backend-side. Fatal to the whole invocation.
    Failed { message: String },
    /// A batch of matching records. May arrive any number of times.
    PartialResult { result: SigInfoResult },
    /// A backend log line to forward to the client's logger.
    LogRecord { level: LogLevel, message: String },
}

impl Event {
    /// Returns `true` for events that end the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Failed { .. } => "Failed",
            Self::PartialResult { .. } => "PartialResult",
            Self::LogRecord { .. } => "LogRecord",
        }
    }
}
