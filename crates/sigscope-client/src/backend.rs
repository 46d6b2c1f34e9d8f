use async_trait::async_trait;
use sigscope_protocol::{Command, Event};
use tokio::sync::mpsc;

use crate::error::ClientResult;

/// Receiving half of one command's event stream.
pub type EventStream = mpsc::Receiver<Event>;

/// Capacity of per-command event channels.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A backend that can service sigscope commands.
///
/// `submit` hands the command over and returns the stream of events the
/// backend produces for it. Submission failure (unreachable service, write
/// error) maps to [`ClientError::BackendUnavailable`]; everything after a
/// successful submission arrives as events on the stream.
///
/// [`ClientError::BackendUnavailable`]: crate::error::ClientError::BackendUnavailable
#[async_trait]
pub trait Backend: Send + Sync {
    async fn submit(&self, command: Command) -> ClientResult<EventStream>;
}
