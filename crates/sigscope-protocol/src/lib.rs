//! Wire protocol for sigscope.
//!
//! One command type flows client -> backend ([`Command::FindSigInfo`]); the
//! backend answers with a stream of [`Event`] values terminated by exactly
//! one `Completed` or `Failed`. Frames are length-prefixed bincode.
//!
//! # Key Types
//!
//! - [`Command`] / [`Event`] / [`LogLevel`] -- The message vocabulary
//! - [`codec`] -- Frame encoding and decoding

pub mod codec;
pub mod error;
pub mod message;

pub use error::{ProtocolError, ProtocolResult};
pub use message::{Command, Event, LogLevel, MAX_MESSAGE_SIZE, PROTOCOL_VERSION};
