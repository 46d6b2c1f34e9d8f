//! Backend session layer for sigscope.
//!
//! A [`Backend`] accepts one command and hands back a stream of events; the
//! [`Session`] drives that exchange, draining the stream until a terminal
//! event arrives. Two backends are provided: [`TcpBackend`] speaks the wire
//! protocol to a running build-orchestration service, and [`MemoryBackend`]
//! serves scripted results for tests and offline experiments.

pub mod backend;
pub mod error;
pub mod memory;
pub mod session;
pub mod tcp;

pub use backend::{Backend, EventStream};
pub use error::{ClientError, ClientResult};
pub use memory::MemoryBackend;
pub use session::Session;
pub use tcp::TcpBackend;
