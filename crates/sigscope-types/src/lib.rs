//! Foundation types for sigscope.
//!
//! This crate provides the identity and result types used throughout the
//! sigscope system. Every other sigscope crate depends on `sigscope-types`.
//!
//! # Key Types
//!
//! - [`TaskKey`] — Identifies a class of signature records: (recipe, task)
//! - [`SignatureHash`] — Opaque identifier of one concrete signature computation
//! - [`SigFileRef`] — Locator for one on-disk signature record
//! - [`SigInfoResult`] — Insertion-ordered hash → record mapping returned by the backend

pub mod error;
pub mod hash;
pub mod siginfo;
pub mod task;

pub use error::TypeError;
pub use hash::SignatureHash;
pub use siginfo::{SigFileRef, SigInfoEntry, SigInfoResult};
pub use task::TaskKey;
