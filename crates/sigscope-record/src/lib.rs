//! Signature record format and diff engine for sigscope.
//!
//! A signature record is the stored fingerprint of one build task's inputs:
//! the variables it depends on, the checksums of the files it reads, and the
//! signature hashes of the tasks it depends on. This crate owns the on-disk
//! format (JSON), the single-record dump, and the field-by-field comparison
//! that the recursive orchestrator drives.
//!
//! # Key Types
//!
//! - [`SigRecord`] / [`TaskDep`] -- The record format
//! - [`DiffEntry`] -- Emission-ordered diff output; `DepChanged` entries are
//!   the recursion points the orchestrator expands
//! - [`compare_records`] / [`dump_record`] -- The diff engine operations

pub mod compare;
pub mod dump;
pub mod error;
pub mod record;

pub use compare::{compare_records, DiffEntry};
pub use dump::dump_record;
pub use error::{RecordError, RecordResult};
pub use record::{SigRecord, TaskDep, FORMAT_VERSION};
