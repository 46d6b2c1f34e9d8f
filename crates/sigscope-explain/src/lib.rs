//! Recursive signature diff orchestration.
//!
//! Given two signature records, the [`Explainer`] produces the full nested
//! explanation of why they differ: it runs the record diff, and whenever a
//! difference traces back to a dependency task's signature, it asks the
//! backend for that dependency's records and recurses, indenting nested
//! output two spaces per level.
//!
//! # Key Types
//!
//! - [`select_pair`] / [`SelectError`] -- Narrowing a backend result to the
//!   two records to compare
//! - [`Explainer`] -- The recursive diff orchestrator
//! - [`compare_files`] / [`dump_file`] -- Backend-free paths for explicit files

pub mod error;
pub mod explain;
pub mod select;

pub use error::{ExplainError, ExplainResult};
pub use explain::{compare_files, dump_file, Explainer};
pub use select::{select_pair, SelectError};
