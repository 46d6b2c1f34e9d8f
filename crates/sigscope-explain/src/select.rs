//! Candidate selection: narrow a backend result set to exactly the two
//! record files to compare.

use chrono::DateTime;
use sigscope_types::{SigFileRef, SigInfoResult, SignatureHash, TaskKey};
use thiserror::Error;

/// Failures while resolving which two records to compare. All of these are
/// terminal to the invocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("no signature data found for task {0}")]
    NoMatch(TaskKey),

    #[error("only one signature record exists for task {0}; two are needed to compare")]
    InsufficientHistory(TaskKey),

    #[error("no signature record for task {task} matches hash {hash}")]
    NoMatchForHash { task: TaskKey, hash: SignatureHash },

    #[error("no signature record for task {task} matches hash {from} or {to}")]
    NoMatchForEither {
        task: TaskKey,
        from: SignatureHash,
        to: SignatureHash,
    },
}

/// Pick the two record files to compare, returned as (from, to).
///
/// With an explicit hash pair, both hashes must appear in `result` and the
/// declared order is preserved. Without one, entries are sorted by ascending
/// recency and the two most recent win; equal timestamps keep the result's
/// insertion order (the sort is stable), and entries without a timestamp
/// sort earliest.
pub fn select_pair(
    task: &TaskKey,
    result: &SigInfoResult,
    pair: Option<(&SignatureHash, &SignatureHash)>,
) -> Result<(SigFileRef, SigFileRef), SelectError> {
    match pair {
        Some((from, to)) => select_explicit(task, result, from, to),
        None => select_most_recent(task, result),
    }
}

fn select_explicit(
    task: &TaskKey,
    result: &SigInfoResult,
    from: &SignatureHash,
    to: &SignatureHash,
) -> Result<(SigFileRef, SigFileRef), SelectError> {
    match (result.get(from), result.get(to)) {
        (Some(a), Some(b)) => Ok((a.file.clone(), b.file.clone())),
        (None, None) => Err(SelectError::NoMatchForEither {
            task: task.clone(),
            from: from.clone(),
            to: to.clone(),
        }),
        (None, Some(_)) => Err(SelectError::NoMatchForHash {
            task: task.clone(),
            hash: from.clone(),
        }),
        (Some(_), None) => Err(SelectError::NoMatchForHash {
            task: task.clone(),
            hash: to.clone(),
        }),
    }
}

fn select_most_recent(
    task: &TaskKey,
    result: &SigInfoResult,
) -> Result<(SigFileRef, SigFileRef), SelectError> {
    let mut entries: Vec<_> = result.iter().collect();
    match entries.len() {
        0 => return Err(SelectError::NoMatch(task.clone())),
        1 => return Err(SelectError::InsufficientHistory(task.clone())),
        _ => {}
    }
    entries.sort_by_key(|e| e.modified.unwrap_or(DateTime::UNIX_EPOCH));
    let to = entries[entries.len() - 1];
    let from = entries[entries.len() - 2];
    Ok((from.file.clone(), to.file.clone()))
}
