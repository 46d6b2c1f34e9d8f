//! The recursive diff orchestrator.

use std::future::Future;
use std::pin::Pin;

use sigscope_client::Session;
use sigscope_record::{compare_records, dump_record, DiffEntry, SigRecord};
use sigscope_types::{SigFileRef, SignatureHash, TaskKey};
use tracing::debug;

use crate::error::ExplainResult;
use crate::select::{select_pair, SelectError};

/// Indentation added to nested report lines, per recursion level.
const INDENT: &str = "  ";

/// Produces the full nested explanation of why two signature records differ.
///
/// Each dependency-level mismatch reported by the record diff triggers a
/// lookup of that dependency's two records and a recursive comparison, whose
/// lines are indented two spaces per level. Recursion depth is bounded only
/// by the dependency graph, which is acyclic in this domain.
pub struct Explainer {
    session: Session,
    colorize: bool,
}

impl Explainer {
    pub fn new(session: Session, colorize: bool) -> Self {
        Self { session, colorize }
    }

    /// Resolve a task's records through the backend and explain the
    /// difference between the selected pair.
    ///
    /// With `pair`, resolution is restricted to exactly those two hashes;
    /// without it, the two most recent records are compared.
    pub async fn explain_task(
        &self,
        task: &TaskKey,
        pair: Option<(&SignatureHash, &SignatureHash)>,
    ) -> ExplainResult<Vec<String>> {
        let filter = pair.map(|(from, to)| vec![from.clone(), to.clone()]);
        let result = self.session.find_sig_info(task, filter.as_deref()).await?;
        let (from, to) = select_pair(task, &result, pair)?;
        debug!(%task, %from, %to, "comparing records");
        self.compare_and_explain(&from, &to, true).await
    }

    /// Diff two record files, expanding dependency mismatches recursively
    /// when `recurse` is set.
    ///
    /// An empty result means the records are equivalent for reporting
    /// purposes. Missing dependency records degrade to explanatory lines;
    /// backend errors abort the whole explanation.
    pub async fn compare_and_explain(
        &self,
        from: &SigFileRef,
        to: &SigFileRef,
        recurse: bool,
    ) -> ExplainResult<Vec<String>> {
        let old = SigRecord::load(from.path())?;
        let new = SigRecord::load(to.path())?;

        let mut lines = Vec::new();
        for entry in compare_records(&old, &new, self.colorize) {
            match entry {
                DiffEntry::Line(line) => lines.push(line),
                DiffEntry::DepChanged {
                    task,
                    from,
                    to,
                    line,
                } => {
                    lines.push(line);
                    if recurse {
                        for nested in self.explain_dep(task, from, to).await? {
                            lines.push(format!("{INDENT}{nested}"));
                        }
                    }
                }
            }
        }
        Ok(lines)
    }

    /// Explain one dependency mismatch. Boxed because the explanation
    /// recurses through `compare_and_explain`.
    fn explain_dep(
        &self,
        task: TaskKey,
        from: SignatureHash,
        to: SignatureHash,
    ) -> Pin<Box<dyn Future<Output = ExplainResult<Vec<String>>> + Send + '_>> {
        Box::pin(async move {
            let filter = [from.clone(), to.clone()];
            let result = self.session.find_sig_info(&task, Some(&filter)).await?;
            match select_pair(&task, &result, Some((&from, &to))) {
                Ok((dep_from, dep_to)) => self.compare_and_explain(&dep_from, &dep_to, true).await,
                // A dependency's history may legitimately be gone; report it
                // inline instead of failing the whole comparison.
                Err(SelectError::NoMatchForEither { task, from, to }) => Ok(vec![format!(
                    "Unable to find matching sigdata for {task} with hashes {from} or {to}"
                )]),
                Err(SelectError::NoMatchForHash { task, hash }) => Ok(vec![format!(
                    "Unable to find matching sigdata for {task} with hash {hash}"
                )]),
                Err(other) => Err(other.into()),
            }
        })
    }
}

/// Compare two explicit record files without a backend. Dependency
/// mismatches report their direct line only; nothing recurses.
pub fn compare_files(
    from: &SigFileRef,
    to: &SigFileRef,
    colorize: bool,
) -> ExplainResult<Vec<String>> {
    let old = SigRecord::load(from.path())?;
    let new = SigRecord::load(to.path())?;
    Ok(compare_records(&old, &new, colorize)
        .into_iter()
        .map(DiffEntry::into_line)
        .collect())
}

/// Dump a single record file. Never recurses.
pub fn dump_file(file: &SigFileRef) -> ExplainResult<Vec<String>> {
    Ok(dump_record(&SigRecord::load(file.path())?))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::time::Duration;

    use sigscope_client::{ClientError, MemoryBackend};
    use sigscope_record::{TaskDep, FORMAT_VERSION};
    use sigscope_types::SigInfoEntry;

    use super::*;
    use crate::error::ExplainError;

    fn hash(s: &str) -> SignatureHash {
        SignatureHash::parse(s).unwrap()
    }

    fn record(task: &TaskKey, h: &str, cflags: &str, deps: Vec<TaskDep>) -> SigRecord {
        SigRecord {
            format: FORMAT_VERSION,
            task: task.clone(),
            hash: hash(h),
            variables: BTreeMap::from([("CFLAGS".to_string(), Some(cflags.to_string()))]),
            file_checksums: BTreeMap::new(),
            deps,
        }
    }

    /// Write a record to disk and register it with the backend.
    fn install(dir: &Path, backend: &MemoryBackend, record: &SigRecord) -> SigFileRef {
        let path = dir.join(format!("{}.{}.siginfo", record.task, record.hash));
        record.write(&path).unwrap();
        let file = SigFileRef::new(path);
        backend.add_record(
            record.task.clone(),
            SigInfoEntry {
                hash: record.hash.clone(),
                file: file.clone(),
                modified: None,
            },
        );
        file
    }

    fn explainer(backend: MemoryBackend) -> Explainer {
        let session =
            Session::new(Box::new(backend)).with_poll_interval(Duration::from_millis(10));
        Explainer::new(session, false)
    }

    #[tokio::test]
    async fn identical_records_yield_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MemoryBackend::new();
        let task = TaskKey::new("zlib", "compile").unwrap();
        let file = install(dir.path(), &backend, &record(&task, "aa11", "-O2", vec![]));

        let explainer = explainer(backend);
        let lines = explainer
            .compare_and_explain(&file, &file, true)
            .await
            .unwrap();
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn dependency_mismatch_recurses_with_indentation() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MemoryBackend::new();
        let dep_task = TaskKey::new("depPkg", "compile").unwrap();
        let top_task = TaskKey::new("app", "compile").unwrap();

        install(
            dir.path(),
            &backend,
            &record(&dep_task, "0a", "-O1", vec![]),
        );
        install(
            dir.path(),
            &backend,
            &record(&dep_task, "0b", "-O2", vec![]),
        );
        let top_old = install(
            dir.path(),
            &backend,
            &record(
                &top_task,
                "1a",
                "-Wall",
                vec![TaskDep {
                    task: dep_task.clone(),
                    hash: hash("0a"),
                }],
            ),
        );
        let top_new = install(
            dir.path(),
            &backend,
            &record(
                &top_task,
                "1b",
                "-Wall",
                vec![TaskDep {
                    task: dep_task.clone(),
                    hash: hash("0b"),
                }],
            ),
        );

        let explainer = explainer(backend);
        let lines = explainer
            .compare_and_explain(&top_old, &top_new, true)
            .await
            .unwrap();

        assert_eq!(
            lines,
            vec![
                "Hash for dependency depPkg:do_compile changed from 0a to 0b".to_string(),
                "  Variable CFLAGS value changed from '-O1' to '-O2'".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn two_level_recursion_indents_twice() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MemoryBackend::new();
        let leaf = TaskKey::new("leaf", "compile").unwrap();
        let mid = TaskKey::new("mid", "compile").unwrap();
        let top = TaskKey::new("top", "compile").unwrap();

        install(dir.path(), &backend, &record(&leaf, "0a", "-O1", vec![]));
        install(dir.path(), &backend, &record(&leaf, "0b", "-O2", vec![]));
        install(
            dir.path(),
            &backend,
            &record(&mid, "1a", "-g", vec![TaskDep { task: leaf.clone(), hash: hash("0a") }]),
        );
        install(
            dir.path(),
            &backend,
            &record(&mid, "1b", "-g", vec![TaskDep { task: leaf.clone(), hash: hash("0b") }]),
        );
        let top_old = install(
            dir.path(),
            &backend,
            &record(&top, "2a", "-Wall", vec![TaskDep { task: mid.clone(), hash: hash("1a") }]),
        );
        let top_new = install(
            dir.path(),
            &backend,
            &record(&top, "2b", "-Wall", vec![TaskDep { task: mid.clone(), hash: hash("1b") }]),
        );

        let explainer = explainer(backend);
        let lines = explainer
            .compare_and_explain(&top_old, &top_new, true)
            .await
            .unwrap();

        assert_eq!(
            lines,
            vec![
                "Hash for dependency mid:do_compile changed from 1a to 1b".to_string(),
                "  Hash for dependency leaf:do_compile changed from 0a to 0b".to_string(),
                "    Variable CFLAGS value changed from '-O1' to '-O2'".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn recursion_preserves_line_counts() {
        // Total line count must equal the direct diff's lines plus the sum
        // of all nested reports' lines.
        let dir = tempfile::tempdir().unwrap();
        let backend = MemoryBackend::new();
        let dep = TaskKey::new("dep", "compile").unwrap();
        let top = TaskKey::new("top", "compile").unwrap();

        let dep_old = record(&dep, "0a", "-O1", vec![]);
        let dep_new = record(&dep, "0b", "-O2", vec![]);
        install(dir.path(), &backend, &dep_old);
        install(dir.path(), &backend, &dep_new);

        let mut top_old = record(&top, "1a", "-Wall", vec![TaskDep { task: dep.clone(), hash: hash("0a") }]);
        let mut top_new = record(&top, "1b", "-Wextra", vec![TaskDep { task: dep.clone(), hash: hash("0b") }]);
        top_old
            .file_checksums
            .insert("main.c".to_string(), "1111".to_string());
        top_new
            .file_checksums
            .insert("main.c".to_string(), "2222".to_string());
        let top_old_file = install(dir.path(), &backend, &top_old);
        let top_new_file = install(dir.path(), &backend, &top_new);

        let nested = compare_records(&dep_old, &dep_new, false).len();
        let direct = compare_records(&top_old, &top_new, false).len();

        let explainer = explainer(backend);
        let lines = explainer
            .compare_and_explain(&top_old_file, &top_new_file, true)
            .await
            .unwrap();
        assert_eq!(lines.len(), direct + nested);
    }

    #[tokio::test]
    async fn missing_both_dep_records_degrades_to_text() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MemoryBackend::new();
        let dep = TaskKey::new("vanished", "compile").unwrap();
        let top = TaskKey::new("top", "compile").unwrap();

        let top_old = install(
            dir.path(),
            &backend,
            &record(&top, "1a", "-Wall", vec![TaskDep { task: dep.clone(), hash: hash("0a") }]),
        );
        let top_new = install(
            dir.path(),
            &backend,
            &record(&top, "1b", "-Wall", vec![TaskDep { task: dep.clone(), hash: hash("0b") }]),
        );

        let explainer = explainer(backend);
        let lines = explainer
            .compare_and_explain(&top_old, &top_new, true)
            .await
            .unwrap();
        assert_eq!(
            lines,
            vec![
                "Hash for dependency vanished:do_compile changed from 0a to 0b".to_string(),
                "  Unable to find matching sigdata for vanished:do_compile with hashes 0a or 0b"
                    .to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn missing_one_dep_record_names_the_missing_hash() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MemoryBackend::new();
        let dep = TaskKey::new("partial", "compile").unwrap();
        let top = TaskKey::new("top", "compile").unwrap();

        install(dir.path(), &backend, &record(&dep, "0a", "-O1", vec![]));
        let top_old = install(
            dir.path(),
            &backend,
            &record(&top, "1a", "-Wall", vec![TaskDep { task: dep.clone(), hash: hash("0a") }]),
        );
        let top_new = install(
            dir.path(),
            &backend,
            &record(&top, "1b", "-Wall", vec![TaskDep { task: dep.clone(), hash: hash("0b") }]),
        );

        let explainer = explainer(backend);
        let lines = explainer
            .compare_and_explain(&top_old, &top_new, true)
            .await
            .unwrap();
        assert_eq!(
            lines[1],
            "  Unable to find matching sigdata for partial:do_compile with hash 0b"
        );
    }

    #[tokio::test]
    async fn explain_task_uses_most_recent_pair() {
        use chrono::{TimeZone, Utc};

        let dir = tempfile::tempdir().unwrap();
        let backend = MemoryBackend::new();
        let task = TaskKey::new("zlib", "compile").unwrap();

        for (i, (h, cflags)) in [("0a", "-O1"), ("0b", "-O2"), ("0c", "-O3")].iter().enumerate() {
            let rec = record(&task, h, cflags, vec![]);
            let path = dir.path().join(format!("{}.siginfo", h));
            rec.write(&path).unwrap();
            backend.add_record(
                task.clone(),
                SigInfoEntry {
                    hash: hash(h),
                    file: SigFileRef::new(path),
                    modified: Some(Utc.with_ymd_and_hms(2026, 8, 1, 12, i as u32, 0).unwrap()),
                },
            );
        }

        let explainer = explainer(backend);
        let lines = explainer.explain_task(&task, None).await.unwrap();
        // t1 is ignored; t2 vs t3 is the comparison.
        assert_eq!(
            lines,
            vec!["Variable CFLAGS value changed from '-O2' to '-O3'".to_string()]
        );
    }

    #[tokio::test]
    async fn explain_task_explicit_pair_order() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MemoryBackend::new();
        let task = TaskKey::new("zlib", "compile").unwrap();
        install(dir.path(), &backend, &record(&task, "0a", "-O1", vec![]));
        install(dir.path(), &backend, &record(&task, "0b", "-O2", vec![]));

        let explainer = explainer(backend);
        let lines = explainer
            .explain_task(&task, Some((&hash("0b"), &hash("0a"))))
            .await
            .unwrap();
        // Declared order is from=0b, to=0a: never swapped.
        assert_eq!(
            lines,
            vec!["Variable CFLAGS value changed from '-O2' to '-O1'".to_string()]
        );
    }

    #[tokio::test]
    async fn backend_failure_is_fatal() {
        let backend = MemoryBackend::new();
        backend.fail_with("disk error");
        let task = TaskKey::new("zlib", "compile").unwrap();

        let explainer = explainer(backend);
        let err = explainer.explain_task(&task, None).await.unwrap_err();
        match err {
            ExplainError::Client(ClientError::CommandFailed(message)) => {
                assert!(message.contains("disk error"));
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn compare_files_does_not_recurse() {
        let dir = tempfile::tempdir().unwrap();
        let dep = TaskKey::new("dep", "compile").unwrap();
        let top = TaskKey::new("top", "compile").unwrap();

        let old = record(&top, "1a", "-Wall", vec![TaskDep { task: dep.clone(), hash: hash("0a") }]);
        let new = record(&top, "1b", "-Wall", vec![TaskDep { task: dep, hash: hash("0b") }]);
        let old_path = dir.path().join("old.siginfo");
        let new_path = dir.path().join("new.siginfo");
        old.write(&old_path).unwrap();
        new.write(&new_path).unwrap();

        let lines = compare_files(
            &SigFileRef::new(old_path),
            &SigFileRef::new(new_path),
            false,
        )
        .unwrap();
        assert_eq!(
            lines,
            vec!["Hash for dependency dep:do_compile changed from 0a to 0b".to_string()]
        );
    }

    #[test]
    fn dump_file_renders_record() {
        let dir = tempfile::tempdir().unwrap();
        let task = TaskKey::new("zlib", "compile").unwrap();
        let rec = record(&task, "aa11", "-O2", vec![]);
        let path = dir.path().join("rec.siginfo");
        rec.write(&path).unwrap();

        let lines = dump_file(&SigFileRef::new(path)).unwrap();
        assert_eq!(lines[0], "Task:   zlib:do_compile");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.siginfo");
        std::fs::write(&path, "junk").unwrap();
        let err = dump_file(&SigFileRef::new(path)).unwrap_err();
        assert!(matches!(err, ExplainError::Record(_)));
    }
}
