//! Field-by-field comparison of two signature records.
//!
//! Output is an emission-ordered sequence of [`DiffEntry`] values. Plain
//! lines describe direct differences; [`DiffEntry::DepChanged`] marks a
//! dependency whose own signature changed, which the caller may expand by
//! recursing into that dependency's records.

use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use sigscope_types::{SignatureHash, TaskKey};

use crate::record::SigRecord;

/// One unit of diff engine output, in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffEntry {
    /// A direct, already-rendered report line.
    Line(String),
    /// A dependency whose signature hash changed between the two records.
    /// Carries its own rendered direct line; the nested explanation is the
    /// caller's job.
    DepChanged {
        task: TaskKey,
        from: SignatureHash,
        to: SignatureHash,
        line: String,
    },
}

impl DiffEntry {
    /// The rendered direct line of this entry.
    pub fn line(&self) -> &str {
        match self {
            Self::Line(line) => line,
            Self::DepChanged { line, .. } => line,
        }
    }

    /// Consume the entry, keeping only its rendered direct line.
    pub fn into_line(self) -> String {
        match self {
            Self::Line(line) => line,
            Self::DepChanged { line, .. } => line,
        }
    }
}

/// Compare two signature records field by field.
///
/// An empty result means the records are equivalent for reporting purposes.
/// `colorize` controls ANSI styling of the rendered lines.
pub fn compare_records(old: &SigRecord, new: &SigRecord, colorize: bool) -> Vec<DiffEntry> {
    let mut entries = Vec::new();

    if old.task != new.task {
        entries.push(DiffEntry::Line(format!(
            "Records are for different tasks: {} and {}",
            paint(&old.task.to_string(), colorize, Paint::Old),
            paint(&new.task.to_string(), colorize, Paint::New),
        )));
    }

    compare_variables(old, new, colorize, &mut entries);
    compare_checksums(old, new, colorize, &mut entries);
    compare_deps(old, new, colorize, &mut entries);

    entries
}

enum Paint {
    Name,
    Old,
    New,
}

fn paint(text: &str, colorize: bool, role: Paint) -> String {
    if !colorize {
        return text.to_string();
    }
    match role {
        Paint::Name => text.bold().to_string(),
        Paint::Old => text.red().to_string(),
        Paint::New => text.green().to_string(),
    }
}

fn fmt_value(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("'{v}'"),
        None => "unset".to_string(),
    }
}

fn compare_variables(
    old: &SigRecord,
    new: &SigRecord,
    colorize: bool,
    entries: &mut Vec<DiffEntry>,
) {
    for (name, old_value) in &old.variables {
        match new.variables.get(name) {
            None => entries.push(DiffEntry::Line(format!(
                "Variable {} was removed (value was {})",
                paint(name, colorize, Paint::Name),
                fmt_value(old_value),
            ))),
            Some(new_value) if new_value != old_value => {
                push_value_change(name, old_value, new_value, colorize, entries);
            }
            Some(_) => {}
        }
    }
    for (name, new_value) in &new.variables {
        if !old.variables.contains_key(name) {
            entries.push(DiffEntry::Line(format!(
                "Variable {} was added with value {}",
                paint(name, colorize, Paint::Name),
                fmt_value(new_value),
            )));
        }
    }
}

/// Multi-line values (function bodies and the like) get a line diff instead
/// of one unreadable inline pair.
fn push_value_change(
    name: &str,
    old_value: &Option<String>,
    new_value: &Option<String>,
    colorize: bool,
    entries: &mut Vec<DiffEntry>,
) {
    let multiline = matches!(
        (old_value, new_value),
        (Some(o), Some(n)) if o.contains('\n') || n.contains('\n')
    );
    if !multiline {
        entries.push(DiffEntry::Line(format!(
            "Variable {} value changed from {} to {}",
            paint(name, colorize, Paint::Name),
            paint(&fmt_value(old_value), colorize, Paint::Old),
            paint(&fmt_value(new_value), colorize, Paint::New),
        )));
        return;
    }

    let old_text = old_value.as_deref().unwrap_or_default();
    let new_text = new_value.as_deref().unwrap_or_default();
    entries.push(DiffEntry::Line(format!(
        "Variable {} value changed:",
        paint(name, colorize, Paint::Name),
    )));
    let diff = TextDiff::from_lines(old_text, new_text);
    for change in diff.iter_all_changes() {
        let text = change.value().trim_end_matches('\n');
        let line = match change.tag() {
            ChangeTag::Delete => paint(&format!("-{text}"), colorize, Paint::Old),
            ChangeTag::Insert => paint(&format!("+{text}"), colorize, Paint::New),
            ChangeTag::Equal => format!(" {text}"),
        };
        entries.push(DiffEntry::Line(format!("  {line}")));
    }
}

fn compare_checksums(
    old: &SigRecord,
    new: &SigRecord,
    colorize: bool,
    entries: &mut Vec<DiffEntry>,
) {
    for (file, old_sum) in &old.file_checksums {
        match new.file_checksums.get(file) {
            None => entries.push(DiffEntry::Line(format!(
                "File {} was removed from the input set",
                paint(file, colorize, Paint::Name),
            ))),
            Some(new_sum) if new_sum != old_sum => entries.push(DiffEntry::Line(format!(
                "Checksum for file {} changed from {} to {}",
                paint(file, colorize, Paint::Name),
                paint(old_sum, colorize, Paint::Old),
                paint(new_sum, colorize, Paint::New),
            ))),
            Some(_) => {}
        }
    }
    for (file, new_sum) in &new.file_checksums {
        if !old.file_checksums.contains_key(file) {
            entries.push(DiffEntry::Line(format!(
                "File {} was added with checksum {}",
                paint(file, colorize, Paint::Name),
                paint(new_sum, colorize, Paint::New),
            )));
        }
    }
}

fn compare_deps(old: &SigRecord, new: &SigRecord, colorize: bool, entries: &mut Vec<DiffEntry>) {
    for dep in &old.deps {
        match new.deps.iter().find(|d| d.task == dep.task) {
            None => entries.push(DiffEntry::Line(format!(
                "Dependency on task {} was removed",
                paint(&dep.task.to_string(), colorize, Paint::Name),
            ))),
            Some(new_dep) if new_dep.hash != dep.hash => {
                let line = format!(
                    "Hash for dependency {} changed from {} to {}",
                    paint(&dep.task.to_string(), colorize, Paint::Name),
                    paint(dep.hash.as_str(), colorize, Paint::Old),
                    paint(new_dep.hash.as_str(), colorize, Paint::New),
                );
                entries.push(DiffEntry::DepChanged {
                    task: dep.task.clone(),
                    from: dep.hash.clone(),
                    to: new_dep.hash.clone(),
                    line,
                });
            }
            Some(_) => {}
        }
    }
    for dep in &new.deps {
        if !old.deps.iter().any(|d| d.task == dep.task) {
            entries.push(DiffEntry::Line(format!(
                "Dependency on task {} was added",
                paint(&dep.task.to_string(), colorize, Paint::Name),
            )));
        }
    }
}
