//! Single-record dump: render one signature record as readable lines.

use crate::record::SigRecord;

/// Render a record for human inspection. Never recurses and never colors;
/// the output is meant to be greppable.
pub fn dump_record(record: &SigRecord) -> Vec<String> {
    let mut lines = vec![
        format!("Task:   {}", record.task),
        format!("Hash:   {}", record.hash),
    ];

    if !record.variables.is_empty() {
        lines.push("Variables:".to_string());
        for (name, value) in &record.variables {
            match value {
                Some(v) if v.contains('\n') => {
                    lines.push(format!("  {name} ="));
                    for vline in v.lines() {
                        lines.push(format!("    {vline}"));
                    }
                }
                Some(v) => lines.push(format!("  {name} = '{v}'")),
                None => lines.push(format!("  {name} = unset")),
            }
        }
    }

    if !record.file_checksums.is_empty() {
        lines.push("File checksums:".to_string());
        for (file, sum) in &record.file_checksums {
            lines.push(format!("  {file}: {sum}"));
        }
    }

    if !record.deps.is_empty() {
        lines.push("Dependencies:".to_string());
        for dep in &record.deps {
            lines.push(format!("  {}: {}", dep.task, dep.hash));
        }
    }

    lines
}
