use crate::assemble::Task;
use colored::Colorize;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};

/// All the tasks completed in one project.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ProjectGroup<'a> {
    /// The project name as it was first seen in sorted order (other spellings that differ only by
    /// case are folded into this group).
    pub project: &'a str,
    pub tasks: Vec<&'a Task>,
}

/// Sorts tasks by project name. This is case-sensitive and stable, so tasks within a project keep
/// the order the service returned them in.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.project.cmp(&b.project));
}

/// Groups already-sorted tasks by project, ignoring case. Groups come out in the order their first
/// task appears, and every project appears exactly once even if its spellings aren't contiguous
/// (e.g. `Home`, `Work`, `home`).
pub fn group_tasks(tasks: &[Task]) -> Vec<ProjectGroup<'_>> {
    let mut groups: Vec<ProjectGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for task in tasks {
        let idx = *index.entry(fold_case(&task.project)).or_insert_with(|| {
            groups.push(ProjectGroup {
                project: &task.project,
                tasks: Vec::new(),
            });
            groups.len() - 1
        });
        groups[idx].tasks.push(task);
    }

    groups
}

/// Folds a project name one character at a time so that names differing only by case compare
/// equal. Unlike `str::to_lowercase`, this ignores word position, so the final sigma folds like
/// any other.
fn fold_case(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect()
}

/// Writes the report as plain text, one header line per project followed by a tab-indented line
/// per task. Headers are red when `color` is set.
pub fn render_text<W: Write>(groups: &[ProjectGroup], color: bool, out: &mut W) -> io::Result<()> {
    for group in groups {
        if color {
            writeln!(out, "{}", group.project.red())?;
        } else {
            writeln!(out, "{}", group.project)?;
        }
        for task in &group.tasks {
            writeln!(out, "\t{} ({})", task.name, task.completed_date)?;
        }
    }

    Ok(())
}

/// Writes the report as a JSON array of groups.
pub fn render_json<W: Write>(groups: &[ProjectGroup], out: &mut W) -> io::Result<()> {
    serde_json::to_writer(&mut *out, groups)?;
    writeln!(out)
}
