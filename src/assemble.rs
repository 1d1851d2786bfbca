use crate::error::ReportError;
use crate::fetch::CompletedPayload;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// A single completed task, ready to be reported on.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// When the task was completed, exactly as the service reported it.
    pub completed_date: String,
    /// The content (title) of the task.
    pub name: String,
    /// The display name of the task's project, or an empty string if the project wasn't in the
    /// response.
    pub project: String,
}

/// A completed item as it comes off the wire.
#[derive(Deserialize, Debug)]
struct RawItem {
    completed_date: String,
    content: String,
    project_id: ProjectId,
}

#[derive(Deserialize, Debug)]
struct RawProject {
    name: String,
}

/// Project IDs have been sent both as integers and as strings over the life of the API, and the
/// `projects` map is always keyed by the string form.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ProjectId {
    Number(serde_json::Number),
    Text(String),
}
impl ProjectId {
    fn into_key(self) -> String {
        match self {
            ProjectId::Number(n) => n.to_string(),
            ProjectId::Text(s) => s,
        }
    }
}

/// A map of project IDs to their display names, built once from a response.
#[derive(Debug, Default)]
pub struct ProjectLookup(HashMap<String, String>);
impl ProjectLookup {
    /// Builds the lookup from the `projects` object of a response. Every project must at least
    /// have a string `name`.
    pub fn from_projects(projects: &Map<String, Value>) -> Result<Self, ReportError> {
        projects
            .iter()
            .map(|(id, project)| {
                RawProject::deserialize(project)
                    .map(|p| (id.clone(), p.name))
                    .map_err(|err| ReportError::Shape(format!("project {id}: {err}")))
            })
            .collect::<Result<HashMap<_, _>, _>>()
            .map(Self)
    }

    /// Gets the name of the given project, if we know it.
    pub fn name(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }
}

/// Joins every completed item with its project name. Items whose project isn't in the response
/// are kept, with an empty project name.
pub fn assemble(payload: &CompletedPayload) -> Result<Vec<Task>, ReportError> {
    let lookup = ProjectLookup::from_projects(&payload.projects)?;

    payload
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let raw = RawItem::deserialize(item)
                .map_err(|err| ReportError::Shape(format!("item {idx}: {err}")))?;
            let project_id = raw.project_id.into_key();
            let project = match lookup.name(&project_id) {
                Some(name) => name.to_string(),
                None => {
                    debug!(%project_id, "completed item references an unknown project");
                    String::new()
                }
            };

            Ok(Task {
                completed_date: raw.completed_date,
                name: raw.content,
                project,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> CompletedPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn items_are_joined_with_project_names() {
        let tasks = assemble(&payload(json!({
            "items": [
                { "completed_date": "2024-01-01", "content": "Buy milk", "project_id": 1 },
                { "completed_date": "2024-01-02", "content": "Write report", "project_id": 2 }
            ],
            "projects": { "1": { "name": "Home" }, "2": { "name": "Work", "color": 30 } }
        })))
        .unwrap();

        assert_eq!(
            tasks,
            vec![
                Task {
                    completed_date: "2024-01-01".to_string(),
                    name: "Buy milk".to_string(),
                    project: "Home".to_string(),
                },
                Task {
                    completed_date: "2024-01-02".to_string(),
                    name: "Write report".to_string(),
                    project: "Work".to_string(),
                },
            ]
        );
    }

    #[test]
    fn unknown_project_gets_empty_name() {
        let tasks = assemble(&payload(json!({
            "items": [{ "completed_date": "2024-01-01", "content": "Orphan", "project_id": 99 }],
            "projects": { "1": { "name": "Home" } }
        })))
        .unwrap();

        assert_eq!(tasks[0].project, "");
    }

    #[test]
    fn string_and_large_project_ids_resolve() {
        let tasks = assemble(&payload(json!({
            "items": [
                { "completed_date": "2024-01-01", "content": "A", "project_id": "2203306141" },
                { "completed_date": "2024-01-01", "content": "B", "project_id": 2203306141u64 }
            ],
            "projects": { "2203306141": { "name": "Inbox" } }
        })))
        .unwrap();

        assert!(tasks.iter().all(|t| t.project == "Inbox"));
    }

    #[test]
    fn duplicates_are_preserved() {
        let item = json!({ "completed_date": "2024-01-01", "content": "Same", "project_id": 1 });
        let tasks = assemble(&payload(json!({
            "items": [item.clone(), item],
            "projects": { "1": { "name": "Home" } }
        })))
        .unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0], tasks[1]);
    }

    #[test]
    fn item_with_wrong_field_type_is_a_shape_error() {
        let err = assemble(&payload(json!({
            "items": [
                { "completed_date": "2024-01-01", "content": "Fine", "project_id": 1 },
                { "completed_date": 20240101, "content": "Broken", "project_id": 1 }
            ],
            "projects": { "1": { "name": "Home" } }
        })))
        .unwrap_err();

        assert!(matches!(err, ReportError::Shape(ref msg) if msg.starts_with("item 1")));
    }

    #[test]
    fn item_missing_content_is_a_shape_error() {
        let err = assemble(&payload(json!({
            "items": [{ "completed_date": "2024-01-01", "project_id": 1 }],
            "projects": {}
        })))
        .unwrap_err();

        assert!(matches!(err, ReportError::Shape(ref msg) if msg.contains("content")));
    }

    #[test]
    fn project_without_name_is_a_shape_error() {
        let err = assemble(&payload(json!({
            "items": [],
            "projects": { "7": { "color": 30 } }
        })))
        .unwrap_err();

        assert!(matches!(err, ReportError::Shape(ref msg) if msg.starts_with("project 7")));
    }
}
