//! Work items that can be assigned to focus sessions.
//!
//! Work items are owned by the task manager; jornada only reads them. The
//! file provider reads a JSON array of `{ "id", "title", "status" }` objects,
//! the format the task manager exports.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::JornadaError;

/// Status of a work item in the task manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemStatus {
    #[serde(alias = "pending", alias = "todo", alias = "in_progress")]
    Open,
    #[serde(alias = "done")]
    Completed,
    Canceled,
}

impl std::fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Completed => write!(f, "completed"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    pub status: WorkItemStatus,
}

impl WorkItem {
    /// Whether the item can still be queued for a jornada.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == WorkItemStatus::Open
    }
}

/// Source of work items.
#[cfg_attr(test, mockall::automock)]
pub trait WorkItemProvider {
    /// All work items, in the provider's order.
    ///
    /// # Errors
    ///
    /// Returns an error if the items cannot be read.
    fn work_items(&self) -> Result<Vec<WorkItem>, JornadaError>;
}

/// Items that can be added to a jornada.
///
/// # Errors
///
/// Returns an error if the provider fails.
pub fn available(provider: &dyn WorkItemProvider) -> Result<Vec<WorkItem>, JornadaError> {
    Ok(provider
        .work_items()?
        .into_iter()
        .filter(WorkItem::is_available)
        .collect())
}

/// Look up one item by id.
///
/// # Errors
///
/// Returns an error if the provider fails.
pub fn find(provider: &dyn WorkItemProvider, id: &str) -> Result<Option<WorkItem>, JornadaError> {
    Ok(provider.work_items()?.into_iter().find(|item| item.id == id))
}

/// Display title for an id, falling back to the id itself.
#[must_use]
pub fn title_for<'a>(items: &'a [WorkItem], id: &'a str) -> &'a str {
    items
        .iter()
        .find(|item| item.id == id)
        .map_or(id, |item| item.title.as_str())
}

/// Reads work items from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WorkItemProvider for JsonFileProvider {
    /// A missing file means no work items.
    fn work_items(&self) -> Result<Vec<WorkItem>, JornadaError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no work-item file");
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents).map_err(|e| {
            JornadaError::Parse(format!(
                "Failed to parse work items {}: {e}",
                self.path.display()
            ))
        })
    }
}

/// A fixed list of work items.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    items: Vec<WorkItem>,
}

#[cfg(test)]
impl StaticProvider {
    #[must_use]
    pub const fn new(items: Vec<WorkItem>) -> Self {
        Self { items }
    }
}

#[cfg(test)]
impl WorkItemProvider for StaticProvider {
    fn work_items(&self) -> Result<Vec<WorkItem>, JornadaError> {
        Ok(self.items.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn item(id: &str, title: &str, status: WorkItemStatus) -> WorkItem {
        WorkItem {
            id: id.to_string(),
            title: title.to_string(),
            status,
        }
    }

    #[test]
    fn test_available_filters_closed_items() {
        let mut provider = MockWorkItemProvider::new();
        provider.expect_work_items().returning(|| {
            Ok(vec![
                item("a", "Write report", WorkItemStatus::Open),
                item("b", "File taxes", WorkItemStatus::Completed),
                item("c", "Call plumber", WorkItemStatus::Canceled),
            ])
        });

        let items = available(&provider).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "a");
    }

    #[test]
    fn test_find_propagates_errors() {
        let mut provider = MockWorkItemProvider::new();
        provider
            .expect_work_items()
            .returning(|| Err(JornadaError::Parse("bad file".to_string())));

        assert!(find(&provider, "a").is_err());
    }

    #[test]
    fn test_title_for_falls_back_to_id() {
        let items = vec![item("a", "Write report", WorkItemStatus::Open)];
        assert_eq!(title_for(&items, "a"), "Write report");
        assert_eq!(title_for(&items, "zz"), "zz");
    }

    #[test]
    fn test_json_file_provider() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "t1", "title": "Draft chapter", "status": "pending"},
                {"id": "t2", "title": "Review PR", "status": "done"}
            ]"#,
        )
        .unwrap();

        let provider = JsonFileProvider::new(&path);
        let items = provider.work_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].status, WorkItemStatus::Open);
        assert_eq!(items[1].status, WorkItemStatus::Completed);

        let found = find(&provider, "t1").unwrap().unwrap();
        assert_eq!(found.title, "Draft chapter");
    }

    #[test]
    fn test_json_file_provider_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let provider = JsonFileProvider::new(temp_dir.path().join("absent.json"));
        assert!(provider.work_items().unwrap().is_empty());
    }

    #[test]
    fn test_json_file_provider_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFileProvider::new(&path).work_items().unwrap_err();
        assert!(matches!(err, JornadaError::Parse(_)));
    }
}
