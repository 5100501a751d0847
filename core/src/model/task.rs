use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of task states. Serialized as `todo`, `in-progress`, `done`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Status::Todo),
            "in-progress" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            other => Err(format!(
                "invalid status '{}': must be 'todo', 'in-progress', or 'done'",
                other
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub description: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: u32, description: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            description,
            status: Status::Todo,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_description(&mut self, description: String) {
        self.description = description;
        self.touch();
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.touch();
    }

    // Clock skew must never leave updated_at behind created_at.
    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

/// The whole persisted store: `{ "tasks": [...] }` in insertion order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskCollection {
    pub tasks: Vec<Task>,
}

impl TaskCollection {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Largest id currently in use, 0 when empty.
    pub fn max_id(&self) -> u32 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0)
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Applies `f` to every task carrying `id`. Returns how many were touched.
    pub fn update_where<F>(&mut self, id: u32, mut f: F) -> usize
    where
        F: FnMut(&mut Task),
    {
        let mut touched = 0;
        for task in self.tasks.iter_mut().filter(|t| t.id == id) {
            f(task);
            touched += 1;
        }
        touched
    }

    /// Drops every task carrying `id`. Returns how many were removed.
    pub fn remove(&mut self, id: u32) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        before - self.tasks.len()
    }

    pub fn filter(&self, status: Option<Status>) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .cloned()
            .collect()
    }

    /// Checks the invariants serde cannot express. Returns a description of the first violation.
    pub fn check(&self) -> Result<(), String> {
        for task in &self.tasks {
            if task.id == 0 {
                return Err("task ids must be positive, found id 0".to_string());
            }
            if task.updated_at < task.created_at {
                return Err(format!(
                    "task {} was updated before it was created",
                    task.id
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn status_serializes_as_kebab_case() {
        let json = serde_json::to_string(&Status::ALL).unwrap();
        assert_eq!(json, r#"["todo","in-progress","done"]"#);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<Status>(r#""blocked""#).is_err());
        assert!("blocked".parse::<Status>().is_err());
        assert_eq!("in-progress".parse::<Status>(), Ok(Status::InProgress));
    }

    #[test]
    fn new_task_starts_as_todo() {
        let task = Task::new(7, "Write report".to_string());
        assert_eq!(task.id, 7);
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn mutations_refresh_updated_at_only() {
        let mut task = Task::new(1, "a".to_string());
        let created = task.created_at;
        task.updated_at = created;
        task.set_status(Status::Done);
        assert_eq!(task.created_at, created);
        assert!(task.updated_at >= created);
        assert_eq!(task.status, Status::Done);
    }

    #[test]
    fn update_where_and_remove_report_matches() {
        let mut collection = TaskCollection::new(vec![
            Task::new(1, "a".to_string()),
            Task::new(2, "b".to_string()),
        ]);
        assert_eq!(collection.update_where(3, |t| t.description.clear()), 0);
        assert_eq!(collection.update_where(2, |t| t.set_status(Status::Done)), 1);
        assert_eq!(collection.tasks[1].status, Status::Done);

        assert_eq!(collection.remove(9), 0);
        assert_eq!(collection.remove(1), 1);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.max_id(), 2);
    }

    #[test]
    fn filter_keeps_collection_order() {
        let mut a = Task::new(1, "a".to_string());
        a.status = Status::Done;
        let b = Task::new(2, "b".to_string());
        let mut c = Task::new(3, "c".to_string());
        c.status = Status::Done;
        let collection = TaskCollection::new(vec![a, b, c]);

        let done: Vec<u32> = collection.filter(Some(Status::Done)).iter().map(|t| t.id).collect();
        assert_eq!(done, vec![1, 3]);
        assert_eq!(collection.filter(None).len(), 3);
    }

    #[test]
    fn check_flags_time_travel() {
        let mut task = Task::new(1, "a".to_string());
        task.updated_at = task.created_at - Duration::seconds(5);
        let collection = TaskCollection::new(vec![task]);
        assert!(collection.check().is_err());
        assert!(TaskCollection::default().check().is_ok());
    }

    #[test]
    fn check_flags_zero_id() {
        let collection = TaskCollection::new(vec![
            Task::new(1, "a".to_string()),
            Task::new(0, "b".to_string()),
        ]);
        assert!(collection.check().unwrap_err().contains("id 0"));
    }
}
