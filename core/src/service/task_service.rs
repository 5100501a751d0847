use tracing::{info, warn};

use crate::command::{Command, ADD_USAGE, UPDATE_USAGE};
use crate::config::{IdPolicy, MissingTaskPolicy, StoreConfig};
use crate::error::{Result, TaskError};
use crate::model::task::{Status, Task, TaskCollection};
use crate::repository::TaskRepository;

/// What a successfully executed command produced, for the caller to present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { id: u32 },
    Updated { id: u32 },
    Marked { id: u32, status: Status },
    Deleted { id: u32 },
    Listed { filter: Option<Status>, tasks: Vec<Task> },
    Help,
    Version,
}

pub struct TaskService<R: TaskRepository> {
    repo: R,
    id_policy: IdPolicy,
    missing_task: MissingTaskPolicy,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            id_policy: IdPolicy::default(),
            missing_task: MissingTaskPolicy::default(),
        }
    }

    pub fn with_config(repo: R, config: &StoreConfig) -> Self {
        Self {
            repo,
            id_policy: config.id_policy,
            missing_task: config.missing_task,
        }
    }

    pub fn id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }

    pub fn missing_task(mut self, policy: MissingTaskPolicy) -> Self {
        self.missing_task = policy;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Dispatches one routed command. Help and version never touch the store.
    pub fn execute(&self, command: Command) -> Result<Outcome> {
        match command {
            Command::Add { description } => {
                let id = self.create(description)?;
                Ok(Outcome::Created { id })
            }
            Command::Update { id, description } => {
                self.update_description(id, description)?;
                Ok(Outcome::Updated { id })
            }
            Command::Delete { id } => {
                self.delete(id)?;
                Ok(Outcome::Deleted { id })
            }
            Command::Mark { id, status } => {
                self.update_status(id, status)?;
                Ok(Outcome::Marked { id, status })
            }
            Command::List { filter } => {
                let tasks = self.list(filter)?;
                Ok(Outcome::Listed { filter, tasks })
            }
            Command::Help => Ok(Outcome::Help),
            Command::Version => Ok(Outcome::Version),
        }
    }

    /// Appends a new `todo` task and returns its id.
    pub fn create(&self, description: String) -> Result<u32> {
        if description.trim().is_empty() {
            return Err(TaskError::argument("Task description cannot be empty", ADD_USAGE));
        }
        let policy = self.id_policy;
        self.repo.modify(|collection| {
            let id = policy.next_id(collection)?;
            if collection.contains(id) {
                warn!(id, %policy, "new task id collides with an existing task");
            }
            collection.push(Task::new(id, description));
            info!(id, "task added");
            Ok(id)
        })
    }

    /// Returns how many tasks were changed (0 when the id is absent and absence is ignored).
    pub fn update_description(&self, id: u32, description: String) -> Result<usize> {
        if description.trim().is_empty() {
            return Err(TaskError::argument("Task description cannot be empty", UPDATE_USAGE));
        }
        self.repo.modify(|collection| {
            let touched = collection.update_where(id, |task| task.set_description(description.clone()));
            self.check_found(id, touched)?;
            info!(id, touched, "task description updated");
            Ok(touched)
        })
    }

    pub fn update_status(&self, id: u32, status: Status) -> Result<usize> {
        self.repo.modify(|collection| {
            let touched = collection.update_where(id, |task| task.set_status(status));
            self.check_found(id, touched)?;
            info!(id, %status, touched, "task status updated");
            Ok(touched)
        })
    }

    /// Returns how many tasks were removed.
    pub fn delete(&self, id: u32) -> Result<usize> {
        self.repo.modify(|collection| {
            let removed = collection.remove(id);
            self.check_found(id, removed)?;
            info!(id, removed, "task deleted");
            Ok(removed)
        })
    }

    /// Tasks in collection order, optionally narrowed to one status.
    /// An empty answer is reported as `TaskError::EmptyResult`.
    pub fn list(&self, filter: Option<Status>) -> Result<Vec<Task>> {
        let collection = self.repo.read()?;
        if collection.is_empty() {
            return Err(TaskError::EmptyResult(None));
        }
        let tasks = collection.filter(filter);
        if tasks.is_empty() {
            return Err(TaskError::EmptyResult(filter));
        }
        Ok(tasks)
    }

    pub fn snapshot(&self) -> Result<TaskCollection> {
        self.repo.read()
    }

    fn check_found(&self, id: u32, touched: usize) -> Result<()> {
        if touched > 0 {
            return Ok(());
        }
        match self.missing_task {
            MissingTaskPolicy::Ignore => {
                warn!(id, "no task with this id; collection left unchanged");
                Ok(())
            }
            MissingTaskPolicy::Reject => Err(TaskError::NotFound(id)),
        }
    }
}
