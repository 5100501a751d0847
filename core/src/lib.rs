pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use command::{route, Command, USAGES};
pub use config::{IdPolicy, MissingTaskPolicy, StoreConfig};
pub use error::{Result, TaskError};
pub use model::task::{Status, Task, TaskCollection};
pub use repository::{FileTaskRepository, TaskRepository};
pub use service::task_service::{Outcome, TaskService};
pub use time::format_timestamp;

