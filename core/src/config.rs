use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, TaskError};
use crate::model::task::TaskCollection;

pub const DEFAULT_FILE_NAME: &str = "tasks.json";

/// How a new task's id is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// `len + 1`. Can hand out an id that is still in use once tasks were deleted.
    SizeBased,
    /// `max id + 1`. Never collides with a surviving task.
    #[default]
    NextFree,
}

impl IdPolicy {
    /// Fails with `TaskError::IdsExhausted` once the next id would not fit in a `u32`.
    pub fn next_id(&self, collection: &TaskCollection) -> Result<u32> {
        let last = match self {
            IdPolicy::SizeBased => {
                u32::try_from(collection.len()).map_err(|_| TaskError::IdsExhausted)?
            }
            IdPolicy::NextFree => collection.max_id(),
        };
        last.checked_add(1).ok_or(TaskError::IdsExhausted)
    }
}

impl fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdPolicy::SizeBased => f.write_str("size-based"),
            IdPolicy::NextFree => f.write_str("next-free"),
        }
    }
}

impl FromStr for IdPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "size-based" => Ok(IdPolicy::SizeBased),
            "next-free" => Ok(IdPolicy::NextFree),
            other => Err(format!(
                "unknown id policy '{}': expected 'size-based' or 'next-free'",
                other
            )),
        }
    }
}

/// What update, mark and delete do when no task has the requested id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingTaskPolicy {
    /// Rewrite the collection unchanged and report success.
    #[default]
    Ignore,
    /// Fail with `TaskError::NotFound` and leave the file alone.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub id_policy: IdPolicy,
    pub missing_task: MissingTaskPolicy,
    /// Hold an advisory lock around each load-mutate-save cycle.
    pub lock: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_FILE_NAME),
            id_policy: IdPolicy::default(),
            missing_task: MissingTaskPolicy::default(),
            lock: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;

    fn collection(ids: &[u32]) -> TaskCollection {
        TaskCollection::new(ids.iter().map(|&id| Task::new(id, format!("task {}", id))).collect())
    }

    #[test]
    fn size_based_reuses_ids_after_gaps() {
        // 1 was deleted, 2 survives: size-based hands out 2 again.
        assert_eq!(IdPolicy::SizeBased.next_id(&collection(&[2])).unwrap(), 2);
        assert_eq!(IdPolicy::SizeBased.next_id(&collection(&[])).unwrap(), 1);
    }

    #[test]
    fn next_free_skips_past_highest_id() {
        assert_eq!(IdPolicy::NextFree.next_id(&collection(&[2])).unwrap(), 3);
        assert_eq!(IdPolicy::NextFree.next_id(&collection(&[5, 1])).unwrap(), 6);
        assert_eq!(IdPolicy::NextFree.next_id(&collection(&[])).unwrap(), 1);
    }

    #[test]
    fn next_id_refuses_to_overflow() {
        let full = collection(&[u32::MAX]);
        assert!(matches!(
            IdPolicy::NextFree.next_id(&full),
            Err(TaskError::IdsExhausted)
        ));
        assert_eq!(IdPolicy::SizeBased.next_id(&full).unwrap(), 2);
    }

    #[test]
    fn id_policy_parses_from_cli_names() {
        assert_eq!("size-based".parse::<IdPolicy>(), Ok(IdPolicy::SizeBased));
        assert_eq!("next-free".parse::<IdPolicy>(), Ok(IdPolicy::NextFree));
        assert!("max".parse::<IdPolicy>().is_err());
        assert_eq!(IdPolicy::SizeBased.to_string(), "size-based");
    }

    #[test]
    fn defaults_point_at_tasks_json() {
        let config = StoreConfig::default();
        assert_eq!(config.path, PathBuf::from("tasks.json"));
        assert_eq!(config.id_policy, IdPolicy::NextFree);
        assert_eq!(config.missing_task, MissingTaskPolicy::Ignore);
        assert!(config.lock);
    }
}
