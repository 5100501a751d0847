use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{Result, TaskError};
use crate::model::task::{Task, TaskCollection};
use crate::repository::traits::TaskRepository;

/// Placeholder written into a freshly created store.
pub const SEED_DESCRIPTION: &str = "description";

/// JSON file store. Writes go to a sibling temp file that is renamed over the
/// target, so a failed save never leaves a half-written collection behind.
///
/// Two processes can still interleave their read-modify-write cycles unless
/// locking is enabled; the lock is advisory and only honoured by this tool.
#[derive(Clone, Debug)]
pub struct FileTaskRepository {
    file_path: PathBuf,
    lock: bool,
}

/// Exclusive advisory lock on `<store>.lock`, released on drop.
struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

impl FileTaskRepository {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            lock: false,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            file_path: config.path.clone(),
            lock: config.lock,
        }
    }

    pub fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn acquire(&self) -> Result<Option<StoreLock>> {
        if !self.lock {
            return Ok(None);
        }
        let lock_path = sibling(&self.file_path, ".lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| TaskError::io(&lock_path, e))?;
        file.lock_exclusive()
            .map_err(|e| TaskError::io(&lock_path, e))?;
        debug!(path = %lock_path.display(), "acquired store lock");
        Ok(Some(StoreLock { file }))
    }

    fn seed_if_missing(&self) -> Result<()> {
        if self.file_path.exists() {
            return Ok(());
        }
        let seed = TaskCollection::new(vec![Task::new(1, SEED_DESCRIPTION.to_string())]);
        self.write_tasks(&seed)?;
        info!(path = %self.file_path.display(), "created task file with placeholder task");
        Ok(())
    }

    fn read_tasks(&self) -> Result<TaskCollection> {
        let bytes = fs::read(&self.file_path).map_err(|e| TaskError::io(&self.file_path, e))?;
        let collection: TaskCollection =
            serde_json::from_slice(&bytes).map_err(|e| TaskError::CorruptData {
                path: self.file_path.clone(),
                message: e.to_string(),
            })?;
        collection.check().map_err(|message| TaskError::CorruptData {
            path: self.file_path.clone(),
            message,
        })?;
        debug!(path = %self.file_path.display(), tasks = collection.len(), "loaded tasks");
        Ok(collection)
    }

    fn write_tasks(&self, collection: &TaskCollection) -> Result<()> {
        let tmp = sibling(&self.file_path, ".tmp");
        let result = (|| -> std::io::Result<()> {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, collection)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            fs::rename(&tmp, &self.file_path)
        })();
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(TaskError::io(&self.file_path, e));
        }
        debug!(path = %self.file_path.display(), tasks = collection.len(), "saved tasks");
        Ok(())
    }
}

impl TaskRepository for FileTaskRepository {
    fn load(&self) -> Result<TaskCollection> {
        self.seed_if_missing()?;
        self.read_tasks()
    }

    fn save(&self, collection: &TaskCollection) -> Result<()> {
        self.write_tasks(collection)
    }

    // Reads still work where the lock file cannot be created, e.g. a read-only directory.
    fn read(&self) -> Result<TaskCollection> {
        let _guard = match self.acquire() {
            Ok(guard) => guard,
            Err(err) => {
                debug!(%err, "reading without store lock");
                None
            }
        };
        self.load()
    }

    fn modify<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut TaskCollection) -> Result<T>,
    {
        let _guard = self.acquire()?;
        let mut collection = self.load()?;
        let out = f(&mut collection)?;
        self.save(&collection)?;
        Ok(out)
    }
}
