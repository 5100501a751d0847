use crate::error::Result;
use crate::model::task::TaskCollection;

/// Whole-collection persistence. There is no partial access: every operation
/// reads the full collection and, if it mutates, writes the full collection back.
pub trait TaskRepository {
    fn load(&self) -> Result<TaskCollection>;
    fn save(&self, collection: &TaskCollection) -> Result<()>;

    /// Snapshot for read-only queries.
    fn read(&self) -> Result<TaskCollection> {
        self.load()
    }

    /// One load-mutate-save cycle. When `f` fails nothing is written.
    fn modify<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut TaskCollection) -> Result<T>,
        Self: Sized,
    {
        let mut collection = self.load()?;
        let out = f(&mut collection)?;
        self.save(&collection)?;
        Ok(out)
    }
}
