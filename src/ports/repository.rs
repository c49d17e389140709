//! Repository port for snapshot persistence.
//!
//! The domain never touches files itself; the training driver hands a
//! [`SavedStore`] to one of these when asked to save or resume.

use std::path::Path;

use crate::{Result, menace::SavedStore};

/// Port for persisting and loading matchbox snapshots.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use matchbox_menace::{menace::SavedStore, ports::StoreRepository};
///
/// fn backup<R: StoreRepository>(repo: &R, snapshot: &SavedStore) -> matchbox_menace::Result<()> {
///     repo.save(snapshot, Path::new("menace.msgpack"))
/// }
/// ```
pub trait StoreRepository {
    /// Write `snapshot` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or serialization fails.
    fn save(&self, snapshot: &SavedStore, path: &Path) -> Result<()>;

    /// Read a snapshot from `path` and check its version.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid snapshot,
    /// or carries an unsupported version.
    fn load(&self, path: &Path) -> Result<SavedStore>;
}
