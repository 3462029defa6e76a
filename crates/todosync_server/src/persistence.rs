//! Secret loading and snapshot persistence.

use crate::error::{ServerError, ServerResult};
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use todosync_protocol::StateDocument;

/// Reads the shared secret from `path`.
///
/// With `trim` set, trailing `\r` and `\n` characters are removed; any other
/// whitespace is part of the secret.
pub fn load_secret(path: &Path, trim: bool) -> ServerResult<String> {
    let secret = match fs::read_to_string(path) {
        Ok(secret) => secret,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ServerError::SecretNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    if trim {
        Ok(secret.trim_end_matches(['\r', '\n']).to_string())
    } else {
        Ok(secret)
    }
}

/// Durable storage for the state snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Loads the last saved snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> ServerResult<Option<StateDocument>>;

    /// Replaces the saved snapshot.
    fn save(&self, document: &StateDocument) -> ServerResult<()>;

    /// Describes where the snapshot lives, for logs.
    fn location(&self) -> String;

    /// Moves an undecodable snapshot out of the way so later saves do not
    /// overwrite it. Returns where it was moved, if anywhere.
    fn set_aside(&self) -> ServerResult<Option<String>> {
        Ok(None)
    }
}

/// Snapshot stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Creates a store for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling_path(".tmp")
    }

    /// Path a corrupt snapshot is renamed to.
    pub fn corrupt_path(&self) -> PathBuf {
        self.sibling_path(".corrupt")
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> ServerResult<()> {
        let dir = File::open(self.parent_dir())?;
        dir.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> ServerResult<()> {
        // NTFS journals the rename itself
        Ok(())
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> ServerResult<Option<StateDocument>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if data.is_empty() {
            return Ok(None);
        }

        StateDocument::decode(&data)
            .map(Some)
            .map_err(|e| ServerError::SnapshotDecode {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }

    /// Writes to a temporary sibling file, syncs it, then renames it over
    /// the snapshot so readers never see a partial file.
    fn save(&self, document: &StateDocument) -> ServerResult<()> {
        let data = document.encode_pretty()?;
        let temp_path = self.temp_path();

        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)?;
        self.sync_directory()?;

        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn set_aside(&self) -> ServerResult<Option<String>> {
        let target = self.corrupt_path();
        fs::rename(&self.path, &target)?;
        Ok(Some(target.display().to_string()))
    }
}

/// In-memory snapshot store.
///
/// Counts writes and can be told to fail upcoming saves. Useful for testing.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    document: Mutex<Option<StateDocument>>,
    writes: AtomicUsize,
    failures_pending: AtomicU32,
}

impl MemorySnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a snapshot.
    pub fn with_document(document: StateDocument) -> Self {
        Self {
            document: Mutex::new(Some(document)),
            ..Self::default()
        }
    }

    /// Makes the next `count` saves fail.
    pub fn fail_next_saves(&self, count: u32) {
        self.failures_pending.store(count, Ordering::SeqCst);
    }

    /// Returns the number of successful saves.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Returns the stored snapshot.
    pub fn document(&self) -> Option<StateDocument> {
        self.document.lock().clone()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> ServerResult<Option<StateDocument>> {
        Ok(self.document.lock().clone())
    }

    fn save(&self, document: &StateDocument) -> ServerResult<()> {
        let failing = self
            .failures_pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ServerError::Io(io::Error::new(
                io::ErrorKind::Other,
                "injected save failure",
            )));
        }

        *self.document.lock() = Some(document.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn secret_is_trimmed_of_trailing_newlines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("password.txt");
        fs::write(&path, "s3cr3t\r\n").unwrap();

        assert_eq!(load_secret(&path, true).unwrap(), "s3cr3t");
        assert_eq!(load_secret(&path, false).unwrap(), "s3cr3t\r\n");
    }

    #[test]
    fn secret_keeps_inner_and_leading_whitespace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("password.txt");
        fs::write(&path, " two words \n").unwrap();

        assert_eq!(load_secret(&path, true).unwrap(), " two words ");
    }

    #[test]
    fn missing_secret_is_not_found() {
        let dir = tempdir().unwrap();
        let result = load_secret(&dir.path().join("absent.txt"), true);
        assert!(matches!(result, Err(ServerError::SecretNotFound { .. })));
    }

    #[test]
    fn unreadable_secret_is_io_error() {
        let dir = tempdir().unwrap();
        let result = load_secret(dir.path(), true);
        assert!(matches!(result, Err(ServerError::Io(_))));
    }

    #[test]
    fn missing_snapshot_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("data.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn empty_snapshot_loads_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, b"").unwrap();
        assert!(FileSnapshotStore::new(path).load().unwrap().is_none());
    }

    #[test]
    fn corrupt_snapshot_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, b"{\"checklist\": ").unwrap();

        let result = FileSnapshotStore::new(path).load();
        assert!(matches!(result, Err(ServerError::SnapshotDecode { .. })));
    }

    #[test]
    fn corrupt_snapshot_is_set_aside() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, b"{\"checklist\": ").unwrap();
        let store = FileSnapshotStore::new(&path);

        let moved = store.set_aside().unwrap();
        let expected = dir.path().join("data.json.corrupt");
        assert_eq!(moved, Some(expected.display().to_string()));
        assert!(!path.exists());
        assert_eq!(fs::read(store.corrupt_path()).unwrap(), b"{\"checklist\": ");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("data.json"));
        let document = StateDocument::new()
            .with_checklist("milk", false, 0)
            .with_checklist("bread", true, 1)
            .with_inventory("eggs", 4, 12, 0);

        store.save(&document).unwrap();
        assert_eq!(store.load().unwrap(), Some(document));
    }

    #[test]
    fn save_overwrites_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("data.json"));

        store
            .save(&StateDocument::new().with_checklist("milk", false, 0))
            .unwrap();
        let second = StateDocument::new().with_inventory("eggs", 1, 6, 0);
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), Some(second));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("data.json")]);
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nope").join("data.json"));
        assert!(matches!(
            store.save(&StateDocument::new()),
            Err(ServerError::Io(_))
        ));
    }

    #[test]
    fn memory_store_injected_failures() {
        let store = MemorySnapshotStore::new();
        store.fail_next_saves(1);

        assert!(store.save(&StateDocument::new()).is_err());
        assert!(store.save(&StateDocument::new()).is_ok());
        assert_eq!(store.write_count(), 1);
    }
}
