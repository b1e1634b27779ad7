// Persistence slot: a single named entry in local storage

use eyre::{Context, Result};
use fs2::FileExt;
use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Read/write port for the single persisted state slot.
///
/// The store writes the entire encoded collection through this port after
/// every mutation and reads it back once at startup. Injecting the port
/// keeps the store testable with an in-memory fake.
pub trait StateSlot {
    /// Read the persisted payload, `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<String>>;

    /// Overwrite the slot with the given payload.
    fn save(&self, payload: &str) -> Result<()>;
}

/// File-backed slot. One file holds the whole encoded collection.
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateSlot for FileSlot {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read state file"),
        }
    }

    fn save(&self, payload: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create state directory")?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .context("Failed to open state file for writing")?;

        // Acquire exclusive lock before writing
        file.lock_exclusive().context("Failed to acquire file lock")?;

        file.write_all(payload.as_bytes())?;
        file.sync_all()?;

        // Lock is automatically released when file is dropped
        Ok(())
    }
}

/// In-memory slot for tests and demos.
#[derive(Default)]
pub struct MemorySlot {
    value: RefCell<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load the slot with a payload, as if a prior run had saved it.
    pub fn with_payload(payload: &str) -> Self {
        Self {
            value: RefCell::new(Some(payload.to_string())),
        }
    }
}

impl StateSlot for MemorySlot {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.value.borrow().clone())
    }

    fn save(&self, payload: &str) -> Result<()> {
        *self.value.borrow_mut() = Some(payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_slot_load_missing() {
        let temp = TempDir::new().unwrap();
        let slot = FileSlot::new(temp.path().join("tasks.json"));

        assert_eq!(slot.load().unwrap(), None);
    }

    #[test]
    fn test_file_slot_round_trip() {
        let temp = TempDir::new().unwrap();
        let slot = FileSlot::new(temp.path().join("tasks.json"));

        slot.save(r#"[{"id":1}]"#).unwrap();
        assert_eq!(slot.load().unwrap().unwrap(), r#"[{"id":1}]"#);
    }

    #[test]
    fn test_file_slot_save_overwrites() {
        let temp = TempDir::new().unwrap();
        let slot = FileSlot::new(temp.path().join("tasks.json"));

        slot.save("first payload, longer than the second").unwrap();
        slot.save("second").unwrap();
        assert_eq!(slot.load().unwrap().unwrap(), "second");
    }

    #[test]
    fn test_file_slot_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let slot = FileSlot::new(temp.path().join("nested/dir/tasks.json"));

        slot.save("[]").unwrap();
        assert_eq!(slot.load().unwrap().unwrap(), "[]");
    }

    #[test]
    fn test_memory_slot() {
        let slot = MemorySlot::new();
        assert_eq!(slot.load().unwrap(), None);

        slot.save("payload").unwrap();
        assert_eq!(slot.load().unwrap().unwrap(), "payload");

        let preloaded = MemorySlot::with_payload("seeded");
        assert_eq!(preloaded.load().unwrap().unwrap(), "seeded");
    }
}
