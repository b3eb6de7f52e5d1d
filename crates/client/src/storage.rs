use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "token";
/// Key under which the serialized user is persisted.
pub const USER_KEY: &str = "user";

/// String key/value persistence, the moral equivalent of browser local storage.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> std::io::Result<()>;
    fn remove(&self, key: &str) -> std::io::Result<()>;
}

/// Volatile storage. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.entries
            .lock()
            .map_err(|_| std::io::Error::other("storage lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
    fn remove(&self, key: &str) -> std::io::Result<()> {
        self.entries
            .lock()
            .map_err(|_| std::io::Error::other("storage lock poisoned"))?
            .remove(key);
        Ok(())
    }
}

/// One JSON object on disk, rewritten on every change.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
    fn read(&self) -> std::io::Result<HashMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text).map_err(std::io::Error::other),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e),
        }
    }
    fn write(&self, entries: &HashMap<String, String>) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let text = serde_json::to_string_pretty(entries).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, text)
    }
    fn modify<F>(&self, f: F) -> std::io::Result<()>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| std::io::Error::other("storage lock poisoned"))?;
        let mut entries = self.read().unwrap_or_default();
        f(&mut entries);
        self.write(&entries)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read()
            .inspect_err(|e| log::warn!("unreadable session file {}: {}", self.path.display(), e))
            .ok()?
            .remove(key)
    }
    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }
    fn remove(&self, key: &str) -> std::io::Result<()> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let storage = MemoryStorage::default();
        storage.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc"));
        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn file_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        FileStorage::new(&path).set(TOKEN_KEY, "abc").unwrap();
        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("abc"));
        reopened.remove(TOKEN_KEY).unwrap();
        assert_eq!(FileStorage::new(&path).get(TOKEN_KEY), None);
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ nope").unwrap();
        let storage = FileStorage::new(&path);
        assert_eq!(storage.get(TOKEN_KEY), None);
        storage.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc"));
    }
}
