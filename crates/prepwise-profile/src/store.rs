//! Persistence for the logged-in profile and the attempt history.
//!
//! The file stores live under the configured data directory; the memory
//! stores back tests and embedders that don't want disk state.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use prepwise_core::AttemptRecord;

use crate::error::StoreError;
use crate::user::User;

pub const PROFILE_FILE: &str = "profile.json";
pub const ATTEMPTS_FILE: &str = "attempts.jsonl";

/// Where the current user's profile is kept between runs.
pub trait ProfileStore {
    /// `Ok(None)` when nobody is logged in.
    fn load(&self) -> Result<Option<User>, StoreError>;
    fn save(&self, user: &User) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Append-only history of finished sessions.
pub trait AttemptStore {
    fn append(&self, record: &AttemptRecord) -> Result<(), StoreError>;
    fn list(&self) -> Result<Vec<AttemptRecord>, StoreError>;
}

/// Profile as pretty JSON in `<data_dir>/profile.json`.
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(PROFILE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for FileProfileStore {
    fn load(&self) -> Result<Option<User>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let user = serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(user))
    }

    fn save(&self, user: &User) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(user)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        std::fs::write(&self.path, json).map_err(|e| StoreError::io(&self.path, e))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }
}

/// One JSON object per line in `<data_dir>/attempts.jsonl`.
#[derive(Debug, Clone)]
pub struct FileAttemptStore {
    path: PathBuf,
}

impl FileAttemptStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(ATTEMPTS_FILE),
        }
    }
}

impl AttemptStore for FileAttemptStore {
    fn append(&self, record: &AttemptRecord) -> Result<(), StoreError> {
        let line = serde_json::to_string(record)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        writeln!(file, "{line}").map_err(|e| StoreError::io(&self.path, e))
    }

    /// Unreadable lines are skipped with a warning.
    fn list(&self) -> Result<Vec<AttemptRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;

        let mut records = Vec::new();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("skipping {} line {}: {}", self.path.display(), n + 1, e);
                }
            }
        }
        Ok(records)
    }
}

#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    user: Mutex<Option<User>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> Result<Option<User>, StoreError> {
        let guard = self
            .user
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, user: &User) -> Result<(), StoreError> {
        let mut guard = self
            .user
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        *guard = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self
            .user
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryAttemptStore {
    records: Mutex<Vec<AttemptRecord>>,
}

impl MemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttemptStore for MemoryAttemptStore {
    fn append(&self, record: &AttemptRecord) -> Result<(), StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        guard.push(record.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<AttemptRecord>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use prepwise_core::TopicKind;
    use uuid::Uuid;

    use super::*;
    use crate::user::Role;

    fn record(user: &str, score: u32) -> AttemptRecord {
        AttemptRecord {
            id: Uuid::new_v4(),
            user_id: user.into(),
            user_name: user.into(),
            topic_key: "fire-drill".into(),
            topic_title: "Fire Emergency Drill".into(),
            kind: TopicKind::Drill,
            score,
            total: 3,
            percentage: 0,
            passed: false,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn file_profile_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProfileStore::new(&dir.path().join("data"));
        assert!(store.load().unwrap().is_none());

        let user = User::new("sam@school.edu", Role::Student);
        store.save(&user).unwrap();
        assert_eq!(store.load().unwrap(), Some(user));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_profile_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProfileStore::new(dir.path());
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(
            store.load().unwrap_err(),
            StoreError::Corrupt { .. }
        ));
    }

    #[test]
    fn file_attempts_append_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAttemptStore::new(dir.path());
        assert!(store.list().unwrap().is_empty());

        store.append(&record("a", 1)).unwrap();
        store.append(&record("b", 2)).unwrap();
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].user_id, "a");
        assert_eq!(listed[1].score, 2);
    }

    #[test]
    fn file_attempts_skip_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAttemptStore::new(dir.path());
        store.append(&record("a", 1)).unwrap();
        let path = dir.path().join(ATTEMPTS_FILE);
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("garbage\n\n");
        std::fs::write(&path, content).unwrap();
        store.append(&record("b", 3)).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[test]
    fn memory_stores() {
        let profiles = MemoryProfileStore::new();
        let user = User::new("t@school.edu", Role::Teacher);
        profiles.save(&user).unwrap();
        assert_eq!(profiles.load().unwrap().map(|u| u.role), Some(Role::Teacher));
        profiles.clear().unwrap();
        assert!(profiles.load().unwrap().is_none());

        let attempts = MemoryAttemptStore::new();
        attempts.append(&record("a", 1)).unwrap();
        assert_eq!(attempts.list().unwrap().len(), 1);
    }
}
