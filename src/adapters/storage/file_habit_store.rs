//! File-based Habit Store Adapter
//!
//! Layout, one directory per owner and habit:
//!
//! ```text
//! <data_dir>/<owner_id>/<habit_id>/habit.yaml        record (serde_yaml)
//! <data_dir>/<owner_id>/<habit_id>/completions.jsonl  one JSON completion per line
//! ```
//!
//! The history file is only ever appended to, so a failed record update
//! never loses completions.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::foundation::{HabitId, UserId};
use crate::domain::habit::{Habit, HabitCompletion, HabitSnapshot};
use crate::ports::{HabitStore, HabitStoreError};

const RECORD_FILE: &str = "habit.yaml";
const HISTORY_FILE: &str = "completions.jsonl";

/// File-based storage for habits
#[derive(Debug, Clone)]
pub struct FileHabitStore {
    base_path: PathBuf,
}

impl FileHabitStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileHabitStore::new("./data/habits");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Lists every owner that has a directory under the base path.
    ///
    /// Directory names that are not valid owner ids are skipped. A missing
    /// base directory yields an empty list.
    pub async fn list_owners(&self) -> Result<Vec<UserId>, HabitStoreError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }
        let mut owners = Vec::new();
        let mut entries = fs::read_dir(&self.base_path).await.map_err(io_error)?;
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let file_type = entry.file_type().await.map_err(io_error)?;
            if !file_type.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if let Ok(owner) = UserId::new(name) {
                    owners.push(owner);
                }
            }
        }
        owners.sort();
        Ok(owners)
    }

    fn owner_dir(&self, owner_id: &UserId) -> PathBuf {
        self.base_path.join(owner_id.as_str())
    }

    fn habit_dir(&self, owner_id: &UserId, habit_id: &HabitId) -> PathBuf {
        self.owner_dir(owner_id).join(habit_id.to_string())
    }

    fn record_path(&self, owner_id: &UserId, habit_id: &HabitId) -> PathBuf {
        self.habit_dir(owner_id, habit_id).join(RECORD_FILE)
    }

    fn history_path(&self, owner_id: &UserId, habit_id: &HabitId) -> PathBuf {
        self.habit_dir(owner_id, habit_id).join(HISTORY_FILE)
    }

    /// Ensure directory exists
    async fn ensure_dir(&self, path: &Path) -> Result<(), HabitStoreError> {
        fs::create_dir_all(path).await.map_err(io_error)
    }

    /// Writes the record through a temporary file and a rename.
    async fn write_record(&self, habit: &Habit) -> Result<(), HabitStoreError> {
        let yaml = serde_yaml::to_string(&habit.snapshot())
            .map_err(|e| HabitStoreError::SerializationFailed(e.to_string()))?;

        let path = self.record_path(habit.owner_id(), habit.id());
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml).await.map_err(io_error)?;
        fs::rename(&tmp, &path).await.map_err(io_error)
    }

    async fn read_record(&self, dir: &Path) -> Result<HabitSnapshot, HabitStoreError> {
        let yaml = fs::read_to_string(dir.join(RECORD_FILE))
            .await
            .map_err(io_error)?;
        serde_yaml::from_str(&yaml).map_err(|e| HabitStoreError::DeserializationFailed(e.to_string()))
    }

    async fn read_history(&self, dir: &Path) -> Result<Vec<HabitCompletion>, HabitStoreError> {
        let path = dir.join(HISTORY_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).await.map_err(io_error)?;
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line).map_err(|e| {
                    HabitStoreError::DeserializationFailed(format!(
                        "{} line {}: {}",
                        path.display(),
                        n + 1,
                        e
                    ))
                })
            })
            .collect()
    }
}

fn io_error(err: std::io::Error) -> HabitStoreError {
    HabitStoreError::IoError(err.to_string())
}

fn completion_line(completion: &HabitCompletion) -> Result<String, HabitStoreError> {
    let mut line = serde_json::to_string(completion)
        .map_err(|e| HabitStoreError::SerializationFailed(e.to_string()))?;
    line.push('\n');
    Ok(line)
}

#[async_trait]
impl HabitStore for FileHabitStore {
    async fn create(&self, habit: &Habit) -> Result<HabitId, HabitStoreError> {
        if self.record_path(habit.owner_id(), habit.id()).exists() {
            return Err(HabitStoreError::AlreadyExists(*habit.id()));
        }
        let dir = self.habit_dir(habit.owner_id(), habit.id());
        self.ensure_dir(&dir).await?;

        let mut history = String::new();
        for completion in habit.completions() {
            history.push_str(&completion_line(completion)?);
        }
        fs::write(self.history_path(habit.owner_id(), habit.id()), history)
            .await
            .map_err(io_error)?;

        self.write_record(habit).await?;
        Ok(*habit.id())
    }

    async fn append_completion(
        &self,
        owner_id: &UserId,
        habit_id: &HabitId,
        completion: &HabitCompletion,
    ) -> Result<(), HabitStoreError> {
        if !self.record_path(owner_id, habit_id).exists() {
            return Err(HabitStoreError::NotFound(*habit_id));
        }
        let line = completion_line(completion)?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.history_path(owner_id, habit_id))
            .await
            .map_err(io_error)?;
        file.write_all(line.as_bytes()).await.map_err(io_error)?;
        file.flush().await.map_err(io_error)
    }

    async fn load_all(&self, owner_id: &UserId) -> Result<Vec<Habit>, HabitStoreError> {
        let owner_dir = self.owner_dir(owner_id);
        if !owner_dir.exists() {
            return Ok(Vec::new());
        }

        let mut habits = Vec::new();
        let mut entries = fs::read_dir(&owner_dir).await.map_err(io_error)?;
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let dir = entry.path();
            if !dir.join(RECORD_FILE).exists() {
                continue;
            }
            let record = self.read_record(&dir).await?;
            let history = self.read_history(&dir).await?;
            let habit = Habit::reconstitute(record, history)
                .map_err(|e| HabitStoreError::DeserializationFailed(e.to_string()))?;
            habits.push(habit);
        }

        habits.sort_by(|a, b| {
            a.created_at()
                .cmp(b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(habits)
    }

    async fn update(&self, habit: &Habit) -> Result<(), HabitStoreError> {
        if !self.record_path(habit.owner_id(), habit.id()).exists() {
            return Err(HabitStoreError::NotFound(*habit.id()));
        }
        self.write_record(habit).await
    }
}
