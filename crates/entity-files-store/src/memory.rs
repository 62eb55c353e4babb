//! In-memory backend.

use anyhow::Result;
use async_trait::async_trait;
use entity_files_common::models::FileRecord;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::FileLookup;

type Key = (String, String);

/// Files keyed by `(entity_id, file_name)`. Starts empty.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: RwLock<HashMap<Key, FileRecord>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` under `(entity_id, file_name)`, returning the previous one.
    pub fn insert(
        &self,
        entity_id: impl Into<String>,
        file_name: impl Into<String>,
        record: FileRecord,
    ) -> Option<FileRecord> {
        self.files
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert((entity_id.into(), file_name.into()), record)
    }

    pub fn remove(&self, entity_id: &str, file_name: &str) -> Option<FileRecord> {
        self.files
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&(entity_id.to_string(), file_name.to_string()))
    }
}

#[async_trait]
impl FileLookup for MemoryFileStore {
    async fn get_file(&self, entity_id: &str, file_name: &str) -> Result<Option<FileRecord>> {
        let files = self.files.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(files
            .get(&(entity_id.to_string(), file_name.to_string()))
            .cloned())
    }
}
