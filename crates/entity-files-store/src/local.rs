//! Local directory backend.
//!
//! Files live at `<root>/<entity_id>/<file_name>`. Used when running without
//! S3/MinIO.

use anyhow::{Context, Result};
use async_trait::async_trait;
use entity_files_common::models::FileRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{FileLookup, guess_mime, is_acceptable_identifier};

#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Resolve the on-disk path, or `None` if either identifier could escape
    /// its directory.
    fn resolve(&self, entity_id: &str, file_name: &str) -> Option<PathBuf> {
        if !is_acceptable_identifier(entity_id) || !is_acceptable_identifier(file_name) {
            return None;
        }
        Some(self.root.join(entity_id).join(file_name))
    }
}

fn is_absent(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::NotFound | ErrorKind::NotADirectory)
}

#[async_trait]
impl FileLookup for LocalFileStore {
    async fn get_file(&self, entity_id: &str, file_name: &str) -> Result<Option<FileRecord>> {
        let Some(path) = self.resolve(entity_id, file_name) else {
            tracing::debug!(entity_id, file_name, "Rejected file identifiers");
            return Ok(None);
        };

        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if is_absent(e.kind()) => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to stat {}", path.display()));
            }
        };
        if !meta.is_file() {
            return Ok(None);
        }

        // The file can disappear between stat and read.
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if is_absent(e.kind()) => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        Ok(Some(FileRecord {
            content,
            name: file_name.to_string(),
            mime_type: guess_mime(file_name),
        }))
    }
}
