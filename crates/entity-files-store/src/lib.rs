//! # entity-files-store
//!
//! Resolves `(entity_id, file_name)` pairs to file bytes and metadata.
//! Backends:
//! - **local** — a directory tree, `<root>/<entity_id>/<file_name>`
//! - **s3** — an S3-compatible bucket (MinIO, AWS, ...)
//! - **memory** — a process-local map, for tests and development

pub mod local;
pub mod memory;
pub mod s3;

use anyhow::Result;
use async_trait::async_trait;
use entity_files_common::config::{StorageBackend, StorageConfig};
use entity_files_common::models::FileRecord;
use std::sync::Arc;

pub use local::LocalFileStore;
pub use memory::MemoryFileStore;
pub use s3::S3FileStore;

/// Fallback MIME type when nothing better is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Identifiers longer than this are never resolved.
const MAX_IDENTIFIER_LEN: usize = 255;

/// Looks up a file belonging to an entity.
///
/// Callers pass raw, untrusted strings. Implementations must return
/// `Ok(None)` for anything that does not resolve to a file (including
/// identifiers they refuse to use) and reserve `Err` for storage faults.
#[async_trait]
pub trait FileLookup: Send + Sync {
    async fn get_file(&self, entity_id: &str, file_name: &str) -> Result<Option<FileRecord>>;
}

/// Whether `id` can be used as a single path segment or key component.
pub fn is_acceptable_identifier(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_IDENTIFIER_LEN
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && !id.chars().any(char::is_control)
}

/// MIME type inferred from the file name's extension.
pub fn guess_mime(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_raw()
        .unwrap_or(OCTET_STREAM)
        .to_string()
}

/// Build the lookup selected by `storage.backend`.
pub fn build(cfg: &StorageConfig) -> Result<Arc<dyn FileLookup>> {
    let lookup: Arc<dyn FileLookup> = match cfg.backend {
        StorageBackend::Local => Arc::new(LocalFileStore::new(&cfg.data_dir)),
        StorageBackend::S3 => Arc::new(S3FileStore::new(cfg)?),
        StorageBackend::Memory => Arc::new(MemoryFileStore::new()),
    };
    Ok(lookup)
}
