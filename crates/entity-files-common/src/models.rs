//! Data model shared between the store and the HTTP layer.

use serde::Deserialize;
use std::time::Duration;

/// A request for one file belonging to one entity.
///
/// Both identifiers are opaque: nothing here enforces a format. Deserializes
/// directly from the `{entity_id}` / `{file_name}` path segments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileRequest {
    pub entity_id: String,
    pub file_name: String,
}

impl FileRequest {
    pub fn new(entity_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            file_name: file_name.into(),
        }
    }
}

/// A resolved file as handed back by a `FileLookup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub content: Vec<u8>,
    /// Suggested download name.
    pub name: String,
    pub mime_type: String,
}

impl FileRecord {
    pub fn new(content: impl Into<Vec<u8>>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// How long and under which sharing policy a response may be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age_secs: u64,
    /// `false` marks the response `private`: browsers may cache it, shared
    /// caches may not.
    pub cacheable_publicly: bool,
    pub immutable: bool,
}

impl CachePolicy {
    /// Policy applied to every delivered entity file: one hour, private, immutable.
    pub const ENTITY_FILE: Self = Self {
        max_age_secs: 3600,
        cacheable_publicly: false,
        immutable: true,
    };

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

/// Access requirements attached to a route at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteAccess {
    pub requires_auth: bool,
    pub requires_csrf: bool,
    pub public: bool,
}

impl RouteAccess {
    /// Reachable by anyone: no session, no CSRF token.
    pub const PUBLIC: Self = Self {
        requires_auth: false,
        requires_csrf: false,
        public: true,
    };
}
