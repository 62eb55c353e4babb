//! Entity file delivery.
//!
//! [`EntityFileEndpoint::deliver`] turns a lookup result into a
//! [`DeliveryResponse`]: a binary download with caching headers, or an empty
//! 404. A missing file is an ordinary response, not an error; only a fault
//! inside the lookup surfaces as [`AppError`].

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::headers::{CacheControl, ContentLength, Expires, HeaderMapExt};
use entity_files_common::error::{AppError, AppResult};
use entity_files_common::models::{CachePolicy, FileRecord};
use entity_files_store::{FileLookup, OCTET_STREAM};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::sync::Arc;
use std::time::SystemTime;

/// RFC 5987 `attr-char`: everything else is percent-encoded in `filename*`.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Outcome of a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResponse {
    Found {
        content: Vec<u8>,
        name: String,
        mime_type: String,
        cache: CachePolicy,
    },
    NotFound,
}

impl DeliveryResponse {
    /// Wrap a looked-up record with the entity file cache policy.
    pub fn found(record: FileRecord) -> Self {
        Self::Found {
            content: record.content,
            name: record.name,
            mime_type: record.mime_type,
            cache: CachePolicy::ENTITY_FILE,
        }
    }
}

/// Resolves entity files through an injected [`FileLookup`].
#[derive(Clone)]
pub struct EntityFileEndpoint {
    lookup: Arc<dyn FileLookup>,
}

impl EntityFileEndpoint {
    pub fn new(lookup: Arc<dyn FileLookup>) -> Self {
        Self { lookup }
    }

    pub async fn deliver(&self, entity_id: &str, file_name: &str) -> AppResult<DeliveryResponse> {
        // Caller ids go into structured fields only, never into message text.
        let record = match self.lookup.get_file(entity_id, file_name).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(
                    entity_id,
                    file_name,
                    error = %format!("{e:#}"),
                    "File lookup failed"
                );
                return Err(AppError::Storage(e));
            }
        };

        match record {
            Some(record) => {
                tracing::debug!(entity_id, file_name, size = record.content.len(), "Delivering entity file");
                Ok(DeliveryResponse::found(record))
            }
            None => {
                tracing::debug!(entity_id, file_name, "Entity file not found");
                Ok(DeliveryResponse::NotFound)
            }
        }
    }
}

/// `Cache-Control` equivalent of `policy`.
pub fn cache_control(policy: &CachePolicy) -> CacheControl {
    let cc = CacheControl::new().with_max_age(policy.max_age());
    let cc = if policy.cacheable_publicly {
        cc.with_public()
    } else {
        cc.with_private()
    };
    if policy.immutable { cc.with_immutable() } else { cc }
}

/// `attachment` disposition carrying both an ASCII `filename` and the exact
/// UTF-8 name in `filename*`.
pub fn content_disposition(name: &str) -> HeaderValue {
    let fallback: String = name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded = utf8_percent_encode(name, ATTR_CHAR);

    HeaderValue::from_str(&format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

impl IntoResponse for DeliveryResponse {
    fn into_response(self) -> Response {
        match self {
            DeliveryResponse::NotFound => StatusCode::NOT_FOUND.into_response(),
            DeliveryResponse::Found {
                content,
                name,
                mime_type,
                cache,
            } => {
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_str(&mime_type)
                        .unwrap_or_else(|_| HeaderValue::from_static(OCTET_STREAM)),
                );
                headers.insert(header::CONTENT_DISPOSITION, content_disposition(&name));
                headers.typed_insert(ContentLength(content.len() as u64));
                headers.typed_insert(cache_control(&cache));
                headers.typed_insert(Expires::from(SystemTime::now() + cache.max_age()));

                (StatusCode::OK, headers, Body::from(content)).into_response()
            }
        }
    }
}
