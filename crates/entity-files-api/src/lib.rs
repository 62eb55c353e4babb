//! # entity-files-api
//!
//! HTTP layer for entity-files: the public file download endpoint, a health
//! check, and the middleware stack around them.

pub mod endpoint;
pub mod middleware;
pub mod routes;

use axum::Router;
use entity_files_common::error::AppError;
use entity_files_store::FileLookup;
use std::sync::Arc;
use std::time::Instant;

use endpoint::EntityFileEndpoint;

/// Prefix every API route is nested under.
pub const API_PREFIX: &str = "/api/v1";

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub files: EntityFileEndpoint,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(lookup: Arc<dyn FileLookup>) -> Self {
        Self {
            files: EntityFileEndpoint::new(lookup),
            started_at: Instant::now(),
        }
    }
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Downloads stay uncompressed: they keep their Content-Length and the
    // stored bytes go out as-is. JSON routes compress themselves.
    let api_routes = Router::new()
        .merge(routes::files::router())
        .merge(routes::health::router());

    Router::new()
        .nest(API_PREFIX, api_routes)
        .fallback(route_not_found)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn route_not_found() -> AppError {
    AppError::NotFound {
        resource: "Route".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use entity_files_common::models::{FileRecord, RouteAccess};
    use entity_files_store::MemoryFileStore;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct BrokenLookup;

    #[async_trait]
    impl FileLookup for BrokenLookup {
        async fn get_file(&self, _: &str, _: &str) -> anyhow::Result<Option<FileRecord>> {
            anyhow::bail!("connection refused")
        }
    }

    fn app() -> Router {
        let store = MemoryFileStore::new();
        store.insert(
            "entity-1",
            "report.pdf",
            FileRecord::new(b"%PDF-1.4...".to_vec(), "report.pdf", "application/pdf"),
        );
        store.insert(
            "entity 1",
            "résumé.txt",
            FileRecord::new(b"hello".to_vec(), "résumé.txt", "text/plain"),
        );
        build_router(AppState::new(Arc::new(store)))
    }

    async fn send(app: Router, method: Method, uri: &str) -> (Response, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        call(app, request).await
    }

    async fn call(app: Router, request: Request<Body>) -> (Response, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes().to_vec();
        (Response::from_parts(parts, Body::empty()), bytes)
    }

    #[tokio::test]
    async fn serves_found_file() {
        let (response, body) = send(app(), Method::GET, "/api/v1/entities/entity-1/files/report.pdf").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body, b"%PDF-1.4...");
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert!(
            headers[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .starts_with("attachment; filename=\"report.pdf\"")
        );

        let cache_control = headers[header::CACHE_CONTROL].to_str().unwrap();
        let mut directives: Vec<&str> = cache_control.split(',').map(str::trim).collect();
        directives.sort_unstable();
        assert_eq!(directives, ["immutable", "max-age=3600", "private"]);

        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["referrer-policy"], "strict-origin-when-cross-origin");
    }

    #[tokio::test]
    async fn downloads_are_never_recompressed() {
        let payload = vec![b'a'; 4096];
        let store = MemoryFileStore::new();
        store.insert("e", "big.txt", FileRecord::new(payload.clone(), "big.txt", "text/plain"));
        let app = build_router(AppState::new(Arc::new(store)));

        for method in [Method::GET, Method::HEAD] {
            let request = Request::builder()
                .method(method.clone())
                .uri("/api/v1/entities/e/files/big.txt")
                .header(header::ACCEPT_ENCODING, "gzip, deflate, br")
                .body(Body::empty())
                .unwrap();
            let (response, body) = call(app.clone(), request).await;

            assert_eq!(response.status(), StatusCode::OK);
            assert!(!response.headers().contains_key(header::CONTENT_ENCODING));
            assert_eq!(response.headers()[header::CONTENT_LENGTH], "4096");
            if method == Method::GET {
                assert_eq!(body, payload);
            } else {
                assert!(body.is_empty());
            }
        }
    }

    #[tokio::test]
    async fn missing_file_is_empty_404() {
        let (response, body) = send(app(), Method::GET, "/api/v1/entities/entity-404/files/missing.txt").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body.is_empty());
        assert!(!response.headers().contains_key(header::CACHE_CONTROL));
    }

    #[tokio::test]
    async fn path_segments_are_percent_decoded() {
        let (response, body) = send(
            app(),
            Method::GET,
            "/api/v1/entities/entity%201/files/r%C3%A9sum%C3%A9.txt",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body, b"hello");
        assert!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .ends_with("filename*=UTF-8''r%C3%A9sum%C3%A9.txt")
        );
    }

    #[tokio::test]
    async fn head_returns_headers_without_body() {
        let (response, body) = send(app(), Method::HEAD, "/api/v1/entities/entity-1/files/report.pdf").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "11");
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn storage_fault_is_500_not_404() {
        let app = build_router(AppState::new(Arc::new(BrokenLookup)));
        let (response, body) = send(app, Method::GET, "/api/v1/entities/entity-1/files/report.pdf").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 500);
        assert_eq!(json["error"], "STORAGE_ERROR");
        assert_eq!(json["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let (response, body) = send(app(), Method::GET, "/api/v1/nothing-here").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (response, body) = send(app(), Method::GET, "/api/v1/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn file_route_is_public() {
        let entry = routes::registry()
            .find(|r| r.path == "/entities/{entity_id}/files/{file_name}")
            .expect("file route registered");

        assert_eq!(entry.methods, ["GET", "HEAD"]);
        assert_eq!(
            entry.access,
            RouteAccess {
                requires_auth: false,
                requires_csrf: false,
                public: true,
            }
        );
    }
}
