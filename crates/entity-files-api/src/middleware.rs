//! Middleware — security headers.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Add defensive security headers to every HTTP response.
///
/// Headers applied:
/// - `X-Content-Type-Options: nosniff` — browsers must honour the declared MIME type of a download
/// - `X-Frame-Options: DENY` — prevents clickjacking
/// - `Referrer-Policy: strict-origin-when-cross-origin`
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let h = response.headers_mut();

    h.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    h.insert(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    h.insert(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
