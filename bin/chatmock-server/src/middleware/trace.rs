//! Per-request trace id and access logging.
//!
//! JSON bodies with a known size of at most 1 KiB are buffered and logged in
//! both directions. Everything else (larger or unsized JSON, SSE streams,
//! multipart uploads, served files) is passed through unread.

use axum::body::{Body, HttpBody};
use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http_body_util::{BodyExt, Limited};
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::ServerError;

pub static X_TRACE_ID: &str = "x-trace-id";

const MAX_LOGGED_BODY: usize = 1024;

pub async fn trace_middleware(req: Request, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let header_value = HeaderValue::from_str(&trace_id.to_string()).ok();

        let (parts, body) = req.into_parts();
        let body = match log_json_body("request", &parts.headers, body).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "request body could not be read");
                return ServerError::BadRequest("request body could not be read".into())
                    .into_response();
            }
        };
        let mut req = Request::from_parts(parts, body);
        if let Some(v) = &header_value {
            req.headers_mut().insert(X_TRACE_ID, v.clone());
        }

        let response = next.run(req).await;

        let (parts, body) = response.into_parts();
        let mut response = match log_json_body("response", &parts.headers, body).await {
            Ok(body) => Response::from_parts(parts, body),
            Err(e) => ServerError::Internal(format!("response body could not be read: {e}"))
                .into_response(),
        };
        if let Some(v) = header_value {
            response.headers_mut().insert(X_TRACE_ID, v);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );
        response
    }
    .instrument(span)
    .await
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Buffer and log `body` if it is JSON of a known size up to
/// [`MAX_LOGGED_BODY`]; otherwise hand it back unread.
async fn log_json_body(
    direction: &str,
    headers: &HeaderMap,
    body: Body,
) -> Result<Body, Box<dyn std::error::Error + Send + Sync>> {
    if !is_json(headers) {
        return Ok(body);
    }

    // The upper bound comes from `Content-Length` (or the buffered size for
    // responses). Streams without one are never read here.
    match body.size_hint().upper() {
        Some(len) if len <= MAX_LOGGED_BODY as u64 => {}
        len => {
            info!("{direction} body: [skipped: size={len:?}]");
            return Ok(body);
        }
    }

    let bytes = Limited::new(body, MAX_LOGGED_BODY).collect().await?.to_bytes();
    if let Ok(text) = std::str::from_utf8(&bytes) {
        info!("{direction} body: {text}");
    }
    Ok(Body::from(bytes))
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::body::Bytes;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::Router;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    fn app() -> Router {
        Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .route("/ignore", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(trace_middleware))
    }

    #[tokio::test]
    async fn trace_id_is_echoed_back() {
        let id = Uuid::new_v4().to_string();
        let response = app()
            .oneshot(
                Request::post("/echo")
                    .header(X_TRACE_ID, &id)
                    .body(Body::from("x"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[X_TRACE_ID], id.as_str());
    }

    #[tokio::test]
    #[traced_test]
    async fn json_request_bodies_are_logged_and_still_delivered() {
        let response = app()
            .oneshot(
                Request::post("/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"text":"hi"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"text":"hi"}"#);
        assert!(logs_contain(r#"request body: {"text":"hi"}"#));
    }

    #[tokio::test]
    async fn unsized_json_stream_is_never_pulled() {
        let polled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&polled);
        let stream = futures::stream::once(async move {
            flag.store(true, Ordering::SeqCst);
            Ok::<_, std::io::Error>(Bytes::from(vec![b' '; 64 * 1024 * 1024]))
        });

        let response = app()
            .oneshot(
                Request::get("/ignore")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from_stream(stream))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    #[traced_test]
    async fn oversized_json_is_delivered_without_logging() {
        let payload = format!(r#"{{"text":"{}"}}"#, "a".repeat(4 * MAX_LOGGED_BODY));
        let response = app()
            .oneshot(
                Request::post("/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.len(), payload.len());
        assert!(logs_contain("request body: [skipped"));
        assert!(!logs_contain("aaaaaaaa"));
    }
}
