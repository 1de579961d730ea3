//! Reply endpoints: one streams the reply as SSE, the other returns it whole.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chatmock_core::{spawn_reply, FetchBody, ReplyMode};
use tracing::info;
use utoipa::OpenApi;

use crate::error::ApiJson;
use crate::schemas::message::{MessageFile, MessageRequest};
use crate::sse::reply_sse;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(stream_message, fetch_message),
    components(schemas(MessageRequest, MessageFile))
)]
pub struct MessageApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stream", post(stream_message))
        .route("/fetch", post(fetch_message))
}

/// Stream a reply as Server-Sent Events.
///
/// Each frame is `data: <json>`: optional thinking events for `/think`
/// prompts, then text chunks of three words, then `{"complete": true}`.
#[utoipa::path(
    post,
    path = "/api/message/stream",
    tag = "message",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Event stream", content_type = "text/event-stream"),
        (status = 400, description = "Malformed JSON body"),
    )
)]
pub async fn stream_message(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<MessageRequest>,
) -> Response {
    let (text, files) = req.into_parts();
    let reply = state
        .composer
        .compose(ReplyMode::Stream, &text, &files, &mut state.rng());
    info!(
        text_len = text.len(),
        files = files.len(),
        thinking = reply.thinking,
        "streaming reply"
    );

    let events = spawn_reply(reply, Arc::clone(&state.clock), state.timing);
    reply_sse(events).into_response()
}

/// Return the complete reply as one JSON object.
#[utoipa::path(
    post,
    path = "/api/message/fetch",
    tag = "message",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "`{text, imageUrl, thinking?, thinkingMetadata?}`", body = serde_json::Value),
        (status = 400, description = "Malformed JSON body"),
    )
)]
pub async fn fetch_message(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<MessageRequest>,
) -> Json<FetchBody> {
    let (text, files) = req.into_parts();
    let reply = state
        .composer
        .compose(ReplyMode::Fetch, &text, &files, &mut state.rng());
    info!(text_len = text.len(), files = files.len(), "fetch reply");
    Json(reply.into_fetch_body())
}
