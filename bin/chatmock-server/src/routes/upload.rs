//! File uploads.
//!
//! Files are stored flat in the upload directory as `<unix_secs>_<name>` and
//! served back under `/api/files/`. Two uploads with the same name in the
//! same second land on the same path; the later one wins.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use tracing::{info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::ServerError;
use crate::schemas::upload::UploadedFile;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(OpenApi)]
#[openapi(paths(upload_file), components(schemas(UploadedFile)))]
pub struct UploadApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/upload", post(upload_file))
}

struct FilePart {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

/// Store one file from the multipart field `file`.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "upload",
    request_body(content_type = "multipart/form-data", description = "Multipart form with a `file` field"),
    responses(
        (status = 200, description = "File stored", body = UploadedFile),
        (status = 400, description = "Missing file, empty name or disallowed type"),
        (status = 413, description = "File exceeds the maximum upload size"),
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadedFile>, ServerError> {
    let part = read_file_part(&mut multipart)
        .await?
        .ok_or_else(|| ServerError::BadRequest("No file part in the request".into()))?;

    if part.file_name.is_empty() {
        return Err(ServerError::BadRequest("No file selected".into()));
    }

    let name = sanitize_filename(&part.file_name);
    if !state.config.is_allowed_file(&name) {
        return Err(ServerError::BadRequest("File type not allowed".into()));
    }

    let stored = stored_name(state.clock.now().timestamp(), &name);
    let path = state.config.upload_dir.join(&stored);
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        warn!(file = %stored, "same name uploaded twice within one second; overwriting");
    }

    tokio::fs::write(&path, &part.data).await?;
    let size = tokio::fs::metadata(&path).await?.len();
    info!(file = %stored, size, "upload stored");

    Ok(Json(UploadedFile {
        id: Uuid::new_v4(),
        name,
        content_type: part.content_type,
        size,
        url: format!("/api/files/{stored}"),
    }))
}

/// First field named `file`, fully read. Other fields are skipped.
async fn read_file_part(multipart: &mut Multipart) -> Result<Option<FilePart>, ServerError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let content_type = field.content_type().map(str::to_owned);
        let data = field.bytes().await?;
        return Ok(Some(FilePart {
            file_name,
            content_type,
            data,
        }));
    }
    Ok(None)
}

pub fn stored_name(unix_secs: i64, name: &str) -> String {
    format!("{unix_secs}_{name}")
}

/// Reduce a client-supplied file name to a safe, flat ASCII name.
///
/// Path separators become word breaks, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped, and leading/trailing `.` and `_` are
/// trimmed. `../../etc/passwd` becomes `etc_passwd`.
pub fn sanitize_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_owned()
}
