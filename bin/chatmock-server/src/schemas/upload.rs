use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Metadata returned for a stored upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadedFile {
    pub id: Uuid,
    /// Sanitised original name, without the timestamp prefix.
    pub name: String,
    /// Content type sent with the multipart field, if any.
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// Size in bytes as written to disk.
    pub size: u64,
    /// Where the file can be fetched again, e.g. `/api/files/1700000000_a.png`.
    pub url: String,
}
