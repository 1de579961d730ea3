use chatmock_core::AttachedFile;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A file previously uploaded and now attached to a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MessageFile {
    #[serde(default)]
    pub name: String,
    /// MIME type, e.g. `image/png`. Image types always get an image back.
    #[serde(rename = "type", default)]
    pub content_type: String,
}

impl From<MessageFile> for AttachedFile {
    fn from(f: MessageFile) -> Self {
        AttachedFile {
            name: f.name,
            content_type: f.content_type,
        }
    }
}

/// Body of `POST /api/message/stream` and `POST /api/message/fetch`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MessageRequest {
    /// The user's message. Contains `/think` to request a reasoning trace.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub files: Vec<MessageFile>,
}

impl MessageRequest {
    pub fn into_parts(self) -> (String, Vec<AttachedFile>) {
        (self.text, self.files.into_iter().map(Into::into).collect())
    }
}
