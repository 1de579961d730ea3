use utoipa::OpenApi;

use crate::routes::{health, message, upload};

#[derive(OpenApi)]
#[openapi(info(
    title = "chatmock-server",
    description = "Mock chat backend: streamed and complete replies, uploads, charts"
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(message::MessageApi::openapi());
    root.merge(upload::UploadApi::openapi());
    root
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_endpoint_is_documented() {
        let doc = get_docs();
        for path in ["/health", "/api/message/stream", "/api/message/fetch", "/api/upload"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
