//! Units written onto the SSE stream.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Describes where a reasoning fragment came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThinkingMetadata {
    pub backend: String,
    pub format: String,
    /// 1-based position in the reasoning trace; absent on the closing event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
}

/// One emission on a reply stream.
///
/// Serialises to the flat JSON shapes the web client expects:
/// `{text, imageUrl}`, `{thinking, thinkingComplete, thinkingMetadata}` or
/// `{complete: true}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Content {
        text: String,
        image_url: Option<String>,
    },
    Thinking {
        thinking: String,
        thinking_complete: bool,
        metadata: ThinkingMetadata,
    },
    Complete,
}

impl StreamEvent {
    pub fn content(text: impl Into<String>, image_url: Option<String>) -> Self {
        StreamEvent::Content {
            text: text.into(),
            image_url,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, StreamEvent::Complete)
    }
}

impl Serialize for StreamEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StreamEvent::Content { text, image_url } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("text", text)?;
                map.serialize_entry("imageUrl", image_url)?;
                map.end()
            }
            StreamEvent::Thinking {
                thinking,
                thinking_complete,
                metadata,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("thinking", thinking)?;
                map.serialize_entry("thinkingComplete", thinking_complete)?;
                map.serialize_entry("thinkingMetadata", metadata)?;
                map.end()
            }
            StreamEvent::Complete => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("complete", &true)?;
                map.end()
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_keeps_null_image_url() {
        let v = serde_json::to_value(StreamEvent::content("hi ", None)).unwrap();
        assert_eq!(v, json!({ "text": "hi ", "imageUrl": null }));
    }

    #[test]
    fn thinking_uses_camel_case_keys() {
        let ev = StreamEvent::Thinking {
            thinking: "step".into(),
            thinking_complete: false,
            metadata: ThinkingMetadata {
                backend: "mock".into(),
                format: "markdown".into(),
                step: Some(2),
            },
        };
        let v = serde_json::to_value(ev).unwrap();
        assert_eq!(v["thinkingComplete"], false);
        assert_eq!(v["thinkingMetadata"]["step"], 2);
        assert_eq!(v["thinkingMetadata"]["backend"], "mock");
    }

    #[test]
    fn complete_marker_is_a_single_key() {
        let text = serde_json::to_string(&StreamEvent::Complete).unwrap();
        assert_eq!(text, r#"{"complete":true}"#);
    }
}
