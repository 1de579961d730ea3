//! Per-request reply synthesis: image decision, chart detection, echo text.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{detect_chart_request, render_request, ChartRequest};
use crate::event::ThinkingMetadata;
use crate::thinking;

/// Chance of attaching an image when no image was uploaded.
pub const DEFAULT_IMAGE_PROBABILITY: f64 = 0.3;

const IMAGE_HOST: &str = "https://picsum.photos";

/// Which endpoint the reply is for; only changes the echo wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    Fetch,
    Stream,
}

/// A file the client says it attached to the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedFile {
    #[serde(default)]
    pub name: String,
    /// MIME type as reported by the client, e.g. `image/png`.
    #[serde(rename = "type", default)]
    pub content_type: String,
}

impl AttachedFile {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Everything decided for one reply, before it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub image_url: Option<String>,
    /// Prompt asked for a reasoning trace.
    pub thinking: bool,
    pub chart: Option<ChartRequest>,
}

/// JSON body of the non-streaming endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchBody {
    pub text: String,
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_metadata: Option<ThinkingMetadata>,
}

impl Reply {
    pub fn into_fetch_body(self) -> FetchBody {
        let (thinking, thinking_metadata) = if self.thinking {
            (Some(thinking::full_trace()), Some(thinking::metadata(None)))
        } else {
            (None, None)
        };
        FetchBody {
            text: self.text,
            image_url: self.image_url,
            thinking,
            thinking_metadata,
        }
    }
}

/// Builds replies. Randomness comes from the caller so tests can pin it.
#[derive(Debug, Clone, Copy)]
pub struct Composer {
    image_probability: f64,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_PROBABILITY)
    }
}

impl Composer {
    /// `image_probability` is clamped to `[0, 1]`.
    pub fn new(image_probability: f64) -> Self {
        let image_probability = if image_probability.is_nan() {
            0.0
        } else {
            image_probability.clamp(0.0, 1.0)
        };
        Self { image_probability }
    }

    pub fn image_probability(&self) -> f64 {
        self.image_probability
    }

    pub fn compose<R: Rng + ?Sized>(
        &self,
        mode: ReplyMode,
        text: &str,
        files: &[AttachedFile],
        rng: &mut R,
    ) -> Reply {
        let image_url = if self.wants_image(files, rng) {
            Some(placeholder_image_url(rng))
        } else {
            None
        };

        let chart = detect_chart_request(text);
        let body = match chart {
            Some(request) => render_request(request, text, rng),
            None => echo_text(mode, text, files),
        };

        let reply = Reply {
            text: body,
            image_url,
            thinking: thinking::is_requested(text),
            chart,
        };
        debug!(
            ?mode,
            chart = ?reply.chart,
            image = reply.image_url.is_some(),
            thinking = reply.thinking,
            "reply composed"
        );
        reply
    }

    // An uploaded image always gets one back; otherwise it is a coin flip.
    fn wants_image<R: Rng + ?Sized>(&self, files: &[AttachedFile], rng: &mut R) -> bool {
        files.iter().any(AttachedFile::is_image) || rng.gen_bool(self.image_probability)
    }
}

/// Placeholder image with a random square size in `[200, 300)` and a
/// cache-busting token.
pub fn placeholder_image_url<R: Rng + ?Sized>(rng: &mut R) -> String {
    let size: u32 = rng.gen_range(200..300);
    let token: u32 = rng.r#gen();
    format!("{IMAGE_HOST}/{size}/{size}?random={token}")
}

fn echo_text(mode: ReplyMode, text: &str, files: &[AttachedFile]) -> String {
    let names = if files.is_empty() {
        "None".to_owned()
    } else {
        files
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    match mode {
        ReplyMode::Stream => format!(
            "AI stream response to: \"{text}\". Files received: {names}. This response streams in chunks."
        ),
        ReplyMode::Fetch => format!(
            "AI fetch response to: \"{text}\". Files received: {names}. This is a complete response."
        ),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::chart::ChartKind;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tracing_test::traced_test;

    fn file(name: &str, content_type: &str) -> AttachedFile {
        AttachedFile {
            name: name.into(),
            content_type: content_type.into(),
        }
    }

    fn assert_image_url_shape(url: &str) {
        let rest = url.strip_prefix("https://picsum.photos/").expect("picsum host");
        let (path, token) = rest.split_once("?random=").expect("random token");
        let (w, h) = path.split_once('/').expect("size segments");
        assert_eq!(w, h);
        let size: u32 = w.parse().unwrap();
        assert!((200..300).contains(&size));
        assert!(token.parse::<u32>().is_ok());
    }

    #[test]
    fn echo_lists_files_or_none() {
        let mut rng = StdRng::seed_from_u64(0);
        let composer = Composer::new(0.0);

        let reply = composer.compose(ReplyMode::Stream, "hi", &[], &mut rng);
        assert_eq!(
            reply.text,
            "AI stream response to: \"hi\". Files received: None. This response streams in chunks."
        );

        let files = [file("a.txt", "text/plain"), file("b.pdf", "application/pdf")];
        let reply = composer.compose(ReplyMode::Fetch, "hi", &files, &mut rng);
        assert_eq!(
            reply.text,
            "AI fetch response to: \"hi\". Files received: a.txt, b.pdf. This is a complete response."
        );
        assert!(reply.image_url.is_none());
    }

    #[test]
    fn image_upload_forces_an_image() {
        let mut rng = StdRng::seed_from_u64(0);
        let reply = Composer::new(0.0).compose(
            ReplyMode::Fetch,
            "look",
            &[file("a.png", "image/png")],
            &mut rng,
        );
        assert_image_url_shape(reply.image_url.as_deref().expect("image"));
    }

    #[test]
    fn probability_one_always_attaches_an_image() {
        let mut rng = StdRng::seed_from_u64(99);
        let composer = Composer::new(1.0);
        for _ in 0..20 {
            let reply = composer.compose(ReplyMode::Stream, "x", &[], &mut rng);
            assert_image_url_shape(reply.image_url.as_deref().expect("image"));
        }
    }

    #[test]
    fn stub_rng_pins_the_image_url() {
        let a = placeholder_image_url(&mut StepRng::new(0, 1));
        let b = placeholder_image_url(&mut StepRng::new(0, 1));
        assert_eq!(a, b);
        assert_image_url_shape(&a);
    }

    #[test]
    fn probability_is_clamped() {
        assert_eq!(Composer::new(3.0).image_probability(), 1.0);
        assert_eq!(Composer::new(-1.0).image_probability(), 0.0);
        assert_eq!(Composer::new(f64::NAN).image_probability(), 0.0);
    }

    #[test]
    fn chart_prompt_replaces_echo() {
        let mut rng = StdRng::seed_from_u64(4);
        let reply = Composer::new(0.0).compose(ReplyMode::Stream, "show me a pie chart", &[], &mut rng);
        assert_eq!(reply.chart, Some(ChartRequest::Single(ChartKind::Pie)));
        assert!(reply.text.contains("| name | target | value |"));
        assert!(!reply.text.starts_with("AI stream response"));
    }

    #[test]
    fn showcase_prompt_renders_five_blocks() {
        let mut rng = StdRng::seed_from_u64(4);
        let reply = Composer::new(0.0).compose(ReplyMode::Fetch, "test all charts", &[], &mut rng);
        assert_eq!(reply.chart, Some(ChartRequest::All));
        assert_eq!(reply.text.matches("```chart{").count(), 5);
    }

    #[test]
    fn fetch_body_carries_thinking_only_when_asked() {
        let mut rng = StdRng::seed_from_u64(0);
        let composer = Composer::new(0.0);

        let plain = composer.compose(ReplyMode::Fetch, "hi", &[], &mut rng).into_fetch_body();
        let v = serde_json::to_value(&plain).unwrap();
        assert!(v.get("thinking").is_none());
        assert!(v.get("thinkingMetadata").is_none());
        assert!(v["imageUrl"].is_null());

        let traced = composer
            .compose(ReplyMode::Fetch, "/think hi", &[], &mut rng)
            .into_fetch_body();
        let v = serde_json::to_value(&traced).unwrap();
        assert_eq!(v["thinking"], thinking::full_trace());
        assert_eq!(v["thinkingMetadata"]["backend"], "mock");
        assert!(v["thinkingMetadata"].get("step").is_none());
    }

    #[test]
    #[traced_test]
    fn composition_is_logged() {
        let mut rng = StdRng::seed_from_u64(0);
        Composer::new(0.0).compose(ReplyMode::Stream, "bar chart please", &[], &mut rng);
        assert!(logs_contain("reply composed"));
    }

    #[test]
    fn attached_file_deserialises_client_shape() {
        let f: AttachedFile = serde_json::from_str(r#"{"name":"a.png","type":"image/png"}"#).unwrap();
        assert!(f.is_image());
        let f: AttachedFile = serde_json::from_str(r#"{"name":"notes"}"#).unwrap();
        assert!(!f.is_image());
    }
}
