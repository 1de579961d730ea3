//! Paced producer behind the streaming endpoint.
//!
//! A reply is walked through `INIT → THINKING* → CONTENT+ → DONE`: the
//! optional reasoning trace, then the text in word chunks, then exactly one
//! `{complete: true}`. Every unit is preceded by a pause on the injected
//! [`Clock`], which is what makes the mock feel like a model generating.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendError;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, trace};

use crate::chunk::{chunk_words, DEFAULT_WORDS_PER_CHUNK};
use crate::clock::Clock;
use crate::compose::Reply;
use crate::event::StreamEvent;
use crate::thinking;

/// The image rides on the first content chunk longer than this many characters.
pub const IMAGE_MIN_CHUNK_CHARS: usize = 10;

/// Pauses between stream units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamTiming {
    pub chunk_delay: Duration,
    pub thinking_step_delay: Duration,
    pub thinking_done_delay: Duration,
    pub words_per_chunk: NonZeroUsize,
}

impl Default for StreamTiming {
    fn default() -> Self {
        Self {
            chunk_delay: Duration::from_millis(100),
            thinking_step_delay: Duration::from_millis(300),
            thinking_done_delay: Duration::from_millis(200),
            words_per_chunk: DEFAULT_WORDS_PER_CHUNK,
        }
    }
}

/// Start producing `reply` in a background task and return its events.
///
/// The channel holds a single event, so the producer never runs ahead of
/// the transport. Dropping the returned stream (client went away) makes the
/// next send fail and the task stops quietly.
pub fn spawn_reply(
    reply: Reply,
    clock: Arc<dyn Clock>,
    timing: StreamTiming,
) -> ReceiverStream<StreamEvent> {
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        match emit(reply, clock.as_ref(), timing, &tx).await {
            Ok(sent) => debug!(events = sent, "reply stream finished"),
            Err(_) => debug!("receiver dropped; abandoning reply stream"),
        }
    });

    ReceiverStream::new(rx)
}

async fn emit(
    reply: Reply,
    clock: &dyn Clock,
    timing: StreamTiming,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<usize, SendError<StreamEvent>> {
    let mut sent = 0usize;

    if reply.thinking {
        for event in thinking::thinking_events() {
            let delay = match &event {
                StreamEvent::Thinking {
                    thinking_complete: true,
                    ..
                } => timing.thinking_done_delay,
                _ => timing.thinking_step_delay,
            };
            clock.sleep(delay).await;
            tx.send(event).await?;
            sent += 1;
        }
        trace!("thinking phase done");
    }

    let mut pending_image = reply.image_url;
    for chunk in chunk_words(&reply.text, timing.words_per_chunk) {
        clock.sleep(timing.chunk_delay).await;
        let image_url = if chunk.chars().count() > IMAGE_MIN_CHUNK_CHARS {
            pending_image.take()
        } else {
            None
        };
        tx.send(StreamEvent::content(chunk, image_url)).await?;
        sent += 1;
    }

    tx.send(StreamEvent::Complete).await?;
    Ok(sent + 1)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
