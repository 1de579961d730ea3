//! Canned reasoning trace shown before the answer when the prompt asks for it.

use crate::event::{StreamEvent, ThinkingMetadata};

/// Substring that switches the thinking phase on.
pub const THINKING_TRIGGER: &str = "/think";

pub const THINKING_BACKEND: &str = "mock";
pub const THINKING_FORMAT: &str = "markdown";

/// Fragments emitted in order, one event each.
pub const REASONING_STEPS: [&str; 7] = [
    "Reading the request and pulling out what is actually being asked.\n\n",
    "Checking whether any attached files change the answer.\n\n",
    "Looking for chart or data keywords in the prompt.\n\n",
    "Sketching the structure of the reply.\n\n",
    "Picking examples that keep the reply short.\n\n",
    "Double-checking the draft against the original question.\n\n",
    "Ready to write the final answer.\n\n",
];

pub fn is_requested(text: &str) -> bool {
    text.contains(THINKING_TRIGGER)
}

/// Reasoning events for a stream: one per step, then the closing event.
pub fn thinking_events() -> impl Iterator<Item = StreamEvent> {
    REASONING_STEPS
        .iter()
        .zip(1u32..)
        .map(|(fragment, step)| StreamEvent::Thinking {
            thinking: (*fragment).to_owned(),
            thinking_complete: false,
            metadata: metadata(Some(step)),
        })
        .chain(std::iter::once(StreamEvent::Thinking {
            thinking: String::new(),
            thinking_complete: true,
            metadata: metadata(None),
        }))
}

/// The whole trace in one string, for non-streaming replies.
pub fn full_trace() -> String {
    REASONING_STEPS.concat()
}

pub fn metadata(step: Option<u32>) -> ThinkingMetadata {
    ThinkingMetadata {
        backend: THINKING_BACKEND.to_owned(),
        format: THINKING_FORMAT.to_owned(),
        step,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn trigger_is_a_plain_substring_match() {
        assert!(is_requested("/think about this"));
        assert!(is_requested("please /thinkhard"));
        assert!(!is_requested("think about this"));
        assert!(!is_requested("/THINK"));
    }

    #[test]
    fn seven_numbered_steps_then_one_closing_event() {
        let events: Vec<_> = thinking_events().collect();
        assert_eq!(events.len(), 8);

        for (i, ev) in events[..7].iter().enumerate() {
            match ev {
                StreamEvent::Thinking {
                    thinking,
                    thinking_complete,
                    metadata,
                } => {
                    assert!(!thinking.is_empty());
                    assert!(!thinking_complete);
                    assert_eq!(metadata.step, Some(i as u32 + 1));
                }
                other => panic!("unexpected event {other:?}"),
            }
        }

        match &events[7] {
            StreamEvent::Thinking {
                thinking,
                thinking_complete,
                metadata,
            } => {
                assert!(thinking.is_empty());
                assert!(thinking_complete);
                assert_eq!(metadata.step, None);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn full_trace_contains_every_step() {
        let trace = full_trace();
        for step in REASONING_STEPS {
            assert!(trace.contains(step));
        }
    }
}
