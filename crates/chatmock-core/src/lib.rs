//! chatmock-core – reply synthesis for the mock chat backend.
//!
//! Nothing in here talks HTTP. The server crate feeds request text and file
//! descriptors into a [`Composer`], then either returns the [`Reply`] as one
//! JSON body or hands it to [`spawn_reply`] to get a paced stream of
//! [`StreamEvent`]s.

pub mod chart;
pub mod chunk;
pub mod clock;
pub mod compose;
pub mod event;
pub mod stream;
pub mod thinking;

pub use chunk::{chunk_words, WordChunks, DEFAULT_WORDS_PER_CHUNK};
pub use clock::{Clock, NoDelayClock, SystemClock};
pub use compose::{AttachedFile, Composer, FetchBody, Reply, ReplyMode};
pub use event::{StreamEvent, ThinkingMetadata};
pub use stream::{spawn_reply, StreamTiming};
