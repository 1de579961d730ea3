//! Word-group chunking for simulated token streaming.

use std::num::NonZeroUsize;

/// Words per chunk used by the streaming endpoint.
pub const DEFAULT_WORDS_PER_CHUNK: NonZeroUsize = match NonZeroUsize::new(3) {
    Some(n) => n,
    None => unreachable!(),
};

/// Split `text` into groups of `words_per_chunk` space-separated words.
///
/// Words are the pieces between single ASCII spaces, so runs of spaces
/// produce empty words and survive the split. Every chunk except the last
/// keeps its trailing space: concatenating all chunks gives back `text`
/// byte for byte. Empty input yields no chunks.
pub fn chunk_words(text: &str, words_per_chunk: NonZeroUsize) -> WordChunks<'_> {
    WordChunks {
        rest: (!text.is_empty()).then_some(text),
        words_per_chunk: words_per_chunk.get(),
    }
}

/// Lazy iterator returned by [`chunk_words`].
#[derive(Debug, Clone)]
pub struct WordChunks<'a> {
    /// Unconsumed tail; `None` once the last chunk has been produced.
    rest: Option<&'a str>,
    words_per_chunk: usize,
}

impl<'a> Iterator for WordChunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;

        // The n-th separator closes the chunk and stays attached to it.
        match rest.match_indices(' ').nth(self.words_per_chunk - 1) {
            Some((idx, _)) => {
                let (chunk, tail) = rest.split_at(idx + 1);
                self.rest = Some(tail);
                Some(chunk)
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

impl std::iter::FusedIterator for WordChunks<'_> {}

// ── Tests ──────────────────────────────────────────────────────────────────────
