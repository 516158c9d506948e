use std::ops::Range;

use super::decoder::State;

/// Splits a byte buffer into alternating runs of well-formed text and
/// maximal invalid spans.
///
/// Every chunk holds the valid text up to the next invalid span followed by
/// that whole span, so two broken sequences with nothing valid in between
/// always land in the same chunk.
///
/// # Examples
///
/// ```
/// # use utf8_scrub::Utf8Chunks;
/// let chunks: Vec<_> = Utf8Chunks::new(b"ab\xFF\xC2\xFFcd").collect();
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[0].valid, "ab");
/// assert_eq!(chunks[0].broken, b"\xFF\xC2\xFF");
/// assert_eq!(chunks[1].valid, "cd");
/// assert!(chunks[1].broken.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Utf8Chunks<'a> {
    source: &'a [u8],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Utf8Chunk<'a> {
    // Sequence of valid chars.
    // Can be empty before a span at the start of the buffer.
    pub valid: &'a str,
    // Maximal run of bytes that do not form a code point, empty if none.
    // Empty only for the last chunk.
    pub broken: &'a [u8],
}

impl<'a> Utf8Chunks<'a> {
    pub fn new(bytes: &'a [u8]) -> Utf8Chunks<'a> {
        Utf8Chunks { source: bytes }
    }

    fn split(&mut self, valid_up_to: usize, broken_up_to: usize) -> Utf8Chunk<'a> {
        let source = self.source;
        let (valid, rest) = source.split_at(valid_up_to);
        let (broken, rest) = rest.split_at(broken_up_to - valid_up_to);
        self.source = rest;

        debug_assert!(std::str::from_utf8(valid).is_ok());
        // SAFETY: `valid` ends on a code point boundary and every byte in it was
        // accepted by the decoder, which admits exactly the RFC 3629 sequences.
        let valid = unsafe { std::str::from_utf8_unchecked(valid) };
        Utf8Chunk { valid, broken }
    }
}

impl<'a> Iterator for Utf8Chunks<'a> {
    type Item = Utf8Chunk<'a>;

    fn next(&mut self) -> Option<Utf8Chunk<'a>> {
        if self.source.is_empty() {
            return None;
        }

        let mut state = State::Accept;
        // End of the last complete code point before any broken span.
        let mut boundary = 0;
        // Start of the broken span, once one has been entered.
        let mut broken: Option<usize> = None;
        // Where the code point currently being read started.
        let mut resync = 0;

        for (i, &byte) in self.source.iter().enumerate() {
            let from = state.resume();
            let mut next = from.advance(byte);

            if next == State::Invalid {
                broken.get_or_insert(boundary);
                if from != State::Accept {
                    // The byte that cut the sequence short may start a new one.
                    next = State::Accept.advance(byte);
                    resync = i;
                }
            } else if from == State::Accept {
                resync = i;
            }

            if next == State::Accept {
                // A broken span only ends once a whole code point follows it.
                if let Some(start) = broken {
                    return Some(self.split(start, resync));
                }
                boundary = i + 1;
            }
            state = next;
        }

        // Whatever is left unfinished at the end is broken as well.
        let end = self.source.len();
        let start = broken.unwrap_or(boundary);
        Some(self.split(start, end))
    }
}

/// Byte ranges of every maximal invalid span in `bytes`, in order.
///
/// # Examples
///
/// ```
/// # use utf8_scrub::invalid_spans;
/// let spans: Vec<_> = invalid_spans(b"ok\xC0\x80ok\xE2\x82").collect();
/// assert_eq!(spans, vec![2..4, 6..8]);
/// ```
pub fn invalid_spans(bytes: &[u8]) -> InvalidSpans<'_> {
    InvalidSpans { chunks: Utf8Chunks::new(bytes), offset: 0 }
}

#[derive(Clone, Debug)]
pub struct InvalidSpans<'a> {
    chunks: Utf8Chunks<'a>,
    offset: usize,
}

impl<'a> Iterator for InvalidSpans<'a> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        for chunk in self.chunks.by_ref() {
            let start = self.offset + chunk.valid.len();
            self.offset = start + chunk.broken.len();
            if !chunk.broken.is_empty() {
                return Some(start..self.offset);
            }
        }
        None
    }
}
