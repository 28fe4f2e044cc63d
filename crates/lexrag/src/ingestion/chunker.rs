//! Text chunking with separator priority and overlap

use std::collections::VecDeque;

use crate::types::{Chunk, Document};

/// Separator cascade: paragraph breaks, then line breaks, then spaces.
/// Single characters are the last resort when no separator applies.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Splits document text into size-bounded chunks with overlap
///
/// Splitting is greedy and separator-prioritized: paragraphs are kept
/// whole where possible, then lines, then words. Separators stay attached
/// to the preceding piece and chunk spans are tracked in char offsets, so
/// concatenating chunks with their overlaps removed reproduces the
/// document text exactly. Sizes are measured in Unicode scalar values.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    ///
    /// The overlap is clamped below `chunk_size` so merging always makes
    /// forward progress.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Chunk a document
    ///
    /// Empty or whitespace-only documents produce zero chunks. The same
    /// document and configuration always yield the same chunk sequence.
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        self.chunk_text(&doc.text)
            .into_iter()
            .enumerate()
            .map(|(i, (start, end, text))| Chunk::new(doc, text, i as u32, start, end))
            .collect()
    }

    /// Split text into (char_start, char_end, text) spans
    fn chunk_text(&self, text: &str) -> Vec<(usize, usize, String)> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let mut segments = Vec::new();
        self.split_segments(&chars, 0, chars.len(), 0, &mut segments);
        self.merge_segments(&chars, &segments)
    }

    /// Recursively split `chars[start..end]` into segments no longer than
    /// `chunk_size`, trying separators in priority order
    ///
    /// Pieces that still exceed the limit are re-split with the next
    /// separator; past the last separator the piece degrades to single
    /// characters, which merging reassembles into bounded chunks.
    fn split_segments(
        &self,
        chars: &[char],
        start: usize,
        end: usize,
        level: usize,
        out: &mut Vec<(usize, usize)>,
    ) {
        if start == end {
            return;
        }
        if end - start <= self.chunk_size {
            out.push((start, end));
            return;
        }
        if level >= SEPARATORS.len() {
            out.extend((start..end).map(|i| (i, i + 1)));
            return;
        }

        let separator: Vec<char> = SEPARATORS[level].chars().collect();
        let pieces = split_keeping_separator(chars, start, end, &separator);

        if pieces.len() == 1 {
            // Separator not present in this stretch; try the next one.
            self.split_segments(chars, start, end, level + 1, out);
            return;
        }

        for (s, e) in pieces {
            if e - s <= self.chunk_size {
                out.push((s, e));
            } else {
                self.split_segments(chars, s, e, level + 1, out);
            }
        }
    }

    /// Greedily merge contiguous segments into chunks of at most
    /// `chunk_size` chars, carrying up to `chunk_overlap` trailing chars
    /// of each chunk into the next
    fn merge_segments(
        &self,
        chars: &[char],
        segments: &[(usize, usize)],
    ) -> Vec<(usize, usize, String)> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(usize, usize)> = VecDeque::new();
        let mut window_len = 0usize;

        for &(s, e) in segments {
            let seg_len = e - s;

            if window_len > 0 && window_len + seg_len > self.chunk_size {
                chunks.push(emit(chars, &window));

                // Drop leading segments until what remains fits as overlap
                // and leaves room for the incoming segment.
                while window_len > self.chunk_overlap
                    || (window_len > 0 && window_len + seg_len > self.chunk_size)
                {
                    match window.pop_front() {
                        Some((fs, fe)) => window_len -= fe - fs,
                        None => break,
                    }
                }
            }

            window.push_back((s, e));
            window_len += seg_len;
        }

        if window_len > 0 {
            chunks.push(emit(chars, &window));
        }

        chunks
    }
}

/// Materialize the window's contiguous span as a chunk
fn emit(chars: &[char], window: &VecDeque<(usize, usize)>) -> (usize, usize, String) {
    let start = window.front().map_or(0, |w| w.0);
    let end = window.back().map_or(start, |w| w.1);
    let text: String = chars[start..end].iter().collect();
    (start, end, text)
}

/// Split `chars[start..end]` at each separator occurrence, keeping the
/// separator attached to the preceding piece
fn split_keeping_separator(
    chars: &[char],
    start: usize,
    end: usize,
    separator: &[char],
) -> Vec<(usize, usize)> {
    let mut pieces = Vec::new();
    let mut piece_start = start;
    let mut i = start;

    while i + separator.len() <= end {
        if chars[i..i + separator.len()] == *separator {
            let piece_end = i + separator.len();
            pieces.push((piece_start, piece_end));
            piece_start = piece_end;
            i = piece_end;
        } else {
            i += 1;
        }
    }

    if piece_start < end {
        pieces.push((piece_start, end));
    }

    pieces
}
