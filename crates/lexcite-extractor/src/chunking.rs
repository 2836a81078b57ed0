//! Text chunking for large documents
//!
//! Chunks are contiguous slices of the source text, so a position inside a
//! chunk maps back to the document by adding the chunk's character offset.

/// A window of the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Character offset of the chunk's first character in the source
    pub char_offset: usize,
    /// The chunk text
    pub text: &'a str,
}

/// Splits text at paragraph boundaries (blank lines) into windows of at most
/// `max_chars` characters
///
/// Adjacent paragraphs are combined while they fit; a single paragraph longer
/// than the limit is split at the character limit.
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    max_chars: usize,
}

impl TextChunker {
    /// Create a new text chunker
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    /// Chunk the given text
    pub fn chunk<'a>(&self, text: &'a str) -> Vec<Chunk<'a>> {
        if text.chars().count() <= self.max_chars {
            return vec![Chunk { char_offset: 0, text }];
        }

        let mut chunks = Vec::new();
        let (mut start_byte, mut start_char, mut pending) = (0, 0, 0);
        let (mut byte, mut chars) = (0, 0);

        for paragraph in text.split_inclusive("\n\n") {
            let len = paragraph.chars().count();

            if pending > 0 && pending + len > self.max_chars {
                chunks.push(Chunk {
                    char_offset: start_char,
                    text: &text[start_byte..byte],
                });
                start_byte = byte;
                start_char = chars;
                pending = 0;
            }

            if len > self.max_chars {
                chunks.extend(split_at_char_limit(paragraph, chars, self.max_chars));
                start_byte = byte + paragraph.len();
                start_char = chars + len;
            } else {
                pending += len;
            }

            byte += paragraph.len();
            chars += len;
        }

        if pending > 0 {
            chunks.push(Chunk {
                char_offset: start_char,
                text: &text[start_byte..],
            });
        }

        chunks
    }
}

/// Split text into windows of exactly `limit` characters (the last may be shorter)
fn split_at_char_limit(text: &str, base_offset: usize, limit: usize) -> Vec<Chunk<'_>> {
    let mut chunks = Vec::new();
    let (mut start, mut count, mut offset) = (0, 0, base_offset);

    for (idx, _) in text.char_indices() {
        if count == limit {
            chunks.push(Chunk {
                char_offset: offset,
                text: &text[start..idx],
            });
            offset += count;
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if count > 0 {
        chunks.push(Chunk {
            char_offset: offset,
            text: &text[start..],
        });
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every chunk must be the source text at its offset
    fn assert_aligned(text: &str, chunks: &[Chunk<'_>]) {
        let chars: Vec<char> = text.chars().collect();
        for chunk in chunks {
            let len = chunk.text.chars().count();
            let expected: String = chars[chunk.char_offset..chunk.char_offset + len].iter().collect();
            assert_eq!(chunk.text, expected);
        }
        let rebuilt: String = chunks.iter().map(|c| c.text).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_no_chunking_needed_for_small_text() {
        let chunker = TextChunker::new(100);
        let chunks = chunker.chunk("Short text here.");
        assert_eq!(chunks, vec![Chunk { char_offset: 0, text: "Short text here." }]);
    }

    #[test]
    fn test_empty_text() {
        let chunks = TextChunker::new(100).chunk("");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "");
    }

    #[test]
    fn test_chunk_by_paragraph() {
        let chunker = TextChunker::new(50);
        let text = "First paragraph here.\n\nSecond paragraph here.\n\nThird paragraph here.";
        let chunks = chunker.chunk(text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "First paragraph here.\n\nSecond paragraph here.\n\n");
        assert_eq!(chunks[1].char_offset, 47);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 50);
        }
        assert_aligned(text, &chunks);
    }

    #[test]
    fn test_very_long_single_paragraph() {
        let chunker = TextChunker::new(20);
        let text = "a".repeat(100);
        let chunks = chunker.chunk(&text);

        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|c| c.text.len() == 20));
        assert_aligned(&text, &chunks);
    }

    #[test]
    fn test_long_paragraph_between_short_ones() {
        let chunker = TextChunker::new(10);
        let text = format!("abc\n\n{}\n\nxyz", "m".repeat(25));
        let chunks = chunker.chunk(&text);

        assert_eq!(chunks[0].text, "abc\n\n");
        assert_aligned(&text, &chunks);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 10));
    }

    #[test]
    fn test_offsets_count_characters_not_bytes() {
        let chunker = TextChunker::new(9);
        let text = "Société\n\nAcme Ltd";
        let chunks = chunker.chunk(text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].text, "Acme Ltd");
        assert_eq!(chunks[1].char_offset, 9);
        assert_aligned(text, &chunks);
    }
}
