//! Text chunking for retrieval.
//!
//! Uses the `text-splitter` recursive splitter: it packs the largest semantic
//! units that fit (paragraphs, then sentences, then words, then graphemes)
//! into chunks of at most `chunk_size` characters, overlapping neighbors by up
//! to `chunk_overlap` characters.

use serde::Serialize;
use text_splitter::{Characters, ChunkCapacity, ChunkConfig, TextSplitter};

#[derive(Debug, thiserror::Error)]
#[error("Invalid chunking configuration: {0}")]
pub struct ChunkingError(String);

/// A contiguous slice of the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Position in the chunk sequence
    pub index: usize,
    /// Byte offset of `content` in the source text
    pub offset: usize,
    pub content: String,
}

impl Chunk {
    /// Byte range this chunk covers in the source text
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.content.len()
    }
}

pub struct Chunker {
    splitter: TextSplitter<Characters>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ChunkingError> {
        let config = ChunkConfig::new(ChunkCapacity::new(chunk_size))
            .with_overlap(chunk_overlap)
            .map(|config| config.with_trim(true))
            .map_err(|e| ChunkingError(e.to_string()))?;

        Ok(Self {
            splitter: TextSplitter::new(config),
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into chunks. Empty input yields no chunks.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        self.splitter
            .chunk_indices(text)
            .enumerate()
            .map(|(index, (offset, content))| Chunk {
                index,
                offset,
                content: content.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> String {
        let paragraph = "The applicant completed four years of coursework with a cumulative GPA of 3.85. \
                         She took advanced placement classes in calculus, physics and chemistry. \
                         Her intended major is chemical engineering. \
                         She scored 1490 on the SAT and 34 on the ACT.";
        (0..12)
            .map(|i| format!("Section {i}. {paragraph}"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(Chunker::new(100, 100).is_err());
        assert!(Chunker::new(100, 150).is_err());
        assert!(Chunker::new(100, 20).is_ok());
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        let chunker = Chunker::new(1000, 200).unwrap();
        assert!(chunker.split("").is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunker = Chunker::new(1000, 200).unwrap();
        let chunks = chunker.split("GPA: 3.2. Major: History.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "GPA: 3.2. Major: History.");
        assert_eq!(chunks[0].offset, 0);
    }

    #[test]
    fn test_chunks_respect_size_and_are_deterministic() {
        let chunker = Chunker::new(1000, 200).unwrap();
        let text = sample_document();

        let first = chunker.split(&text);
        let second = chunker.split(&text);

        assert_eq!(first, second);
        assert!(first.len() > 1);
        for chunk in &first {
            assert!(chunk.content.chars().count() <= 1000);
            assert_eq!(&text[chunk.range()], chunk.content);
        }
        for (i, chunk) in first.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_no_text_dropped() {
        let chunker = Chunker::new(300, 60).unwrap();
        let text = sample_document();
        let chunks = chunker.split(&text);

        let mut covered = vec![false; text.len()];
        for chunk in &chunks {
            for i in chunk.range() {
                covered[i] = true;
            }
        }

        for (i, c) in text.char_indices() {
            if !c.is_whitespace() {
                assert!(covered[i], "byte {i} ({c:?}) not covered by any chunk");
            }
        }
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let chunker = Chunker::new(100, 0).unwrap();
        let first = "The applicant lists a weighted GPA of 4.2 from a public high school.";
        let second = "Intended major is listed as economics with a minor in statistics.";
        let text = format!("{first}\n\n{second}");

        let chunks = chunker.split(&text);
        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec![first, second]);
    }
}
