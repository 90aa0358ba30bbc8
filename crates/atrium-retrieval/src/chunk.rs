//! Text segmentation
//!
//! The chunker is a collaborator seam: the pipeline only requires
//! something that turns a body of text into embedding-sized pieces.

/// Splits text into chunks suitable for embedding.
pub trait TextChunker: Send + Sync {
    fn chunk(&self, text: &str) -> Vec<String>;
}

/// Paragraph-based chunker with a size ceiling.
///
/// Paragraphs (blank-line separated) are packed greedily into chunks of
/// at most `max_chars`; a single oversized paragraph is split on char
/// boundaries.
pub struct ParagraphChunker {
    pub max_chars: usize,
}

impl Default for ParagraphChunker {
    fn default() -> Self {
        Self { max_chars: 1000 }
    }
}

impl ParagraphChunker {
    fn split_oversized(&self, paragraph: &str, out: &mut Vec<String>) {
        let chars: Vec<char> = paragraph.chars().collect();
        for window in chars.chunks(self.max_chars) {
            out.push(window.iter().collect());
        }
    }
}

impl TextChunker for ParagraphChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            if paragraph.chars().count() > self.max_chars {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                self.split_oversized(paragraph, &mut chunks);
                continue;
            }
            if !current.is_empty()
                && current.chars().count() + paragraph.chars().count() + 2 > self.max_chars
            {
                chunks.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push_str("\n\n");
            }
            current.push_str(paragraph);
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}
