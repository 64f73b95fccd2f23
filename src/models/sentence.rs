use serde::{Deserialize, Serialize};

/// A single sentence with its position in the source transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    /// Index in the original sentence sequence - stable across all stages
    pub index: usize,
    /// The sentence text, trimmed - immutable once extracted
    pub text: String,
}

impl Sentence {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Normalized form used for exact-duplicate comparison
    pub fn normalized(&self) -> String {
        self.text.trim().to_lowercase()
    }

    /// Number of whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// An ordered, non-empty group of sentences produced by the segmenter
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// Member sentences in original transcript order
    pub sentences: Vec<Sentence>,
}

impl Paragraph {
    /// Build a paragraph, rejecting empty groups
    pub fn new(sentences: Vec<Sentence>) -> Option<Self> {
        if sentences.is_empty() {
            None
        } else {
            Some(Self { sentences })
        }
    }

    /// Joined paragraph text
    pub fn text(&self) -> String {
        let parts: Vec<&str> = self.sentences.iter().map(|s| s.text.as_str()).collect();
        parts.join(" ")
    }

    /// Original index of the earliest member sentence
    pub fn first_index(&self) -> usize {
        self.sentences.first().map(|s| s.index).unwrap_or(0)
    }

    /// Number of sentences in this paragraph
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_normalized() {
        let s = Sentence::new(0, "  The Cat Sat.  ");
        assert_eq!(s.normalized(), "the cat sat.");
    }

    #[test]
    fn test_paragraph_rejects_empty() {
        assert!(Paragraph::new(vec![]).is_none());
    }

    #[test]
    fn test_paragraph_text_and_first_index() {
        let p = Paragraph::new(vec![
            Sentence::new(3, "Second point."),
            Sentence::new(7, "Third point."),
        ])
        .unwrap();
        assert_eq!(p.text(), "Second point. Third point.");
        assert_eq!(p.first_index(), 3);
        assert_eq!(p.len(), 2);
    }
}
