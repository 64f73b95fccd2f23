use serde::{Deserialize, Serialize};

use super::{Paragraph, Sentence};

/// Terminal pipeline unit: a body of text with a heading and optional
/// speaker/time metadata. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Unique identifier for this segment (UUID)
    pub segment_id: String,
    /// Body text - a paragraph's joined text, or a single sentence in
    /// diarized mode
    pub text: String,
    /// Heading - always non-empty, the labeler guarantees a fallback
    pub heading: String,
    /// Speaker label, present only in diarized mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// Estimated start time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_secs: Option<f64>,
    /// Estimated end time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_secs: Option<f64>,
}

impl Segment {
    /// Create a text-only segment from a paragraph
    pub fn from_paragraph(paragraph: &Paragraph, heading: String) -> Self {
        Self {
            segment_id: uuid::Uuid::new_v4().to_string(),
            text: paragraph.text(),
            heading,
            speaker: None,
            start_secs: None,
            end_secs: None,
        }
    }

    /// Create a diarized segment from a single sentence
    pub fn from_sentence(
        sentence: &Sentence,
        heading: String,
        speaker: String,
        start_secs: f64,
        end_secs: f64,
    ) -> Self {
        Self {
            segment_id: uuid::Uuid::new_v4().to_string(),
            text: sentence.text.clone(),
            heading,
            speaker: Some(speaker),
            start_secs: Some(start_secs),
            end_secs: Some(end_secs),
        }
    }

    /// Whether this segment carries speaker or time metadata
    pub fn has_metadata(&self) -> bool {
        self.speaker.is_some() || self.start_secs.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paragraph_has_no_metadata() {
        let p = Paragraph::new(vec![Sentence::new(0, "Hello world.")]).unwrap();
        let seg = Segment::from_paragraph(&p, "Greeting".to_string());
        assert_eq!(seg.text, "Hello world.");
        assert_eq!(seg.heading, "Greeting");
        assert!(!seg.has_metadata());
    }

    #[test]
    fn test_from_sentence_carries_metadata() {
        let s = Sentence::new(2, "Hello again.");
        let seg = Segment::from_sentence(&s, "Greeting".to_string(), "SPEAKER_00".to_string(), 1.0, 2.5);
        assert_eq!(seg.speaker.as_deref(), Some("SPEAKER_00"));
        assert_eq!(seg.start_secs, Some(1.0));
        assert_eq!(seg.end_secs, Some(2.5));
        assert!(seg.has_metadata());
    }
}
