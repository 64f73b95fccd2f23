use std::io::Write;
use std::path::Path;

use chrono::Local;
use serde::Serialize;

use crate::error::PipelineError;
use crate::models::Segment;

/// The rendered document: ordered segments plus a generated-at stamp
pub struct StructuredDocument {
    segments: Vec<Segment>,
    generated_at: String,
}

impl StructuredDocument {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            generated_at: Local::now().format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct speaker labels across segments, first-seen order
    pub fn speakers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for segment in &self.segments {
            if let Some(speaker) = segment.speaker.as_deref() {
                if !seen.contains(&speaker) {
                    seen.push(speaker);
                }
            }
        }
        seen
    }

    /// Render as Markdown: document header, then per segment a level-2
    /// heading, an optional metadata line, and the body, separated by
    /// horizontal rules
    pub fn format(&self) -> String {
        let mut out = String::new();
        out.push_str("# Processed Transcript\n\n");
        out.push_str(&format!("*Generated {}*\n\n---\n\n", self.generated_at));

        for (i, segment) in self.segments.iter().enumerate() {
            out.push_str(&format!("## {}\n\n", segment.heading));

            let mut metadata = Vec::new();
            if let Some(speaker) = &segment.speaker {
                metadata.push(format!("**Speaker:** {speaker}"));
            }
            if let (Some(start), Some(end)) = (segment.start_secs, segment.end_secs) {
                metadata.push(format!("**Time:** {start:.1}s - {end:.1}s"));
            }
            if !metadata.is_empty() {
                out.push_str(&format!("*{}*\n\n", metadata.join(" | ")));
            }

            out.push_str(&segment.text);
            out.push_str("\n\n");

            if i + 1 < self.segments.len() {
                out.push_str("---\n\n");
            }
        }

        out
    }

    /// Write the Markdown rendering, creating parent directories
    pub fn write_file(&self, path: &Path) -> Result<(), PipelineError> {
        let map_err = |source| PipelineError::OutputWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(map_err)?;
        }
        let mut file = std::fs::File::create(path).map_err(map_err)?;
        write!(file, "{}", self.format()).map_err(map_err)?;
        Ok(())
    }

    /// Write the machine-readable JSON view alongside the Markdown
    pub fn write_json(&self, path: &Path) -> Result<(), PipelineError> {
        let view = MachineDocument {
            metadata: DocumentMetadata {
                total_segments: self.segments.len(),
                speakers: self.speakers().iter().map(|s| s.to_string()).collect(),
                generated_at: self.generated_at.clone(),
            },
            segments: &self.segments,
        };
        let map_io = |source| PipelineError::OutputWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(map_io)?;
        }
        let file = std::fs::File::create(path).map_err(map_io)?;
        serde_json::to_writer_pretty(file, &view).map_err(|e| PipelineError::OutputWrite {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        Ok(())
    }
}

/// Machine-readable output format
#[derive(Debug, Serialize)]
struct MachineDocument<'a> {
    metadata: DocumentMetadata,
    segments: &'a [Segment],
}

#[derive(Debug, Serialize)]
struct DocumentMetadata {
    total_segments: usize,
    speakers: Vec<String>,
    generated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Paragraph, Sentence};

    fn doc() -> StructuredDocument {
        let p1 = Paragraph::new(vec![Sentence::new(0, "First body.")]).unwrap();
        let p2 = Paragraph::new(vec![Sentence::new(1, "Second body.")]).unwrap();
        StructuredDocument::new(vec![
            Segment::from_paragraph(&p1, "Opening".to_string()),
            Segment::from_paragraph(&p2, "Closing".to_string()),
        ])
    }

    #[test]
    fn test_format_headings_and_separator() {
        let rendered = doc().format();
        assert!(rendered.starts_with("# Processed Transcript\n"));
        assert!(rendered.contains("## Opening\n"));
        assert!(rendered.contains("## Closing\n"));
        // Separator between entries, not after the last
        assert_eq!(rendered.matches("\n---\n").count(), 2);
        assert!(!rendered.trim_end().ends_with("---"));
    }

    #[test]
    fn test_format_metadata_line() {
        let s = Sentence::new(0, "Spoken words.");
        let segment = Segment::from_sentence(
            &s,
            "Spoken Words".to_string(),
            "SPEAKER_00".to_string(),
            0.0,
            2.5,
        );
        let rendered = StructuredDocument::new(vec![segment]).format();
        assert!(rendered.contains("***Speaker:** SPEAKER_00 | **Time:** 0.0s - 2.5s*"));
    }

    #[test]
    fn test_text_only_segments_have_no_metadata_line() {
        let rendered = doc().format();
        assert!(!rendered.contains("**Speaker:**"));
        assert!(!rendered.contains("**Time:**"));
    }

    #[test]
    fn test_speakers_first_seen() {
        let s = Sentence::new(0, "Words.");
        let seg = |sp: &str| {
            Segment::from_sentence(&s, "H".to_string(), sp.to_string(), 0.0, 1.0)
        };
        let document =
            StructuredDocument::new(vec![seg("B"), seg("A"), seg("B")]);
        assert_eq!(document.speakers(), vec!["B", "A"]);
    }
}
