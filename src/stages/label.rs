use std::collections::HashMap;

use tracing::{debug, warn};

use crate::oracles::{AnnotationOracle, GenerationOracle};
use crate::stages::clean::split_sentences;

/// Configuration for heading generation
#[derive(Debug, Clone)]
pub struct LabelConfig {
    /// Longest acceptable heading, in words
    pub max_heading_words: usize,
    /// Paragraph prefix length (chars) sent to the generation oracle
    pub prompt_prefix_chars: usize,
    /// Heading used when every strategy comes up empty
    pub default_heading: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            max_heading_words: 8,
            prompt_prefix_chars: 500,
            default_heading: "Content Section".to_string(),
        }
    }
}

/// Derives a short heading for a paragraph via an ordered fallback
/// chain: generative labeling, then phrase/entity extraction, then
/// first-sentence keywords, then a fixed default. `label()` always
/// succeeds; oracle failures are logged and the chain moves on.
pub struct HeaderLabeler<'a> {
    generator: Option<&'a dyn GenerationOracle>,
    annotator: &'a dyn AnnotationOracle,
    config: LabelConfig,
}

impl<'a> HeaderLabeler<'a> {
    pub fn new(
        generator: Option<&'a dyn GenerationOracle>,
        annotator: &'a dyn AnnotationOracle,
        config: LabelConfig,
    ) -> Self {
        Self {
            generator,
            annotator,
            config,
        }
    }

    /// Produce a non-empty heading for the paragraph
    pub fn label(&self, paragraph: &str) -> String {
        if let Some(heading) = self.generative_heading(paragraph) {
            return heading;
        }
        if let Some(heading) = self.phrase_heading(paragraph) {
            return heading;
        }
        if let Some(heading) = self.keyword_heading(paragraph) {
            return heading;
        }
        self.config.default_heading.clone()
    }

    /// Strategy 1: ask the generation oracle for a 3-8 word heading
    fn generative_heading(&self, paragraph: &str) -> Option<String> {
        let generator = self.generator?;

        let prefix: String = paragraph
            .chars()
            .take(self.config.prompt_prefix_chars)
            .collect();
        let prompt = format!(
            "Generate a short, descriptive heading (3-8 words) for this text. \
             Reply with the heading only.\n\n{prefix}"
        );

        let raw = match generator.generate(&prompt) {
            Ok(text) => text,
            Err(e) => {
                warn!("Generative labeling failed: {e}");
                return None;
            }
        };

        let heading = tidy_generated_heading(&raw);
        if heading.is_empty() {
            debug!("Generated heading was empty after cleanup");
            return None;
        }
        if heading.split_whitespace().count() > self.config.max_heading_words {
            debug!("Generated heading too long, falling through: {heading:?}");
            return None;
        }
        Some(title_case(&heading))
    }

    /// Strategy 2: most frequent noun phrase or named entity, ties
    /// broken by first-seen order
    fn phrase_heading(&self, paragraph: &str) -> Option<String> {
        let mut candidates = Vec::new();
        match self.annotator.noun_phrases(paragraph) {
            Ok(phrases) => candidates.extend(phrases),
            Err(e) => warn!("Noun phrase extraction failed: {e}"),
        }
        match self.annotator.entities(paragraph) {
            Ok(entities) => candidates.extend(entities),
            Err(e) => warn!("Entity extraction failed: {e}"),
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();
        for candidate in candidates {
            let phrase = title_case(candidate.trim());
            if phrase.len() <= 3 || is_pronoun_like(&phrase) {
                continue;
            }
            if !counts.contains_key(&phrase) {
                first_seen.push(phrase.clone());
            }
            *counts.entry(phrase).or_insert(0) += 1;
        }

        // Ties break to the phrase seen first
        let mut best: Option<(String, usize)> = None;
        for phrase in first_seen {
            let count = counts[&phrase];
            if best.as_ref().is_none_or(|(_, best_count)| count > *best_count) {
                best = Some((phrase, count));
            }
        }
        best.map(|(phrase, _)| phrase)
    }

    /// Strategy 3: first 4 content words of the first sentence,
    /// title-cased
    fn keyword_heading(&self, paragraph: &str) -> Option<String> {
        let sentences = split_sentences(paragraph);
        let first = sentences.first()?;

        let words = match self.annotator.content_words(&first.text) {
            Ok(words) => words,
            Err(e) => {
                warn!("Keyword extraction failed: {e}");
                return None;
            }
        };
        if words.is_empty() {
            return None;
        }

        let heading = words
            .into_iter()
            .take(4)
            .collect::<Vec<_>>()
            .join(" ");
        Some(title_case(&heading))
    }
}

/// Strip `Heading:`/`Title:`/`Summary:` prefixes and surrounding quotes
/// from generated output
fn tidy_generated_heading(raw: &str) -> String {
    let mut heading = raw.trim();
    for prefix in ["heading:", "title:", "summary:"] {
        if heading.len() >= prefix.len()
            && heading.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
        {
            // The matched prefix is ASCII, so the byte offset is a char
            // boundary.
            heading = heading[prefix.len()..].trim_start();
            break;
        }
    }
    heading
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

/// Capitalize the first letter of each word, lowercasing the rest
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_pronoun_like(phrase: &str) -> bool {
    matches!(
        phrase.to_lowercase().as_str(),
        "you" | "your" | "they" | "their" | "this" | "that" | "these" | "those"
    )
}
