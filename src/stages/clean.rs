use std::collections::HashSet;

use tracing::{debug, warn};

use crate::models::Sentence;
use crate::oracles::{cosine_similarity, EmbeddingOracle};

/// Configuration for the cleaning stage
#[derive(Debug, Clone)]
pub struct CleanConfig {
    /// Similarity above which a later sentence is dropped as a
    /// near-duplicate of an earlier retained one
    pub similarity_threshold: f32,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
        }
    }
}

/// Result of the cleaning stage
#[derive(Debug)]
pub struct CleanResult {
    /// Retained sentences in original order, original indices intact
    pub sentences: Vec<Sentence>,
    /// Exact duplicates removed
    pub exact_removed: usize,
    /// Near-duplicates removed
    pub near_removed: usize,
}

impl CleanResult {
    /// Retained sentences joined back into flat text
    pub fn text(&self) -> String {
        let parts: Vec<&str> = self.sentences.iter().map(|s| s.text.as_str()).collect();
        parts.join(" ")
    }
}

/// Clean a transcript: split into sentences, drop exact duplicates
/// (case-insensitive, first occurrence wins), then drop near-duplicates
/// of already-retained sentences.
///
/// The near-duplicate pass is a greedy streaming filter: each candidate
/// is compared only against sentences already retained before it, so
/// later near-duplicates of earlier content are removed, never the
/// reverse. An embedding failure skips the pass with a warning; the
/// exact-duplicate result still stands.
pub fn clean(text: &str, embedder: &dyn EmbeddingOracle, config: &CleanConfig) -> CleanResult {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return CleanResult {
            sentences: vec![],
            exact_removed: 0,
            near_removed: 0,
        };
    }

    // Exact-duplicate pass: O(n) with a seen-set
    let total = sentences.len();
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for sentence in sentences {
        if seen.insert(sentence.normalized()) {
            unique.push(sentence);
        }
    }
    let exact_removed = total - unique.len();

    if unique.len() < 2 {
        debug!("Fewer than 2 retained sentences, skipping near-duplicate pass");
        return CleanResult {
            sentences: unique,
            exact_removed,
            near_removed: 0,
        };
    }

    let texts: Vec<&str> = unique.iter().map(|s| s.text.as_str()).collect();
    let embeddings = match embedder.embed(&texts) {
        Ok(v) => v,
        Err(e) => {
            warn!("Embedding failed, keeping exact-duplicate result only: {e}");
            return CleanResult {
                sentences: unique,
                exact_removed,
                near_removed: 0,
            };
        }
    };

    // Greedy streaming filter against retained sentences only
    let mut kept_indices: Vec<usize> = vec![0];
    for i in 1..unique.len() {
        let max_similarity = kept_indices
            .iter()
            .map(|&j| cosine_similarity(&embeddings[i], &embeddings[j]))
            .fold(0.0f32, f32::max);
        if max_similarity <= config.similarity_threshold {
            kept_indices.push(i);
        }
    }

    let near_removed = unique.len() - kept_indices.len();
    let sentences: Vec<Sentence> = kept_indices.into_iter().map(|i| unique[i].clone()).collect();

    CleanResult {
        sentences,
        exact_removed,
        near_removed,
    }
}

/// Split text into sentences on `.`, `!`, `?` boundaries, skipping
/// common abbreviations, initials, and decimal-adjacent periods. Each
/// sentence gets a stable index reflecting its original position.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    const ABBREVIATIONS: &[&str] = &[
        "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "inc", "ltd", "co", "no",
        "dept", "approx", "fig", "al", "eg", "ie",
    ];

    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut index = 0;

    let mut push_current = |current: &mut String, index: &mut usize| {
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            sentences.push(Sentence::new(*index, trimmed));
            *index += 1;
        }
        current.clear();
    };

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        current.push(c);

        let boundary = match c {
            '!' | '?' => next_is_break(&chars, i + 1),
            '.' => {
                next_is_break(&chars, i + 1)
                    && !is_abbreviation(&current, ABBREVIATIONS)
                    && !is_initial(&current)
            }
            _ => false,
        };

        if boundary {
            push_current(&mut current, &mut index);
        }
        i += 1;
    }
    push_current(&mut current, &mut index);

    sentences
}

/// A sentence break requires whitespace (or end of text) after the
/// terminator, and the following text to open with an uppercase letter,
/// digit, or quote.
fn next_is_break(chars: &[char], mut i: usize) -> bool {
    if i >= chars.len() {
        return true;
    }
    if !chars[i].is_whitespace() {
        return false;
    }
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    if i >= chars.len() {
        return true;
    }
    let c = chars[i];
    c.is_uppercase() || c.is_ascii_digit() || c == '"' || c == '\'' || c == '(' || c == '['
}

/// The token preceding the final period is a known abbreviation
fn is_abbreviation(current: &str, abbreviations: &[&str]) -> bool {
    let body = current.trim_end_matches('.');
    let last_word = body
        .rsplit(|c: char| c.is_whitespace())
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    // Tokens with internal periods ("e.g", "u.s") reduce to their final
    // letter run.
    let tail = last_word.rsplit('.').next().unwrap_or("");
    abbreviations.contains(&last_word.as_str()) || abbreviations.contains(&tail)
}

/// The period follows a single-letter initial ("J. Smith")
fn is_initial(current: &str) -> bool {
    let body = current.trim_end_matches('.');
    let last_word = body.rsplit(|c: char| c.is_whitespace()).next().unwrap_or("");
    last_word.len() == 1 && last_word.chars().all(|c| c.is_alphabetic())
}

/// Rewrite text so each sentence ends with a newline: insert a newline
/// after mid-line periods, drop spaces opening the new line, and drop
/// consecutive duplicate sentence lines. Empty lines survive as
/// paragraph breaks.
pub fn format_sentence_lines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        if c == '.' {
            let mut j = i + 1;
            while j < chars.len() && (chars[j] == ' ' || chars[j] == '\t') {
                j += 1;
            }
            if j < chars.len() && chars[j] != '\n' {
                out.push('\n');
                i = j;
                continue;
            }
        }
        i += 1;
    }

    // Drop consecutive duplicate sentence lines
    let mut result_lines: Vec<&str> = Vec::new();
    let mut last_non_empty: Option<String> = None;
    for line in out.lines() {
        let cleaned = line.trim();
        if cleaned.is_empty() {
            result_lines.push(line);
            continue;
        }
        if last_non_empty.as_deref() == Some(cleaned) {
            continue;
        }
        last_non_empty = Some(cleaned.to_string());
        result_lines.push(line);
    }

    result_lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracles::HashEmbedding;

    #[test]
    fn test_split_basic() {
        let sentences = split_sentences("The cat sat. The dog ran! Did it rain?");
        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["The cat sat.", "The dog ran!", "Did it rain?"]);
        assert_eq!(sentences[2].index, 2);
    }

    #[test]
    fn test_split_abbreviation_safe() {
        let sentences = split_sentences("Dr. Smith arrived late. He apologized.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "Dr. Smith arrived late.");
    }

    #[test]
    fn test_split_initials() {
        let sentences = split_sentences("J. K. Rowling wrote it. Everyone read it.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_split_empty_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n  ").is_empty());
    }

    #[test]
    fn test_split_no_terminal_punctuation() {
        let sentences = split_sentences("an unfinished thought");
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].text, "an unfinished thought");
    }

    #[test]
    fn test_clean_removes_exact_duplicate() {
        let embedder = HashEmbedding::default();
        let result = clean(
            "The cat sat. The cat sat. The dog ran.",
            &embedder,
            &CleanConfig::default(),
        );
        let texts: Vec<&str> = result.sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["The cat sat.", "The dog ran."]);
        assert_eq!(result.exact_removed, 1);
    }

    #[test]
    fn test_clean_case_insensitive_exact_pass() {
        let embedder = HashEmbedding::default();
        let result = clean(
            "The cat sat. THE CAT SAT. The dog ran.",
            &embedder,
            &CleanConfig::default(),
        );
        assert_eq!(result.sentences.len(), 2);
        // First occurrence wins
        assert_eq!(result.sentences[0].text, "The cat sat.");
    }

    #[test]
    fn test_clean_removes_near_duplicate() {
        let embedder = HashEmbedding::default();
        let result = clean(
            "The quick brown fox jumps over the lazy dog. The quick brown fox jumps over a lazy dog. Quantum computing changes cryptography.",
            &embedder,
            &CleanConfig::default(),
        );
        assert_eq!(result.near_removed, 1);
        assert_eq!(result.sentences.len(), 2);
    }

    #[test]
    fn test_clean_idempotent() {
        let embedder = HashEmbedding::default();
        let config = CleanConfig::default();
        let once = clean(
            "The cat sat. The cat sat. The dog ran. Birds fly south in winter.",
            &embedder,
            &config,
        );
        let twice = clean(&once.text(), &embedder, &config);
        assert_eq!(once.text(), twice.text());
        assert_eq!(twice.exact_removed, 0);
        assert_eq!(twice.near_removed, 0);
    }

    #[test]
    fn test_clean_order_is_subsequence() {
        let embedder = HashEmbedding::default();
        let result = clean(
            "Alpha first. Beta second. Alpha first. Gamma third.",
            &embedder,
            &CleanConfig::default(),
        );
        let indices: Vec<usize> = result.sentences.iter().map(|s| s.index).collect();
        let mut sorted = indices.clone();
        sorted.sort();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn test_clean_empty_text() {
        let embedder = HashEmbedding::default();
        let result = clean("", &embedder, &CleanConfig::default());
        assert!(result.sentences.is_empty());
        assert_eq!(result.text(), "");
    }

    #[test]
    fn test_format_sentence_lines() {
        let formatted = format_sentence_lines("One. Two. Two.\nThree.");
        assert_eq!(formatted, "One.\nTwo.\nThree.");
    }

    #[test]
    fn test_format_preserves_empty_lines() {
        let formatted = format_sentence_lines("One.\n\nTwo.");
        assert_eq!(formatted, "One.\n\nTwo.");
    }
}
