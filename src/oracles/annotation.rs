use std::collections::HashSet;

use crate::error::OracleResult;

/// Linguistic annotation over a span of text: noun-phrase candidates,
/// named entities, and content-bearing words. Used by the header
/// labeler's extractive strategies.
pub trait AnnotationOracle {
    /// Noun-phrase candidates in order of appearance
    fn noun_phrases(&self, text: &str) -> OracleResult<Vec<String>>;

    /// Named-entity candidates (people, organizations, products) in
    /// order of appearance
    fn entities(&self, text: &str) -> OracleResult<Vec<String>>;

    /// Content-bearing words (longer than 2 chars, non-stopword) in
    /// order of appearance, lowercased
    fn content_words(&self, text: &str) -> OracleResult<Vec<String>>;
}

/// Rule-based annotator: stopword filtering plus capitalization
/// heuristics. No model files, fully deterministic - the oracle-free
/// default path for the labeler chain.
#[derive(Debug, Clone)]
pub struct RuleAnnotator {
    stopwords: HashSet<&'static str>,
}

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "then", "else", "when", "while", "for", "nor",
    "so", "yet", "at", "by", "from", "in", "into", "of", "off", "on", "onto", "out", "over", "to",
    "up", "with", "about", "as", "is", "are", "was", "were", "be", "been", "being", "am", "do",
    "does", "did", "have", "has", "had", "will", "would", "can", "could", "shall", "should",
    "may", "might", "must", "not", "no", "yes", "it", "its", "this", "that", "these", "those",
    "he", "she", "him", "her", "his", "hers", "we", "us", "our", "ours", "you", "your", "yours",
    "they", "them", "their", "theirs", "i", "me", "my", "mine", "who", "whom", "whose", "which",
    "what", "there", "here", "how", "why", "all", "any", "both", "each", "few", "more", "most",
    "some", "such", "only", "own", "same", "than", "too", "very", "just", "now", "also", "like",
    "really", "going", "gonna", "get", "got", "well", "okay", "yeah", "right", "know", "think",
];

impl Default for RuleAnnotator {
    fn default() -> Self {
        Self {
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }
}

impl RuleAnnotator {
    fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word.to_lowercase().as_str())
    }
}

impl AnnotationOracle for RuleAnnotator {
    fn noun_phrases(&self, text: &str) -> OracleResult<Vec<String>> {
        let mut phrases = Vec::new();
        let mut run: Vec<&str> = Vec::new();

        for raw in text.split_whitespace() {
            let word = trim_punct(raw);
            let terminal = raw.ends_with(['.', '!', '?', ',', ';', ':']);
            if word.is_empty() || self.is_stopword(word) {
                flush_run(&mut run, &mut phrases);
                continue;
            }
            run.push(word);
            // Noun-phrase candidates are capped at three words
            if run.len() == 3 || terminal {
                flush_run(&mut run, &mut phrases);
            }
        }
        flush_run(&mut run, &mut phrases);

        Ok(phrases)
    }

    fn entities(&self, text: &str) -> OracleResult<Vec<String>> {
        let mut entities = Vec::new();
        let mut run: Vec<&str> = Vec::new();
        let mut run_at_sentence_start = false;
        let mut sentence_start = true;

        let mut close_run = |run: &mut Vec<&str>, at_start: bool| {
            // A lone capitalized word at a sentence start is more
            // likely ordinary casing than a name.
            if run.len() >= 2 || (run.len() == 1 && !at_start) {
                entities.push(run.join(" "));
            }
            run.clear();
        };

        for raw in text.split_whitespace() {
            let word = trim_punct(raw);
            let capitalized = !word.is_empty()
                && word.chars().next().is_some_and(|c| c.is_uppercase())
                && !self.is_stopword(word);

            if capitalized {
                if run.is_empty() {
                    run_at_sentence_start = sentence_start;
                }
                run.push(word);
            } else {
                close_run(&mut run, run_at_sentence_start);
            }

            sentence_start = raw.ends_with(['.', '!', '?']);
            if sentence_start {
                close_run(&mut run, run_at_sentence_start);
            }
        }
        close_run(&mut run, run_at_sentence_start);

        Ok(entities)
    }

    fn content_words(&self, text: &str) -> OracleResult<Vec<String>> {
        Ok(text
            .split_whitespace()
            .map(trim_punct)
            .filter(|w| w.len() > 2 && !self.is_stopword(w))
            .map(|w| w.to_lowercase())
            .collect())
    }
}

fn trim_punct(raw: &str) -> &str {
    raw.trim_matches(|c: char| !c.is_alphanumeric())
}

fn flush_run(run: &mut Vec<&str>, phrases: &mut Vec<String>) {
    if !run.is_empty() {
        let phrase = run.join(" ");
        if phrase.len() > 3 {
            phrases.push(phrase);
        }
        run.clear();
    }
}
