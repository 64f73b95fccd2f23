use tracing::debug;

use crate::models::{Segment, Sentence, SpeakerTimeline};
use crate::stages::label::HeaderLabeler;

/// Attach speaker and time metadata to sentences using a diarized
/// speaker timeline. One segment per sentence, headed individually.
///
/// Timing is a uniform-duration approximation: every sentence gets an
/// equal slice of the timeline's total duration, assigned in original
/// order starting at zero. This is an ordinal estimate, not true
/// per-sentence timing.
///
/// Precondition: the timeline is non-empty. Callers degrade to the
/// non-diarized pipeline when it is not.
pub fn align(
    sentences: &[Sentence],
    timeline: &SpeakerTimeline,
    labeler: &HeaderLabeler,
) -> Vec<Segment> {
    if sentences.is_empty() {
        return vec![];
    }

    let total_duration = timeline.total_duration();
    let slice = total_duration / sentences.len() as f64;
    debug!(
        "Aligning {} sentences over {:.1}s ({:.2}s per sentence)",
        sentences.len(),
        total_duration,
        slice
    );

    sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let start = slice * i as f64;
            let end = start + slice;
            let speaker = timeline
                .speaker_at(start)
                .unwrap_or("Unknown")
                .to_string();
            let heading = labeler.label(&sentence.text);
            Segment::from_sentence(sentence, heading, speaker, start, end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpeakerInterval;
    use crate::oracles::RuleAnnotator;
    use crate::stages::label::LabelConfig;

    fn timeline() -> SpeakerTimeline {
        SpeakerTimeline::new(vec![
            SpeakerInterval {
                start: 0.0,
                end: 10.0,
                speaker: "SPEAKER_00".to_string(),
            },
            SpeakerInterval {
                start: 12.0,
                end: 20.0,
                speaker: "SPEAKER_01".to_string(),
            },
        ])
    }

    fn sentences() -> Vec<Sentence> {
        vec![
            Sentence::new(0, "The meeting opened with introductions."),
            Sentence::new(1, "Budget numbers came next."),
            Sentence::new(2, "Planning closed the session."),
            Sentence::new(3, "Questions ran long afterwards."),
        ]
    }

    #[test]
    fn test_uniform_slicing_and_speaker_lookup() {
        let annotator = RuleAnnotator::default();
        let labeler = HeaderLabeler::new(None, &annotator, LabelConfig::default());
        let segments = align(&sentences(), &timeline(), &labeler);

        assert_eq!(segments.len(), 4);
        // 20s over 4 sentences: starts at 0, 5, 10, 15
        assert_eq!(segments[0].start_secs, Some(0.0));
        assert_eq!(segments[1].start_secs, Some(5.0));
        assert_eq!(segments[3].end_secs, Some(20.0));

        assert_eq!(segments[0].speaker.as_deref(), Some("SPEAKER_00"));
        assert_eq!(segments[1].speaker.as_deref(), Some("SPEAKER_00"));
        // 10.0 is still inside [0, 10]
        assert_eq!(segments[2].speaker.as_deref(), Some("SPEAKER_00"));
        assert_eq!(segments[3].speaker.as_deref(), Some("SPEAKER_01"));
    }

    #[test]
    fn test_gap_yields_unknown_speaker() {
        let gapped = SpeakerTimeline::new(vec![SpeakerInterval {
            start: 5.0,
            end: 8.0,
            speaker: "SPEAKER_00".to_string(),
        }]);
        let annotator = RuleAnnotator::default();
        let labeler = HeaderLabeler::new(None, &annotator, LabelConfig::default());
        let single = vec![Sentence::new(0, "Nobody claims this sentence.")];
        let segments = align(&single, &gapped, &labeler);
        // Start time 0 falls before the only interval
        assert_eq!(segments[0].speaker.as_deref(), Some("Unknown"));
    }

    #[test]
    fn test_every_segment_headed() {
        let annotator = RuleAnnotator::default();
        let labeler = HeaderLabeler::new(None, &annotator, LabelConfig::default());
        for segment in align(&sentences(), &timeline(), &labeler) {
            assert!(!segment.heading.is_empty());
        }
    }

    #[test]
    fn test_empty_sentences() {
        let annotator = RuleAnnotator::default();
        let labeler = HeaderLabeler::new(None, &annotator, LabelConfig::default());
        assert!(align(&[], &timeline(), &labeler).is_empty());
    }
}
