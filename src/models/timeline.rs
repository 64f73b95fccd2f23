use serde::{Deserialize, Serialize};

/// One diarized interval: a speaker active over [start, end] seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerInterval {
    /// Interval start in seconds
    pub start: f64,
    /// Interval end in seconds
    pub end: f64,
    /// Diarizer-assigned speaker label (e.g. "SPEAKER_00")
    pub speaker: String,
}

impl SpeakerInterval {
    /// Whether a point in time falls inside this interval
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Ordered set of speaker intervals produced by an external diarizer.
/// Non-overlapping by construction of the diarization oracle; read-only
/// input to the aligner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakerTimeline {
    pub intervals: Vec<SpeakerInterval>,
}

impl SpeakerTimeline {
    /// Build a timeline, sorting intervals by start time
    pub fn new(mut intervals: Vec<SpeakerInterval>) -> Self {
        intervals.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self { intervals }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Total duration in seconds, taken from the latest interval end
    pub fn total_duration(&self) -> f64 {
        self.intervals.iter().map(|i| i.end).fold(0.0, f64::max)
    }

    /// Speaker label for the first interval containing `t`, if any
    pub fn speaker_at(&self, t: f64) -> Option<&str> {
        self.intervals
            .iter()
            .find(|i| i.contains(t))
            .map(|i| i.speaker.as_str())
    }

    /// Distinct speaker labels in first-seen order
    pub fn speakers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for interval in &self.intervals {
            if !seen.contains(&interval.speaker.as_str()) {
                seen.push(interval.speaker.as_str());
            }
        }
        seen
    }
}
