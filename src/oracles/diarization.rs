use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{OracleError, OracleResult};
use crate::models::{SpeakerInterval, SpeakerTimeline};

/// Produces a speaker timeline for an audio file. The pipeline never
/// runs diarization itself; the oracle wraps whatever external tool
/// produced the intervals.
pub trait DiarizationOracle {
    fn diarize(&self, audio: &Path) -> OracleResult<SpeakerTimeline>;
}

/// Reads a diarization sidecar file written by an external diarizer:
/// `<audio stem>.diarization.json`, a JSON array of
/// `{"start": secs, "end": secs, "speaker": label}` objects.
#[derive(Debug, Clone, Default)]
pub struct SidecarDiarizer;

impl SidecarDiarizer {
    /// Sidecar path for an audio file: `talk.wav` -> `talk.diarization.json`
    pub fn sidecar_path(audio: &Path) -> PathBuf {
        audio.with_extension("diarization.json")
    }
}

impl DiarizationOracle for SidecarDiarizer {
    fn diarize(&self, audio: &Path) -> OracleResult<SpeakerTimeline> {
        let sidecar = Self::sidecar_path(audio);
        if !sidecar.exists() {
            return Err(OracleError::Unavailable(format!(
                "no diarization sidecar at {}",
                sidecar.display()
            )));
        }

        debug!("Reading diarization sidecar {:?}", sidecar);
        let content = std::fs::read_to_string(&sidecar)
            .map_err(|e| OracleError::Call(format!("failed to read {}: {e}", sidecar.display())))?;
        parse_timeline_json(&content)
    }
}

/// Parse a JSON interval array into a sorted timeline
pub fn parse_timeline_json(json: &str) -> OracleResult<SpeakerTimeline> {
    let intervals: Vec<SpeakerInterval> = serde_json::from_str(json)
        .map_err(|e| OracleError::Call(format!("invalid diarization JSON: {e}")))?;

    for interval in &intervals {
        if interval.end < interval.start {
            return Err(OracleError::Call(format!(
                "interval for {} ends before it starts ({} < {})",
                interval.speaker, interval.end, interval.start
            )));
        }
    }

    Ok(SpeakerTimeline::new(intervals))
}
