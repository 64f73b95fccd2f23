use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PipelineError;

/// Read a transcript file, applying the subtitle markup pre-pass when
/// the content looks like a subtitle file
pub fn load_transcript(path: &Path) -> Result<String, PipelineError> {
    let content = read_input_file(path)?;
    if looks_like_subtitles(&content) {
        debug!("Input looks like a subtitle file, stripping markup");
        Ok(strip_subtitle_markup(&content))
    } else {
        Ok(content)
    }
}

/// Read a UTF-8 input file, mapping failures to the fatal input error
pub fn read_input_file(path: &Path) -> Result<String, PipelineError> {
    std::fs::read_to_string(path).map_err(|source| PipelineError::Input {
        path: path.to_path_buf(),
        source,
    })
}

/// First non-empty line opens with the WEBVTT magic
pub fn looks_like_subtitles(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .is_some_and(|l| l.starts_with("WEBVTT"))
}

/// Strip subtitle markup down to flat transcript text: drop header and
/// metadata lines, cue timings, cue settings, bare cue numbers, inline
/// tags and entities, then collapse whitespace.
pub fn strip_subtitle_markup(content: &str) -> String {
    let mut kept = Vec::new();

    for raw_line in content.lines() {
        let line = raw_line.trim();

        if line.is_empty()
            || line.starts_with("WEBVTT")
            || line.starts_with("Kind:")
            || line.starts_with("Language:")
            || line.starts_with("NOTE")
            || is_cue_timing_line(line)
            || is_cue_settings_line(line)
        {
            continue;
        }

        let cleaned = remove_entities(&remove_inline_tags(line));
        let cleaned = cleaned.trim();
        // Bare cue numbers carry no text
        if cleaned.is_empty() || cleaned.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        kept.push(cleaned.to_string());
    }

    let joined = kept.join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cue timing lines have the shape `HH:MM:SS.mmm --> HH:MM:SS.mmm`
fn is_cue_timing_line(line: &str) -> bool {
    let Some(arrow) = line.find("-->") else {
        return false;
    };
    let left = line[..arrow].trim();
    is_cue_timestamp(left)
}

fn is_cue_timestamp(s: &str) -> bool {
    // HH:MM:SS.mmm, hours may run longer than two digits
    let Some((clock, millis)) = s.rsplit_once('.') else {
        return false;
    };
    if millis.len() != 3 || !millis.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let parts: Vec<&str> = clock.split(':').collect();
    parts.len() >= 2
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

/// Cue setting lines carry `position:`/`align:`/`line:`/`size:` keys
fn is_cue_settings_line(line: &str) -> bool {
    line.split_whitespace().any(|word| {
        word.starts_with("position:")
            || word.starts_with("align:")
            || word.starts_with("line:")
            || word.starts_with("size:")
    })
}

/// Drop `<...>` spans (cue voice tags, timing tags, styling)
fn remove_inline_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut depth = 0usize;
    for c in line.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Drop `&name;` HTML entities
fn remove_entities(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '&' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_ascii_alphabetic() {
                j += 1;
            }
            if j < chars.len() && chars[j] == ';' && j > i + 1 {
                i = j + 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Default output path: `<input dir>/transcription/<stem>_structured.md`
pub fn default_output_path(input: &Path) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "transcript".to_string());
    dir.join("transcription").join(format!("{stem}_structured.md"))
}

/// Default path for the markup-stripping subcommand:
/// `<stem>_cleaned.txt` alongside the input
pub fn default_stripped_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "transcript".to_string());
    input.with_file_name(format!("{stem}_cleaned.txt"))
}
