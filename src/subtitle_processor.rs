use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::debug;

use crate::timing::{TimeWindow, Track};

// @module: SRT rendering of timed tracks

// @const: Placeholder for a segment whose text is empty after cleanup
const EMPTY_TEXT_PLACEHOLDER: &str = " ";

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Entry for a window, with ms rounding and text cleanup applied
    pub fn from_window(seq_num: usize, window: &TimeWindow, text: &str) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms: duration_to_ms(window.start),
            end_time_ms: duration_to_ms(window.end),
            text: clean_text(text),
        }
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ','][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Round a duration to whole milliseconds, half up.
///
/// Monotone, so ordering between timestamps survives formatting.
pub fn duration_to_ms(duration: Duration) -> u64 {
    let ms = (duration.as_nanos() + 500_000) / 1_000_000;
    u64::try_from(ms).unwrap_or(u64::MAX)
}

// Blank lines would end an SRT block early, so they are dropped.
fn clean_text(text: &str) -> String {
    let cleaned = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if cleaned.is_empty() {
        EMPTY_TEXT_PLACEHOLDER.to_string()
    } else {
        cleaned
    }
}

/// Rendered subtitle entries for one language
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Language code of the entries
    pub language: String,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create an empty collection
    pub fn new(language: impl Into<String>) -> Self {
        SubtitleCollection {
            language: language.into(),
            entries: Vec::new(),
        }
    }

    /// Render a track; entries are numbered 1..N in track order
    pub fn from_track(track: &Track, language: impl Into<String>) -> Self {
        let entries = track
            .entries()
            .enumerate()
            .map(|(i, (segment, window))| SubtitleEntry::from_window(i + 1, window, &segment.text))
            .collect();

        SubtitleCollection {
            language: language.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// SRT text for all entries
    pub fn to_srt_string(&self) -> String {
        self.entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        debug!("Wrote {} {} entries to {}", self.entries.len(), self.language, path.display());
        Ok(())
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Language: {}", self.language)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}

/// Serialize a track to SRT text; an empty track yields an empty string
pub fn serialize_track(track: &Track) -> String {
    let mut out = String::new();
    for (i, (segment, window)) in track.entries().enumerate() {
        out.push_str(&SubtitleEntry::from_window(i + 1, window, &segment.text).to_string());
    }
    out
}
