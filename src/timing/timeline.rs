/*!
 * Sequential layout of display windows.
 *
 * The layout is a left-to-right fold: each window starts where the previous
 * one ended plus the configured pause, so the windows of a timeline are
 * strictly ordered and never overlap.
 */

use std::ops::Index;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::errors::TimingError;
use super::duration::estimate_duration;
use super::pacing::{LanguageMode, PacingConfig};

/// One unit of subtitle text with its 1-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Position in the source sequence, starting at 1
    pub ordinal: usize,
    /// Text shown on screen
    pub text: String,
}

impl Segment {
    pub fn new(ordinal: usize, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            text: text.into(),
        }
    }

    /// Number a sequence of texts 1..N
    pub fn sequence<I, S>(texts: I) -> Vec<Segment>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Segment::new(i + 1, text))
            .collect()
    }
}

/// Display interval measured from the start of the media
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeWindow {
    pub start: Duration,
    pub end: Duration,
}

impl TimeWindow {
    pub fn new(start: Duration, end: Duration) -> Self {
        Self { start, end }
    }

    /// Time the segment stays on screen
    pub fn length(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }

    pub fn start_secs(&self) -> f64 {
        self.start.as_secs_f64()
    }

    pub fn end_secs(&self) -> f64 {
        self.end.as_secs_f64()
    }
}

/// Immutable list of windows produced by one layout run.
///
/// Cloning a `Timeline` shares the underlying windows; tracks synchronized
/// to the same timeline therefore present the very same values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    windows: Arc<[TimeWindow]>,
}

impl Timeline {
    pub fn new(windows: Vec<TimeWindow>) -> Self {
        Self {
            windows: windows.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeWindow> {
        self.windows.iter()
    }

    /// End of the last window, or zero for an empty timeline
    pub fn total_duration(&self) -> Duration {
        self.windows.last().map(|w| w.end).unwrap_or_default()
    }

    /// True when both timelines are backed by the same window storage
    pub fn shares_storage_with(&self, other: &Timeline) -> bool {
        Arc::ptr_eq(&self.windows, &other.windows)
    }
}

impl Index<usize> for Timeline {
    type Output = TimeWindow;

    fn index(&self, index: usize) -> &Self::Output {
        &self.windows[index]
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimeWindow;
    type IntoIter = std::slice::Iter<'a, TimeWindow>;

    fn into_iter(self) -> Self::IntoIter {
        self.windows.iter()
    }
}

/// Lays out windows for segments of one language
#[derive(Debug, Clone, Copy)]
pub struct TimelineBuilder {
    config: PacingConfig,
    mode: LanguageMode,
}

impl TimelineBuilder {
    /// Create a builder, rejecting invalid pacing up front
    pub fn new(config: PacingConfig, mode: LanguageMode) -> Result<Self, TimingError> {
        config.validate()?;
        Ok(Self { config, mode })
    }

    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    pub fn mode(&self) -> LanguageMode {
        self.mode
    }

    /// Compute one window per segment, in input order.
    ///
    /// Window length is `max(estimate, min_duration) + extra_buffer`, and
    /// `windows[i + 1].start == windows[i].end + pause`.
    pub fn build(&self, segments: &[Segment]) -> Result<Timeline, TimingError> {
        let pause = seconds("pause", self.config.pause)?;
        if pause.is_zero() && self.config.pause > 0.0 {
            return Err(TimingError::Configuration(format!(
                "pause of {}s is below the 1ns resolution and would let windows touch",
                self.config.pause
            )));
        }
        let mut cursor = seconds("initial_offset", self.config.initial_offset)?;
        let mut windows = Vec::with_capacity(segments.len());

        for segment in segments {
            let base = estimate_duration(
                &segment.text,
                self.config.rate,
                self.config.min_duration,
                self.mode,
            )?;
            let length = seconds("window length", base + self.config.extra_buffer)?;
            if length.is_zero() {
                return Err(TimingError::Configuration(format!(
                    "segment {} has no readable units and min_duration + extra_buffer is 0, \
                     which would produce an empty window",
                    segment.ordinal
                )));
            }

            let start = cursor;
            let end = start
                .checked_add(length)
                .ok_or_else(|| overflow(segment.ordinal))?;
            debug!(
                "Segment {}: {:.3}s -> {:.3}s ({:.3}s)",
                segment.ordinal,
                start.as_secs_f64(),
                end.as_secs_f64(),
                length.as_secs_f64()
            );
            windows.push(TimeWindow::new(start, end));
            cursor = end.checked_add(pause).ok_or_else(|| overflow(segment.ordinal))?;
        }

        Ok(Timeline::new(windows))
    }
}

/// Lay out `segments` with `config`; see [`TimelineBuilder::build`]
pub fn build_timeline(
    segments: &[Segment],
    config: &PacingConfig,
    mode: LanguageMode,
) -> Result<Timeline, TimingError> {
    TimelineBuilder::new(*config, mode)?.build(segments)
}

fn seconds(name: &str, value: f64) -> Result<Duration, TimingError> {
    Duration::try_from_secs_f64(value).map_err(|e| {
        TimingError::Configuration(format!("{} of {}s is not representable: {}", name, value, e))
    })
}

fn overflow(ordinal: usize) -> TimingError {
    TimingError::Configuration(format!(
        "timeline overflows the representable time range at segment {}",
        ordinal
    ))
}
