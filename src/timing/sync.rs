/*!
 * Cross-language track synchronization.
 *
 * One language is the pacing basis: its segments are laid out with its own
 * reading speed, and the other language's segments are bound to that same
 * timeline. Both tracks then render identical cut points.
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::TimingError;
use super::pacing::{LanguageMode, PacingConfig};
use super::timeline::{Segment, TimeWindow, Timeline, TimelineBuilder};

/// Segments of one language paired index-by-index with a timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    segments: Vec<Segment>,
    timeline: Timeline,
}

impl Track {
    /// Pair segments with windows; counts must match
    pub fn new(segments: Vec<Segment>, timeline: Timeline) -> Result<Self, TimingError> {
        if segments.len() != timeline.len() {
            return Err(TimingError::LengthMismatch {
                expected: timeline.len(),
                actual: segments.len(),
            });
        }
        Ok(Self { segments, timeline })
    }

    /// Lay out `segments` with `builder` and pair them with the result
    pub fn build(segments: Vec<Segment>, builder: &TimelineBuilder) -> Result<Self, TimingError> {
        let timeline = builder.build(&segments)?;
        Ok(Self { segments, timeline })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn windows(&self) -> &[TimeWindow] {
        self.timeline.windows()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// (segment, window) pairs in track order
    pub fn entries(&self) -> impl Iterator<Item = (&Segment, &TimeWindow)> {
        self.segments.iter().zip(self.timeline.iter())
    }
}

/// Bind `secondary` segments to a timeline computed for another language.
///
/// No re-estimation happens: the returned track shares `primary`'s windows.
/// A count mismatch is a hard failure and no partial track is produced.
pub fn synchronize(secondary: Vec<Segment>, primary: &Timeline) -> Result<Track, TimingError> {
    let track = Track::new(secondary, primary.clone())?;
    debug!("Synchronized {} segments to shared timeline", track.len());
    Ok(track)
}

/// Which language's reading speed drives the shared timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacingBasis {
    Source,
    #[default]
    Target,
}

impl std::fmt::Display for PacingBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

impl std::str::FromStr for PacingBasis {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "source" => Ok(Self::Source),
            "target" => Ok(Self::Target),
            _ => Err(anyhow::anyhow!("Invalid pacing basis: {}", s)),
        }
    }
}

/// Pacing inputs for one language
#[derive(Debug, Clone, Copy)]
pub struct LanguagePacing {
    pub config: PacingConfig,
    pub mode: LanguageMode,
}

impl LanguagePacing {
    pub fn new(config: PacingConfig, mode: LanguageMode) -> Self {
        Self { config, mode }
    }
}

/// Source and target tracks sharing one timeline
#[derive(Debug, Clone, PartialEq)]
pub struct BilingualTracks {
    pub source: Track,
    pub target: Track,
    pub basis: PacingBasis,
}

impl BilingualTracks {
    /// The timeline both tracks render
    pub fn timeline(&self) -> &Timeline {
        self.source.timeline()
    }
}

/// Time the basis language and synchronize the other one to it.
///
/// Only the pacing of the basis language is used; the other profile is
/// accepted so callers can switch basis without rearranging arguments.
pub fn pace_bilingual(
    source: Vec<Segment>,
    target: Vec<Segment>,
    basis: PacingBasis,
    source_pacing: LanguagePacing,
    target_pacing: LanguagePacing,
) -> Result<BilingualTracks, TimingError> {
    if source.len() != target.len() {
        return Err(TimingError::LengthMismatch {
            expected: source.len(),
            actual: target.len(),
        });
    }

    let (primary, secondary, pacing) = match basis {
        PacingBasis::Source => (source, target, source_pacing),
        PacingBasis::Target => (target, source, target_pacing),
    };

    let builder = TimelineBuilder::new(pacing.config, pacing.mode)?;
    let primary = Track::build(primary, &builder)?;
    let secondary = synchronize(secondary, primary.timeline())?;

    info!(
        "Paced {} segments by {} language ({}, {} per minute), total {:.3}s",
        primary.len(),
        basis,
        pacing.mode,
        pacing.config.rate,
        primary.timeline().total_duration().as_secs_f64()
    );

    let (source, target) = match basis {
        PacingBasis::Source => (primary, secondary),
        PacingBasis::Target => (secondary, primary),
    };
    Ok(BilingualTracks { source, target, basis })
}
