/*!
 * Subtitle timing and synchronization engine.
 *
 * - `pacing`: pacing parameters and language modes
 * - `duration`: reading-time estimation for one segment
 * - `timeline`: sequential layout of non-overlapping display windows
 * - `sync`: binding a second language to an existing timeline
 *
 * Everything here is synchronous and pure; callers run the steps in order
 * (layout, then synchronization, then serialization).
 */

pub mod duration;
pub mod pacing;
pub mod sync;
pub mod timeline;

pub use duration::{count_units, estimate_duration};
pub use pacing::{LanguageMode, PacingConfig};
pub use sync::{pace_bilingual, synchronize, BilingualTracks, LanguagePacing, PacingBasis, Track};
pub use timeline::{build_timeline, Segment, TimeWindow, Timeline, TimelineBuilder};
