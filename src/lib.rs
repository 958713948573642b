/*!
 * # dualsrt - bilingual subtitles on a shared timeline
 *
 * A Rust library that turns a text into two time-coded subtitle tracks,
 * the original and its translation, cutting at identical timestamps.
 *
 * ## Features
 *
 * - Reading-time estimation for word-counted and character-counted languages
 * - Sequential, non-overlapping timeline layout with explicit pacing
 * - Synchronization of a second language onto an existing timeline
 * - SRT serialization with consistent millisecond rounding
 * - LLM-backed segmentation and translation:
 *   - DeepSeek and OpenAI (OpenAI-compatible API)
 *   - Ollama (local LLM)
 * - Offline modes for pre-aligned or punctuation-split input
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timing`: the timing core (estimation, layout, synchronization)
 * - `subtitle_processor`: SRT rendering and writing
 * - `translation`: segmentation and translation collaborators:
 *   - `translation::core`: chat service with retries
 *   - `translation::segmenter`: LLM and rule-based segmenters
 *   - `translation::translator`: per-segment translation
 *   - `translation::prompts`: prompt templates
 * - `providers`: client implementations for the LLM APIs
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod subtitle_processor;
pub mod timing;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ProviderError, SegmentationError, TimingError};
pub use language_utils::{get_language_name, language_codes_match, language_mode_for, normalize_to_part2t};
pub use subtitle_processor::{serialize_track, SubtitleCollection, SubtitleEntry};
pub use timing::{
    build_timeline, estimate_duration, pace_bilingual, synchronize, LanguageMode, PacingBasis, PacingConfig,
    Segment, TimeWindow, Timeline, TimelineBuilder, Track,
};
