/*!
 * Tests for reading-time estimation and timeline layout
 */

use std::time::Duration;

use proptest::prelude::*;

use dualsrt::errors::TimingError;
use dualsrt::timing::{
    build_timeline, estimate_duration, LanguageMode, PacingConfig, Segment, TimelineBuilder,
};
use crate::common::{assert_secs, pacing};

fn scenario_a_config() -> PacingConfig {
    pacing(150.0, 1.0, 0.2, 0.5, 0.0)
}

/// Four words at 150 wpm take 1.6s, so the 1.0s floor does not bind
#[test]
fn test_buildTimeline_withScenarioA_shouldComputeExactWindows() {
    let segments = Segment::sequence(["Once upon a time,", "There is a village."]);

    let timeline = build_timeline(&segments, &scenario_a_config(), LanguageMode::WordCounted).unwrap();

    assert_eq!(timeline.len(), 2);
    assert_secs(timeline[0].start, 0.5);
    assert_secs(timeline[0].end, 2.1);
    assert_secs(timeline[1].start, 2.3);
    assert_secs(timeline[1].end, 3.9);
}

#[test]
fn test_buildTimeline_withEmptySegments_shouldReturnEmptyTimeline() {
    let timeline = build_timeline(&[], &scenario_a_config(), LanguageMode::WordCounted).unwrap();
    assert!(timeline.is_empty());
    assert_eq!(timeline.total_duration(), Duration::ZERO);
}

#[test]
fn test_buildTimeline_withSingleSegment_shouldStartAtInitialOffset() {
    let segments = Segment::sequence(["Hello"]);
    let config = pacing(150.0, 1.0, 0.2, 3.25, 0.0);

    let timeline = build_timeline(&segments, &config, LanguageMode::WordCounted).unwrap();

    assert_secs(timeline[0].start, 3.25);
    assert_secs(timeline[0].end, 4.25);
}

/// Scenario C: when the floor binds everywhere, every window is min + buffer
#[test]
fn test_buildTimeline_withDominantFloor_shouldUseFloorPlusBuffer() {
    let segments = Segment::sequence(["a", "two words", "three small words"]);
    let config = pacing(150.0, 5.0, 0.2, 0.0, 0.5);

    let timeline = build_timeline(&segments, &config, LanguageMode::WordCounted).unwrap();

    for window in &timeline {
        assert_secs(window.length(), 5.5);
    }
}

/// The buffer is added after flooring: 1.6s raw beats a 1.0s floor, then + 0.5s
#[test]
fn test_buildTimeline_withBuffer_shouldAddBufferAfterFloor() {
    let segments = Segment::sequence(["Once upon a time,"]);
    let config = pacing(150.0, 1.0, 0.0, 0.0, 0.5);

    let timeline = build_timeline(&segments, &config, LanguageMode::WordCounted).unwrap();

    assert_secs(timeline[0].length(), 2.1);
}

#[test]
fn test_buildTimeline_withCharacterMode_shouldCountCharacters() {
    let segments = Segment::sequence(["在很久很久以前，", "有一个美丽的村庄。"]);
    let config = PacingConfig::character_counted_default();

    let timeline = build_timeline(&segments, &config, LanguageMode::CharacterCounted).unwrap();

    // 8 chars at 180 cpm = 2.667s, above the 2s floor, plus 0.5s buffer
    assert_secs(timeline[0].length(), 8.0 / 180.0 * 60.0 + 0.5);
    // 9 chars = 3.0s + 0.5s
    assert_secs(timeline[1].length(), 3.5);
    assert_eq!(timeline[1].start, timeline[0].end + Duration::from_secs_f64(0.2));
}

#[test]
fn test_timelineBuilder_withInvalidConfig_shouldReportConfigurationError() {
    for config in [
        pacing(0.0, 1.0, 0.2, 0.5, 0.0),
        pacing(-10.0, 1.0, 0.2, 0.5, 0.0),
        pacing(150.0, -1.0, 0.2, 0.5, 0.0),
        pacing(150.0, 1.0, -0.2, 0.5, 0.0),
        pacing(150.0, 1.0, 0.2, -0.5, 0.0),
        pacing(150.0, 1.0, 0.2, 0.5, -0.1),
        pacing(f64::NAN, 1.0, 0.2, 0.5, 0.0),
    ] {
        let result = TimelineBuilder::new(config, LanguageMode::WordCounted);
        assert!(matches!(result, Err(TimingError::Configuration(_))), "accepted {:?}", config);
    }
}

#[test]
fn test_buildTimeline_withEmptyTextAndNoFloor_shouldRejectEmptyWindow() {
    let segments = Segment::sequence(["fine", "   "]);
    let config = pacing(150.0, 0.0, 0.2, 0.0, 0.0);

    let result = build_timeline(&segments, &config, LanguageMode::WordCounted);

    match result {
        Err(TimingError::Configuration(message)) => assert!(message.contains("segment 2")),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_buildTimeline_withHugeValidDurations_shouldReportOverflowNotPanic() {
    let segments = Segment::sequence(["Once upon a time,", "There is a village."]);
    let config = pacing(150.0, 1e19, 0.2, 1e19, 0.0);
    assert!(config.validate().is_ok());

    let result = build_timeline(&segments, &config, LanguageMode::WordCounted);

    match result {
        Err(TimingError::Configuration(message)) => assert!(message.contains("segment 1")),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_buildTimeline_withPauseBelowNanosecond_shouldReject() {
    let segments = Segment::sequence(["one", "two"]);
    let config = pacing(60.0, 1.0, 1e-10, 0.0, 0.0);

    let result = build_timeline(&segments, &config, LanguageMode::WordCounted);

    assert!(matches!(result, Err(TimingError::Configuration(_))));
}

#[test]
fn test_buildTimeline_withOneNanosecondPause_shouldKeepWindowsApart() {
    let segments = Segment::sequence(["one", "two"]);
    let config = pacing(60.0, 1.0, 1e-9, 0.0, 0.0);

    let timeline = build_timeline(&segments, &config, LanguageMode::WordCounted).unwrap();

    let windows = timeline.windows();
    assert!(windows[0].end < windows[1].start);
}

#[test]
fn test_estimateDuration_withEmptyText_shouldYieldFloor() {
    assert_eq!(estimate_duration("", 150.0, 1.0, LanguageMode::WordCounted).unwrap(), 1.0);
    assert_eq!(estimate_duration("", 180.0, 2.0, LanguageMode::CharacterCounted).unwrap(), 2.0);
}

fn segment_texts() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}( [a-z]{1,8}){0,6}", 0..20)
}

fn pacing_configs() -> impl Strategy<Value = PacingConfig> {
    (1.0f64..400.0, 0.0f64..5.0, 0.0f64..2.0, 0.0f64..10.0, 0.0f64..2.0)
        .prop_map(|(rate, min, pause, offset, buffer)| pacing(rate, min, pause, offset, buffer))
}

proptest! {
    #[test]
    fn prop_windows_shouldBeContiguousWithPause(texts in segment_texts(), config in pacing_configs()) {
        let segments = Segment::sequence(texts);
        let timeline = build_timeline(&segments, &config, LanguageMode::WordCounted).unwrap();
        let pause = Duration::from_secs_f64(config.pause);

        prop_assert_eq!(timeline.len(), segments.len());
        for pair in timeline.windows().windows(2) {
            prop_assert_eq!(pair[0].end + pause, pair[1].start);
            prop_assert!(pair[0].end <= pair[1].start);
            if config.pause > 0.0 {
                prop_assert!(pair[0].end < pair[1].start);
            }
        }
    }

    #[test]
    fn prop_windowLength_shouldBeFlooredEstimatePlusBuffer(texts in segment_texts(), config in pacing_configs()) {
        let segments = Segment::sequence(texts);
        let timeline = build_timeline(&segments, &config, LanguageMode::WordCounted).unwrap();

        for (segment, window) in segments.iter().zip(timeline.iter()) {
            let base = estimate_duration(&segment.text, config.rate, config.min_duration, LanguageMode::WordCounted).unwrap();
            prop_assert!(base >= config.min_duration);
            prop_assert_eq!(window.length(), Duration::from_secs_f64(base + config.extra_buffer));
            prop_assert!(window.end > window.start);
        }
    }
}
