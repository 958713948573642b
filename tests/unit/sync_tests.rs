/*!
 * Tests for binding a second language to an existing timeline
 */

use proptest::prelude::*;

use dualsrt::errors::TimingError;
use dualsrt::timing::{
    build_timeline, pace_bilingual, synchronize, LanguageMode, LanguagePacing, PacingBasis, PacingConfig,
    Segment,
};
use crate::common::pacing;

fn english() -> LanguagePacing {
    LanguagePacing::new(pacing(150.0, 1.0, 0.2, 0.5, 0.0), LanguageMode::WordCounted)
}

fn chinese() -> LanguagePacing {
    LanguagePacing::new(PacingConfig::character_counted_default(), LanguageMode::CharacterCounted)
}

fn story() -> (Vec<Segment>, Vec<Segment>) {
    (
        Segment::sequence(["在很久很久以前，", "有一个美丽的村庄。"]),
        Segment::sequence(["Once upon a time,", "There is a village."]),
    )
}

#[test]
fn test_synchronize_shouldShareWindowsWithPrimary() {
    let (source, target) = story();
    let english = english();
    let primary = build_timeline(&target, &english.config, english.mode).unwrap();

    let track = synchronize(source.clone(), &primary).unwrap();

    assert_eq!(track.windows(), primary.windows());
    assert!(track.timeline().shares_storage_with(&primary));
    assert_eq!(track.segments(), source.as_slice());
}

/// Scenario D: three windows, two segments
#[test]
fn test_synchronize_withFewerSegments_shouldReportLengthMismatch() {
    let primary_segments = Segment::sequence(["one", "two", "three"]);
    let primary = build_timeline(&primary_segments, &english().config, LanguageMode::WordCounted).unwrap();

    let result = synchronize(Segment::sequence(["un", "deux"]), &primary);

    assert_eq!(result, Err(TimingError::LengthMismatch { expected: 3, actual: 2 }));
}

#[test]
fn test_synchronize_withMoreSegments_shouldReportLengthMismatch() {
    let primary = build_timeline(&Segment::sequence(["one"]), &english().config, LanguageMode::WordCounted).unwrap();

    let result = synchronize(Segment::sequence(["un", "deux"]), &primary);

    assert!(matches!(result, Err(TimingError::LengthMismatch { expected: 1, actual: 2 })));
}

#[test]
fn test_paceBilingual_byTarget_shouldUseTargetPacing() {
    let (source, target) = story();
    let expected = build_timeline(&target, &english().config, LanguageMode::WordCounted).unwrap();

    let tracks = pace_bilingual(source, target, PacingBasis::Target, chinese(), english()).unwrap();

    assert_eq!(tracks.basis, PacingBasis::Target);
    assert_eq!(tracks.target.windows(), expected.windows());
    assert_eq!(tracks.source.windows(), tracks.target.windows());
    assert!(tracks.source.timeline().shares_storage_with(tracks.target.timeline()));
    assert_eq!(tracks.source.segments()[0].text, "在很久很久以前，");
}

#[test]
fn test_paceBilingual_bySource_shouldUseSourcePacing() {
    let (source, target) = story();
    let expected = build_timeline(&source, &chinese().config, LanguageMode::CharacterCounted).unwrap();

    let tracks = pace_bilingual(source, target, PacingBasis::Source, chinese(), english()).unwrap();

    assert_eq!(tracks.timeline().windows(), expected.windows());
    assert_eq!(tracks.target.windows(), expected.windows());
    assert_eq!(tracks.target.segments()[1].text, "There is a village.");
}

#[test]
fn test_paceBilingual_withUnequalTracks_shouldFailBeforeLayout() {
    let invalid = LanguagePacing::new(pacing(0.0, 1.0, 0.2, 0.5, 0.0), LanguageMode::WordCounted);

    let result = pace_bilingual(
        Segment::sequence(["a", "b"]),
        Segment::sequence(["a"]),
        PacingBasis::Target,
        invalid,
        invalid,
    );

    assert_eq!(result, Err(TimingError::LengthMismatch { expected: 2, actual: 1 }));
}

#[test]
fn test_paceBilingual_withInvalidBasisPacing_shouldReportConfigurationError() {
    let (source, target) = story();
    let invalid = LanguagePacing::new(pacing(-1.0, 1.0, 0.2, 0.5, 0.0), LanguageMode::WordCounted);

    let result = pace_bilingual(source, target, PacingBasis::Target, chinese(), invalid);

    assert!(matches!(result, Err(TimingError::Configuration(_))));
}

#[test]
fn test_pacingBasis_shouldParseAndDisplay() {
    assert_eq!("source".parse::<PacingBasis>().unwrap(), PacingBasis::Source);
    assert_eq!(" Target ".parse::<PacingBasis>().unwrap(), PacingBasis::Target);
    assert!("both".parse::<PacingBasis>().is_err());
    assert_eq!(PacingBasis::default(), PacingBasis::Target);
    assert_eq!(PacingBasis::Source.to_string(), "source");
}

proptest! {
    #[test]
    fn prop_synchronizedWindows_shouldEqualPrimaryWindows(
        primary_texts in prop::collection::vec("[a-z]{1,6}( [a-z]{1,6}){0,5}", 0..15),
        seed in "[a-z]{1,4}",
    ) {
        let primary_segments = Segment::sequence(primary_texts);
        let secondary: Vec<Segment> = primary_segments
            .iter()
            .map(|s| Segment::new(s.ordinal, format!("{} {}", seed, s.ordinal)))
            .collect();
        let timeline = build_timeline(&primary_segments, &english().config, LanguageMode::WordCounted).unwrap();

        let track = synchronize(secondary, &timeline).unwrap();

        prop_assert_eq!(track.windows(), timeline.windows());
        prop_assert!(track.timeline().shares_storage_with(&timeline));
    }
}
