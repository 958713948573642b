/*!
 * Tests for ISO language code utilities
 */

use dualsrt::language_utils::{
    get_language_name, language_codes_match, language_mode_for, normalize_to_part1_or_part2t,
    normalize_to_part2t, validate_language_code, LanguageCodeType,
};
use dualsrt::timing::LanguageMode;

#[test]
fn test_validateLanguageCode_shouldClassifyCodes() {
    assert_eq!(validate_language_code("en").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("ZHO").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("chi").unwrap(), LanguageCodeType::Part2B);
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("").is_err());
}

#[test]
fn test_normalize_shouldConvertBetweenForms() {
    assert_eq!(normalize_to_part2t("zh").unwrap(), "zho");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part1_or_part2t("fra").unwrap(), "fr");
    assert!(normalize_to_part2t("english").is_err());
}

#[test]
fn test_languageCodesMatch_shouldCompareAcrossForms() {
    assert!(language_codes_match("zh", "chi"));
    assert!(language_codes_match("en", "eng"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("en", "invalid"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("ja").unwrap(), "Japanese");
}

#[test]
fn test_languageModeFor_shouldCountCharactersForChineseAndJapanese() {
    for code in ["zh", "zho", "chi", "yue", "cmn", "ja", "jpn"] {
        assert_eq!(language_mode_for(code).unwrap(), LanguageMode::CharacterCounted, "{}", code);
    }
    for code in ["en", "fr", "de", "ko", "ru"] {
        assert_eq!(language_mode_for(code).unwrap(), LanguageMode::WordCounted, "{}", code);
    }
    assert!(language_mode_for("not-a-language").is_err());
}
