/*!
 * Tests for segment list parsing and the segmenters
 */

use dualsrt::errors::SegmentationError;
use dualsrt::providers::mock::{MockProvider, MockRequest};
use dualsrt::translation::{
    parse_segment_list, segments_or_fallback, split_sentences, ChatService, LlmSegmenter, RetryPolicy,
    RuleSegmenter, Segmenter,
};

fn no_retry() -> RetryPolicy {
    RetryPolicy { retry_count: 0, backoff_ms: 1 }
}

fn list_reply(_request: &MockRequest) -> String {
    "Here you go:\n```json\n[\"在很久很久以前，\", \"有一个美丽的村庄。\"]\n```".to_string()
}

fn prose_reply(_request: &MockRequest) -> String {
    "I could not split this text.".to_string()
}

#[test]
fn test_parseSegmentList_withEmptyResponse_shouldReportEmptyResponse() {
    assert_eq!(parse_segment_list("  \n "), Err(SegmentationError::EmptyResponse));
}

#[test]
fn test_parseSegmentList_withSurroundingText_shouldFindList() {
    let items = parse_segment_list("The segments are: [\"a\", \"b\"] as requested.").unwrap();
    assert_eq!(items, vec!["a", "b"]);
}

#[test]
fn test_parseSegmentList_withBlankItems_shouldDropThem() {
    let items = parse_segment_list(r#"["  first ", "", "   ", "second"]"#).unwrap();
    assert_eq!(items, vec!["first", "second"]);
}

#[test]
fn test_parseSegmentList_withNonStringItems_shouldBeMalformed() {
    assert!(matches!(parse_segment_list("[1, 2, 3]"), Err(SegmentationError::Malformed(_))));
    assert!(matches!(parse_segment_list("['unterminated"), Err(SegmentationError::Malformed(_))));
}

#[test]
fn test_segmentsOrFallback_withEmptyList_shouldUseWholeResponse() {
    assert_eq!(segments_or_fallback("[]"), vec!["[]"]);
}

#[test]
fn test_splitSentences_withNewlines_shouldAlwaysSplit() {
    let segments = split_sentences("Title line\nFirst sentence. Second one!\n\n第三句。");
    assert_eq!(segments, vec!["Title line", "First sentence.", "Second one!", "第三句。"]);
}

#[test]
fn test_splitSentences_withCjkQuotes_shouldKeepClosingQuote() {
    let segments = split_sentences("他说：“走吧。”我们就走了。");
    assert_eq!(segments, vec!["他说：“走吧。”", "我们就走了。"]);
}

#[tokio::test]
async fn test_llmSegmenter_withListReply_shouldReturnItems() {
    let chat = ChatService::with_mock(MockProvider::working().with_custom_response(list_reply), no_retry());
    let segmenter = LlmSegmenter::new(chat, "zh");

    let segments = segmenter.segment("在很久很久以前，有一个美丽的村庄。").await.unwrap();

    assert_eq!(segments, vec!["在很久很久以前，", "有一个美丽的村庄。"]);
}

#[tokio::test]
async fn test_llmSegmenter_withProseReply_shouldFallBackToOneSegment() {
    let chat = ChatService::with_mock(MockProvider::working().with_custom_response(prose_reply), no_retry());
    let segmenter = LlmSegmenter::new(chat, "en");

    let segments = segmenter.segment("Some text.").await.unwrap();

    assert_eq!(segments, vec!["I could not split this text."]);
}

#[tokio::test]
async fn test_llmSegmenter_withBlankInput_shouldNotCallProvider() {
    let mock = MockProvider::working();
    let segmenter = LlmSegmenter::new(ChatService::with_mock(mock.clone(), no_retry()), "en");

    assert!(segmenter.segment("   ").await.unwrap().is_empty());
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_llmSegmenter_withFailingProvider_shouldPropagateError() {
    let segmenter = LlmSegmenter::new(ChatService::with_mock(MockProvider::failing(), no_retry()), "en");
    assert!(segmenter.segment("Some text.").await.is_err());
}

#[test]
fn test_ruleSegmenter_shouldSplitOffline() {
    let segments = tokio_test::block_on(RuleSegmenter.segment("One. Two.")).unwrap();
    assert_eq!(segments, vec!["One.", "Two."]);
}
