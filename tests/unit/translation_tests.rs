/*!
 * Tests for the chat service, prompts and per-segment translation
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dualsrt::app_config::{TranslationConfig, TranslationProvider};
use dualsrt::providers::mock::{MockProvider, MockRequest};
use dualsrt::translation::prompts::{segmentation_prompts, translation_prompts};
use dualsrt::translation::{ChatService, LlmTranslator, RetryPolicy, Translator};

fn quick_retry(retry_count: u32) -> RetryPolicy {
    RetryPolicy { retry_count, backoff_ms: 1 }
}

fn dictionary(request: &MockRequest) -> String {
    match request.payload() {
        "在很久很久以前，" => "Once upon a time,".to_string(),
        "有一个美丽的村庄。" => "There is a village.".to_string(),
        other => format!("<{}>", other),
    }
}

fn padded(request: &MockRequest) -> String {
    format!("\n  {}  \n", request.payload())
}

#[test]
fn test_segmentationPrompts_shouldAskForJsonArrayAndEndWithText() {
    let (system, user) = segmentation_prompts("zh", "在很久很久以前，有一个美丽的村庄。");
    assert!(!system.is_empty());
    assert!(user.contains("Chinese"));
    assert!(user.contains("JSON array"));
    assert!(user.ends_with("\n\n在很久很久以前，有一个美丽的村庄。"));
}

#[test]
fn test_translationPrompts_shouldNameBothLanguages() {
    let (system, user) = translation_prompts("en", "fr", "Hello");
    assert!(system.contains("English") && system.contains("French"));
    assert!(user.ends_with("\n\nHello"));
}

#[test]
fn test_chatService_fromOllamaConfig_shouldUseConfiguredModel() {
    let mut config = TranslationConfig::default();
    config.provider = TranslationProvider::Ollama;
    config.active_provider_config_mut().model = "llama3.2:3b".to_string();

    let service = ChatService::new(&config).unwrap();

    assert_eq!(service.model(), "llama3.2:3b");
    assert_eq!(service.concurrent_requests(), 4);
}

#[test]
fn test_chatService_withEmptyEndpoint_shouldUseProviderDefault() {
    let mut config = TranslationConfig::default();
    config.active_provider_config_mut().endpoint = String::new();

    assert!(ChatService::new(&config).is_ok());
}

#[tokio::test]
async fn test_chatService_withPersistentFailure_shouldStopAfterRetries() {
    let mock = MockProvider::failing();
    let service = ChatService::with_mock(mock.clone(), quick_retry(2));

    assert!(service.chat("system", "user").await.is_err());
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn test_llmTranslator_shouldReturnIndexAlignedTrimmedTranslations() {
    let chat = ChatService::with_mock(MockProvider::working().with_custom_response(dictionary), quick_retry(0));
    let translator = LlmTranslator::new(chat);
    let segments = vec!["在很久很久以前，".to_string(), "有一个美丽的村庄。".to_string()];

    let translations = translator.translate(&segments, "zh", "en").await.unwrap();

    assert_eq!(translations, vec!["Once upon a time,", "There is a village."]);
}

#[tokio::test]
async fn test_llmTranslator_withSlowProvider_shouldPreserveOrder() {
    let chat = ChatService::with_mock(MockProvider::slow(5), quick_retry(0)).with_concurrency(4);
    let translator = LlmTranslator::new(chat);
    let segments: Vec<String> = (0..8).map(|i| format!("s{}", i)).collect();

    let translations = translator.translate(&segments, "en", "de").await.unwrap();

    for (i, translation) in translations.iter().enumerate() {
        assert_eq!(translation, &format!("[MOCK] s{}", i));
    }
}

#[tokio::test]
async fn test_llmTranslator_withPaddedReplies_shouldTrim() {
    let chat = ChatService::with_mock(MockProvider::working().with_custom_response(padded), quick_retry(0));
    let translations = LlmTranslator::new(chat).translate(&["hi".to_string()], "en", "fr").await.unwrap();
    assert_eq!(translations, vec!["hi"]);
}

#[tokio::test]
async fn test_llmTranslator_withIntermittentProvider_shouldRecoverThroughRetries() {
    let progress = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&progress);
    let chat = ChatService::with_mock(MockProvider::intermittent(3), quick_retry(2)).with_concurrency(1);
    let translator = LlmTranslator::new(chat).with_progress(Arc::new(move |done: usize, _total: usize| {
        seen.store(done, Ordering::SeqCst);
    }));
    let segments: Vec<String> = (0..5).map(|i| i.to_string()).collect();

    let translations = translator.translate(&segments, "en", "fr").await.unwrap();

    assert_eq!(translations.len(), 5);
    assert_eq!(progress.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_llmTranslator_withEmptyInput_shouldMakeNoRequests() {
    let mock = MockProvider::working();
    let translator = LlmTranslator::new(ChatService::with_mock(mock.clone(), quick_retry(0)));

    assert!(translator.translate(&[], "en", "fr").await.unwrap().is_empty());
    assert_eq!(mock.request_count(), 0);
}
