/*!
 * Segment-by-segment translation.
 *
 * Each segment is sent as its own request. Requests run with bounded
 * concurrency and results are returned in input order, so the output is
 * index-aligned with the input.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info};

use super::core::ChatService;
use super::prompts;

/// Called with (completed, total) after each segment finishes
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Translates ordered segments 1:1
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        segments: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>>;
}

/// Translator backed by an LLM
pub struct LlmTranslator {
    chat: ChatService,
    progress: Option<ProgressCallback>,
}

impl LlmTranslator {
    pub fn new(chat: ChatService) -> Self {
        Self { chat, progress: None }
    }

    /// Report progress through `callback`
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    async fn translate_one(
        &self,
        index: usize,
        segment: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String> {
        let (system, user) = prompts::translation_prompts(source_language, target_language, segment);
        let reply = self
            .chat
            .chat(&system, &user)
            .await
            .with_context(|| format!("Failed to translate segment {}", index + 1))?;

        let translated = reply.trim();
        if translated.is_empty() {
            return Err(anyhow!("Empty translation for segment {}", index + 1));
        }
        debug!("Segment {}: {} -> {}", index + 1, segment, translated);
        Ok(translated.to_string())
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(
        &self,
        segments: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>> {
        let total = segments.len();
        let completed = AtomicUsize::new(0);
        info!(
            "Translating {} segments from {} to {} with {} ({} concurrent)",
            total,
            source_language,
            target_language,
            self.chat.model(),
            self.chat.concurrent_requests()
        );

        let translations: Vec<String> = stream::iter(segments.iter().cloned().enumerate())
            .map(|(index, segment): (usize, String)| {
                let completed = &completed;
                async move {
                    let translated = self
                        .translate_one(index, &segment, source_language, target_language)
                        .await?;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(progress) = &self.progress {
                        progress(done, total);
                    }
                    Ok::<_, anyhow::Error>(translated)
                }
            })
            .buffered(self.chat.concurrent_requests())
            .try_collect()
            .await?;

        Ok(translations)
    }
}
