/*!
 * LLM-backed collaborators that feed the timing core.
 *
 * - `core`: chat service wrapping the configured provider, with retries
 * - `prompts`: prompt templates for segmentation and translation
 * - `segmenter`: raw text to ordered segments (LLM or punctuation rules)
 * - `translator`: ordered segments to index-aligned translations
 */

pub use self::core::{ChatService, RetryPolicy};
pub use self::prompts::PromptTemplate;
pub use self::segmenter::{
    parse_segment_list, segments_or_fallback, split_sentences, LlmSegmenter, RuleSegmenter, Segmenter,
};
pub use self::translator::{LlmTranslator, ProgressCallback, Translator};

pub mod core;
pub mod prompts;
pub mod segmenter;
pub mod translator;
