/*!
 * Prompt templates for segmentation and translation.
 *
 * Templates use `{source_language}`, `{target_language}` and `{input_text}`
 * placeholders. The input text always comes last, after a blank line.
 */

use crate::language_utils;

/// A prompt with placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// System prompt for the segmenter
    pub const SEGMENTER_SYSTEM: &'static str = "You are a professional subtitle assistant.";

    /// Asks for the text split into subtitle-sized pieces, as a JSON array
    pub const SEGMENTER_USER: &'static str = "Split the following {source_language} text into short \
sentences or clauses suitable for subtitles. Keep the original wording and order, do not translate, \
do not merge or drop content. Return ONLY a JSON array of strings, with no numbering and no commentary.\n\n\
{input_text}";

    /// System prompt for the translator
    pub const TRANSLATOR_SYSTEM: &'static str =
        "You are a professional {source_language} to {target_language} subtitle translator.";

    /// Asks for a single line translated, with nothing else in the reply
    pub const TRANSLATOR_USER: &'static str = "Translate the following {source_language} subtitle line \
into fluent, accurate and natural {target_language}. Output only the translation itself: no numbering, \
no summary, no explanation.\n\n{input_text}";

    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Substitute the placeholders; language codes are shown by name when known
    pub fn render(&self, source_language: &str, target_language: &str, input_text: &str) -> String {
        self.template
            .replace("{source_language}", &display_language(source_language))
            .replace("{target_language}", &display_language(target_language))
            .replace("{input_text}", input_text)
    }
}

fn display_language(code: &str) -> String {
    language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string())
}

/// (system, user) prompts asking the model to segment `text`
pub fn segmentation_prompts(source_language: &str, text: &str) -> (String, String) {
    (
        PromptTemplate::new(PromptTemplate::SEGMENTER_SYSTEM).render(source_language, "", text),
        PromptTemplate::new(PromptTemplate::SEGMENTER_USER).render(source_language, "", text),
    )
}

/// (system, user) prompts asking the model to translate one segment
pub fn translation_prompts(source_language: &str, target_language: &str, segment: &str) -> (String, String) {
    (
        PromptTemplate::new(PromptTemplate::TRANSLATOR_SYSTEM).render(source_language, target_language, segment),
        PromptTemplate::new(PromptTemplate::TRANSLATOR_USER).render(source_language, target_language, segment),
    )
}
