/*!
 * Segmentation of raw text into subtitle-sized pieces.
 *
 * The LLM segmenter asks the model for a list of strings and reads the reply
 * with a strict list parser. Replies that cannot be read fall back to a single
 * segment holding the whole response. The rule segmenter splits on
 * punctuation and needs no network.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SegmentationError;
use super::core::ChatService;
use super::prompts;

/// Code fence around a reply, with an optional language tag
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*(.*?)\s*```$").expect("valid code fence regex")
});

/// Splits raw text into ordered segments
#[async_trait]
pub trait Segmenter: Send + Sync {
    async fn segment(&self, raw_text: &str) -> Result<Vec<String>>;
}

/// Parse a list-like model reply into segments.
///
/// Accepts a JSON array of strings or a bracketed list of single- or
/// double-quoted literals, optionally wrapped in a code fence and surrounded
/// by other text. Items are trimmed and empty items dropped.
pub fn parse_segment_list(response: &str) -> Result<Vec<String>, SegmentationError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(SegmentationError::EmptyResponse);
    }

    let unfenced = match CODE_FENCE.captures(trimmed) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => trimmed,
    };

    let (open, close) = match (unfenced.find('['), unfenced.rfind(']')) {
        (Some(open), Some(close)) if open < close => (open, close),
        _ => return Err(SegmentationError::Malformed("no bracketed list found".to_string())),
    };
    let body = &unfenced[open..=close];

    let items = match serde_json::from_str::<Vec<String>>(body) {
        Ok(items) => items,
        Err(_) => parse_quoted_list(body)?,
    };

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

/// Parse `['a', "b", ...]` with backslash escapes
fn parse_quoted_list(body: &str) -> Result<Vec<String>, SegmentationError> {
    let malformed = |msg: &str| SegmentationError::Malformed(msg.to_string());
    let mut chars = body.chars().peekable();
    let mut items = Vec::new();

    if chars.next() != Some('[') {
        return Err(malformed("list must start with '['"));
    }

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let quote = match chars.next() {
            Some(']') if items.is_empty() => break,
            Some(q @ ('\'' | '"')) => q,
            Some(c) => return Err(SegmentationError::Malformed(format!("unexpected character '{}'", c))),
            None => return Err(malformed("unterminated list")),
        };

        let mut item = String::new();
        loop {
            match chars.next() {
                Some('\\') => match chars.next() {
                    Some('n') => item.push('\n'),
                    Some('t') => item.push('\t'),
                    Some('r') => item.push('\r'),
                    Some(c @ ('\\' | '\'' | '"')) => item.push(c),
                    Some(c) => {
                        item.push('\\');
                        item.push(c);
                    }
                    None => return Err(malformed("unterminated escape")),
                },
                Some(c) if c == quote => break,
                Some(c) => item.push(c),
                None => return Err(malformed("unterminated string literal")),
            }
        }
        items.push(item);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        match chars.next() {
            Some(',') => {
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
                // Trailing comma
                if chars.next_if_eq(&']').is_some() {
                    break;
                }
            }
            Some(']') => break,
            Some(c) => return Err(SegmentationError::Malformed(format!("expected ',' or ']', found '{}'", c))),
            None => return Err(malformed("unterminated list")),
        }
    }

    if chars.any(|c| !c.is_whitespace()) {
        return Err(malformed("trailing content after list"));
    }

    Ok(items)
}

/// Parse a reply, falling back to the whole reply as one segment.
///
/// An empty reply yields no segments.
pub fn segments_or_fallback(response: &str) -> Vec<String> {
    match parse_segment_list(response) {
        Ok(items) if !items.is_empty() => items,
        Ok(_) => {
            warn!("Segmenter returned an empty list, using the whole response as one segment");
            vec![response.trim().to_string()]
        }
        Err(SegmentationError::EmptyResponse) => Vec::new(),
        Err(e) => {
            warn!("{}, using the whole response as one segment", e);
            vec![response.trim().to_string()]
        }
    }
}

const SENTENCE_END: &[char] = &['.', '!', '?', ';', '。', '！', '？', '；', '…'];
const CJK_CLAUSE_END: &[char] = &['，', '、'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '”', '’', '）', '」', '』', '】', '》'];

/// Split text after sentence-final punctuation.
///
/// Latin `.!?;` split only when followed by whitespace. CJK full stops and
/// clause commas always split. Closing quotes and brackets stay with the
/// segment they close. Newlines always split.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut segments = Vec::new();

    for line in text.lines() {
        let mut current = String::new();
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            current.push(c);

            let cjk_break = CJK_CLAUSE_END.contains(&c) || (SENTENCE_END.contains(&c) && !c.is_ascii());
            if !cjk_break && !SENTENCE_END.contains(&c) {
                continue;
            }

            while let Some(closer) = chars.next_if(|n| CLOSERS.contains(n) || SENTENCE_END.contains(n)) {
                current.push(closer);
            }

            let at_boundary = cjk_break || chars.peek().map_or(true, |n| n.is_whitespace());
            if at_boundary {
                push_segment(&mut segments, &mut current);
            }
        }
        push_segment(&mut segments, &mut current);
    }

    debug!("Split text into {} segments", segments.len());
    segments
}

fn push_segment(segments: &mut Vec<String>, current: &mut String) {
    let piece = current.trim();
    if !piece.is_empty() {
        segments.push(piece.to_string());
    }
    current.clear();
}

/// Segmenter backed by an LLM
pub struct LlmSegmenter {
    chat: ChatService,
    source_language: String,
}

impl LlmSegmenter {
    pub fn new(chat: ChatService, source_language: impl Into<String>) -> Self {
        Self {
            chat,
            source_language: source_language.into(),
        }
    }
}

#[async_trait]
impl Segmenter for LlmSegmenter {
    async fn segment(&self, raw_text: &str) -> Result<Vec<String>> {
        if raw_text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let (system, user) = prompts::segmentation_prompts(&self.source_language, raw_text.trim());
        let response = self.chat.chat(&system, &user).await?;
        let segments = segments_or_fallback(&response);
        debug!("Segmenter produced {} segments", segments.len());
        Ok(segments)
    }
}

/// Offline segmenter using punctuation rules
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSegmenter;

#[async_trait]
impl Segmenter for RuleSegmenter {
    async fn segment(&self, raw_text: &str) -> Result<Vec<String>> {
        Ok(split_sentences(raw_text))
    }
}
