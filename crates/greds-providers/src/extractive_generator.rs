//! Extractive text generation: leading sentences within a character budget.

use greds_core::errors::LibraryResult;
use greds_core::traits::IGenerationProvider;

/// Generation provider that condenses text by taking its leading sentences.
///
/// Sentences are kept whole while they fit the budget; when even the first
/// sentence is too long, it is cut at a character boundary. Output never
/// exceeds `max_chars` characters.
#[derive(Debug, Default)]
pub struct ExtractiveGenerator;

impl ExtractiveGenerator {
    pub fn new() -> Self {
        Self
    }
}

/// Split text into sentences, each ending after `.`, `!` or `?` followed by
/// whitespace (or end of text). Text without terminators is one sentence.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let next_is_boundary = chars
                .peek()
                .map(|(_, next)| next.is_whitespace())
                .unwrap_or(true);
            if next_is_boundary {
                let end = i + c.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    out.push(sentence);
                }
                start = end;
            }
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

/// Cut a string to at most `max_chars` characters, on a char boundary.
fn clamp_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

impl IGenerationProvider for ExtractiveGenerator {
    fn generate(&self, text: &str, max_chars: usize) -> LibraryResult<String> {
        if max_chars == 0 || text.trim().is_empty() {
            return Ok(String::new());
        }

        let mut out = String::new();
        for sentence in sentences(text) {
            let needed = sentence.chars().count() + if out.is_empty() { 0 } else { 1 };
            if out.chars().count() + needed > max_chars {
                break;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(sentence);
        }

        // First sentence alone blew the budget: cut it mid-sentence.
        if out.is_empty() {
            if let Some(first) = sentences(text).first() {
                out = clamp_chars(first, max_chars).trim_end().to_string();
            }
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "extractive"
    }
}
