//! Token-aware prompt trimming
//!
//! Uses the `o200k_base` BPE so budgets line up with the token counts the
//! hosted models report.

use crate::types::{AppError, Result};
use tiktoken_rs::CoreBPE;

/// Shortest prefix trimming will ever return, in characters.
pub const MIN_CHUNK_SIZE: usize = 140;

/// Rough characters-per-token ratio used to estimate how much to cut.
const CHARS_PER_TOKEN: usize = 3;

/// Truncates text to a token budget while preserving its prefix.
pub struct PromptTrimmer {
    bpe: CoreBPE,
}

impl PromptTrimmer {
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::o200k_base()
            .map_err(|e| AppError::Internal(format!("Failed to load tokenizer: {}", e)))?;
        Ok(Self { bpe })
    }

    /// Number of tokens in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    /// Trim `text` so it fits in `max_tokens`.
    ///
    /// Text already within budget is returned unchanged. Otherwise the prefix is
    /// shortened by an estimate of the overflow until it fits, but never below
    /// [`MIN_CHUNK_SIZE`] characters.
    pub fn trim(&self, text: &str, max_tokens: usize) -> String {
        let mut current = text;

        loop {
            let tokens = self.count(current);
            if tokens <= max_tokens {
                return current.to_string();
            }

            let overflow = tokens - max_tokens;
            let target = current
                .chars()
                .count()
                .saturating_sub(overflow * CHARS_PER_TOKEN);

            if target < MIN_CHUNK_SIZE {
                return char_prefix(current, MIN_CHUNK_SIZE).to_string();
            }

            current = char_prefix(current, target);
        }
    }
}

/// The first `chars` characters of `text` (all of it if shorter).
fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
