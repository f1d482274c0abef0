//! Token budgeting for assembled prompts.
//!
//! Costs are estimated from text length rather than by a tokenizer. Length
//! is measured in UTF-16 code units, so a character outside the Basic
//! Multilingual Plane counts twice. The truncation boundary is defined
//! relative to this estimate.

use std::num::NonZeroUsize;

use little_chat_model::Message;

/// Default number of characters that make up one token.
pub const CHARS_PER_TOKEN: NonZeroUsize = NonZeroUsize::new(4).unwrap();

/// Default token budget for a whole prompt, preamble included.
pub const MAX_AVAILABLE_PROMPT_LENGTH: usize = 7000;

/// Builder for [`PromptBudget`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PromptBudgetBuilder {
    chars_per_token: Option<NonZeroUsize>,
    max_prompt_length: Option<usize>,
}

impl PromptBudgetBuilder {
    /// Sets how many characters are counted as one token.
    #[inline]
    pub fn with_chars_per_token(mut self, chars: NonZeroUsize) -> Self {
        self.chars_per_token = Some(chars);
        self
    }

    /// Sets the maximum estimated tokens a prompt may use.
    #[inline]
    pub fn with_max_prompt_length(mut self, tokens: usize) -> Self {
        self.max_prompt_length = Some(tokens);
        self
    }

    /// Builds the budget.
    #[inline]
    pub fn build(self) -> PromptBudget {
        PromptBudget {
            chars_per_token: self.chars_per_token.unwrap_or(CHARS_PER_TOKEN),
            max_prompt_length: self
                .max_prompt_length
                .unwrap_or(MAX_AVAILABLE_PROMPT_LENGTH),
        }
    }
}

/// The token budget of a prompt and the ratio used to estimate costs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PromptBudget {
    chars_per_token: NonZeroUsize,
    max_prompt_length: usize,
}

impl PromptBudget {
    /// Returns a builder starting from the default values.
    #[inline]
    pub fn builder() -> PromptBudgetBuilder {
        PromptBudgetBuilder::default()
    }

    /// Returns how many characters are counted as one token.
    #[inline]
    pub fn chars_per_token(&self) -> NonZeroUsize {
        self.chars_per_token
    }

    /// Returns the maximum estimated tokens a prompt may use.
    #[inline]
    pub fn max_prompt_length(&self) -> usize {
        self.max_prompt_length
    }

    /// Estimates the tokens used by a message.
    ///
    /// Only the model-facing text counts. The result is the UTF-16 length
    /// divided by [`chars_per_token`](Self::chars_per_token), rounded half
    /// up.
    #[inline]
    pub fn estimate_tokens(&self, message: &Message) -> usize {
        estimate_text_tokens(&message.text, self.chars_per_token)
    }

    /// Estimates the tokens used by a sequence of messages.
    #[inline]
    pub fn estimate_all(&self, messages: &[Message]) -> usize {
        messages.iter().map(|m| self.estimate_tokens(m)).sum()
    }

    /// Keeps the newest message pairs that fit into `max_tokens`.
    ///
    /// Messages are consumed from the tail in `(human, assistant)` pairs.
    /// The walk stops at the first pair that doesn't fit, so all older
    /// pairs are dropped even if some of them would fit on their own. A
    /// leading message that doesn't belong to a pair is never kept.
    pub fn truncate(
        &self,
        messages: Vec<Message>,
        max_tokens: i64,
    ) -> Vec<Message> {
        let mut available = max_tokens;
        let mut kept = 0;

        let mut i = messages.len();
        while i >= 2 {
            let human = &messages[i - 2];
            let assistant = &messages[i - 1];
            let cost = (self.estimate_tokens(human)
                + self.estimate_tokens(assistant)) as i64;
            if cost > available {
                trace!(
                    "pair ending at {} costs {cost}, only {available} left",
                    i - 1
                );
                break;
            }
            available -= cost;
            kept += 2;
            i -= 2;
        }

        debug!(
            "kept {kept} of {} messages, {available} tokens left",
            messages.len()
        );

        // The kept pairs form a suffix, already in chat order
        // (older -> newer).
        let first_kept = messages.len() - kept;
        messages.into_iter().skip(first_kept).collect()
    }
}

impl Default for PromptBudget {
    #[inline]
    fn default() -> Self {
        PromptBudgetBuilder::default().build()
    }
}

/// Estimates the tokens used by a piece of text.
#[inline]
pub fn estimate_text_tokens(
    text: &str,
    chars_per_token: NonZeroUsize,
) -> usize {
    let units = text.encode_utf16().count();
    let per_token = chars_per_token.get();
    // round(units / per_token) without going through floats.
    (2 * units + per_token) / (2 * per_token)
}
