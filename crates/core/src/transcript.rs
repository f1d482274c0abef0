//! The conversation history and its rendering into prompts.

use little_chat_model::{ChatMessage, Error, Exchange, Message, Speaker};

use crate::budget::PromptBudget;
use crate::exchange::{AnyExchange, ExchangeObject};
use crate::timestamp::short_timestamp;

/// An ordered history of exchanges for one conversation.
///
/// Exchanges are kept in the order they were added, which is also their
/// chronological order. They can only be removed all at once by
/// [`reset`](Self::reset).
///
/// Mutating methods take `&mut self` and [`to_prompt`](Self::to_prompt)
/// takes `&self`, so the history can't change while a prompt is being
/// built.
#[derive(Default)]
pub struct Transcript {
    interactions: Vec<Box<dyn ExchangeObject>>,
    budget: PromptBudget,
}

impl Transcript {
    /// Creates an empty transcript with the given prompt budget.
    #[inline]
    pub fn with_budget(budget: PromptBudget) -> Self {
        Self {
            interactions: vec![],
            budget,
        }
    }

    /// Returns the prompt budget of this transcript.
    #[inline]
    pub fn budget(&self) -> &PromptBudget {
        &self.budget
    }

    /// Returns the number of exchanges.
    #[inline]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Returns `true` if there are no exchanges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Appends an exchange. `None` is ignored.
    pub fn add_interaction<E: Exchange>(&mut self, interaction: Option<E>) {
        let Some(interaction) = interaction else {
            return;
        };
        self.interactions.push(Box::new(AnyExchange(interaction)));
    }

    /// Attaches the assistant's reply to the latest exchange.
    ///
    /// Does nothing if the transcript is empty.
    pub fn add_assistant_response<S: Into<String>>(&mut self, text: S) {
        let Some(last) = self.interactions.last_mut() else {
            trace!("no interaction to attach the response to");
            return;
        };
        last.set_assistant_message(Message::new(
            Speaker::Assistant,
            text,
            short_timestamp(),
        ));
    }

    /// Removes all exchanges to start a new conversation.
    #[inline]
    pub fn reset(&mut self) {
        self.interactions.clear();
    }

    /// Renders the whole history for the chat UI.
    pub fn to_chat(&self) -> Vec<ChatMessage> {
        self.interactions
            .iter()
            .flat_map(|interaction| interaction.to_display_messages())
            .collect()
    }

    /// Renders the history into messages for the model.
    ///
    /// Only the most recent exchange with a non-empty context contributes
    /// its context. The oldest exchanges are dropped until the history fits
    /// into the budget left after `preamble`, which is always kept in front.
    ///
    /// Any error from an exchange is returned as is.
    pub async fn to_prompt(
        &self,
        preamble: Vec<Message>,
    ) -> Result<Vec<Message>, Error> {
        let context_index = self.last_interaction_with_context_index().await?;
        debug!("context cursor: {context_index:?}");

        let mut messages = vec![];
        for (index, interaction) in self.interactions.iter().enumerate() {
            let include_context = Some(index) == context_index;
            let rendered =
                interaction.to_prompt_messages(include_context).await?;
            messages.extend(rendered);
        }

        let preamble_tokens =
            i64::try_from(self.budget.estimate_all(&preamble))
                .unwrap_or(i64::MAX);
        let max_tokens = i64::try_from(self.budget.max_prompt_length())
            .unwrap_or(i64::MAX);
        let available = max_tokens.saturating_sub(preamble_tokens);
        trace!("preamble uses {preamble_tokens} tokens, {available} left");

        let mut prompt = preamble;
        prompt.extend(self.budget.truncate(messages, available));
        Ok(prompt)
    }

    /// Finds the newest exchange that has a non-empty context.
    ///
    /// Exchanges are checked one at a time from the end, and the scan stops
    /// at the first hit.
    async fn last_interaction_with_context_index(
        &self,
    ) -> Result<Option<usize>, Error> {
        let interactions = self.interactions.iter().enumerate();
        for (index, interaction) in interactions.rev() {
            if interaction.has_context().await? {
                return Ok(Some(index));
            }
            trace!("interaction {index} has no context");
        }
        Ok(None)
    }
}
