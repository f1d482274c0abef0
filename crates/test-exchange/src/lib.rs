//! A scripted fake exchange for testing purpose.

mod journal;
mod preset;

use std::time::Duration;

use little_chat_model::{ChatMessage, Error, Exchange, Message, Speaker};
use tokio::time::sleep;

pub use journal::CallJournal;
pub use preset::*;

const TIMESTAMP: &str = "00:00";

/// A fake exchange that behaves as its [`ScriptedTurn`] says.
///
/// Every call can be delayed to simulate slow context resolution, and
/// recorded in a shared [`CallJournal`] to check the order in which a
/// transcript visits its exchanges.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Debug)]
pub struct ScriptedExchange {
    turn: ScriptedTurn,
    assistant: Option<Message>,
    delay: Option<Duration>,
    journal: Option<CallJournal>,
}

impl ScriptedExchange {
    /// Creates an exchange following the given turn.
    #[inline]
    pub fn new(turn: ScriptedTurn) -> Self {
        let assistant = turn
            .reply
            .as_ref()
            .map(|reply| Message::new(Speaker::Assistant, reply, TIMESTAMP));
        Self {
            turn,
            assistant,
            delay: None,
            journal: None,
        }
    }

    /// Delays every asynchronous call by `duration`.
    #[inline]
    pub fn with_delay(mut self, duration: Duration) -> Self {
        self.delay = Some(duration);
        self
    }

    /// Records every asynchronous call into `journal`.
    #[inline]
    pub fn with_journal(mut self, journal: CallJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    async fn simulate(&self, call: String) {
        let _guard = self.journal.as_ref().map(|j| j.enter(call));
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }
    }

    fn fails(&self, failure: ScriptedFailure) -> bool {
        self.turn.failure == Some(failure)
    }
}

impl Exchange for ScriptedExchange {
    async fn has_context(&self) -> Result<bool, Error> {
        self.simulate(format!("has_context({})", self.turn.human))
            .await;
        if self.fails(ScriptedFailure::HasContext) {
            return Err(Error::context_unavailable()
                .with_reason(format!("scripted: {}", self.turn.human)));
        }
        Ok(!self.turn.context.is_empty())
    }

    async fn to_prompt_messages(
        &self,
        include_context: bool,
    ) -> Result<Vec<Message>, Error> {
        self.simulate(format!(
            "to_prompt_messages({}, {include_context})",
            self.turn.human
        ))
        .await;
        if self.fails(ScriptedFailure::Render) {
            return Err(Error::render_failed()
                .with_reason(format!("scripted: {}", self.turn.human)));
        }
        if self.turn.human.is_empty() {
            return Ok(vec![]);
        }

        let mut messages = vec![];
        if include_context {
            for snippet in &self.turn.context {
                messages.push(Message::new(Speaker::Human, snippet, TIMESTAMP));
                messages.push(Message::new(
                    Speaker::Assistant,
                    "Ok.",
                    TIMESTAMP,
                ));
            }
        }
        messages.push(Message::new(
            Speaker::Human,
            &self.turn.human,
            TIMESTAMP,
        ));
        messages.push(self.assistant.clone().unwrap_or_else(|| {
            Message::new(Speaker::Assistant, "", TIMESTAMP)
        }));
        Ok(messages)
    }

    fn to_display_messages(&self) -> Vec<ChatMessage> {
        if self.turn.human.is_empty() {
            return vec![];
        }
        let human = Message::new(Speaker::Human, &self.turn.human, TIMESTAMP);
        let mut messages = vec![ChatMessage::from(human)];
        messages.extend(self.assistant.clone().map(ChatMessage::from));
        messages
    }

    #[inline]
    fn set_assistant_message(&mut self, message: Message) {
        self.assistant = Some(message);
    }
}
