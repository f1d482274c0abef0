use little_chat_core::{Interaction, PromptBudget, Transcript, short_timestamp};
use little_chat_model::{
    ChatMessage, ContextMessage, Error, Exchange, Message, Speaker,
};

const ACKNOWLEDGEMENT: &str = "Understood. I'll follow these instructions.";

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    budget: PromptBudget,
    preamble: Vec<Message>,
}

impl SessionBuilder {
    /// Creates a session builder with the built-in system prompt and the
    /// default prompt budget.
    pub fn new() -> Self {
        Self {
            budget: PromptBudget::default(),
            preamble: system_prompt_preamble(include_str!(
                "./system_prompt.md"
            )),
        }
    }

    /// Sets the prompt budget.
    #[inline]
    pub fn with_budget(mut self, budget: PromptBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the system prompt.
    ///
    /// The prompt is sent as a human message, followed by an assistant
    /// message acknowledging it.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.preamble = system_prompt_preamble(prompt);
        self
    }

    /// Replaces the preamble with arbitrary messages.
    #[inline]
    pub fn with_preamble(mut self, preamble: Vec<Message>) -> Self {
        self.preamble = preamble;
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        Session {
            transcript: Transcript::with_budget(self.budget),
            preamble: self.preamble,
        }
    }
}

impl Default for SessionBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

fn system_prompt_preamble<S: Into<String>>(prompt: S) -> Vec<Message> {
    let timestamp = short_timestamp();
    vec![
        Message::new(Speaker::Human, prompt, &timestamp),
        Message::new(Speaker::Assistant, ACKNOWLEDGEMENT, timestamp),
    ]
}

/// A chat session, like a window that displays messages and has an input box.
///
/// The session owns the transcript of one conversation and the preamble
/// that leads every prompt built from it.
pub struct Session {
    transcript: Transcript,
    preamble: Vec<Message>,
}

impl Session {
    /// Sends a message with the context retrieved for it.
    pub fn send_message(&mut self, text: &str, context: Vec<ContextMessage>) {
        let interaction = Interaction::new(human_message(text), context);
        self.transcript.add_interaction(Some(interaction));
    }

    /// Sends a message whose context is still being retrieved.
    pub fn send_message_with_deferred_context<F>(
        &mut self,
        text: &str,
        context: F,
    ) where
        F: Future<Output = Result<Vec<ContextMessage>, Error>>
            + Send
            + 'static,
    {
        let interaction =
            Interaction::with_deferred_context(human_message(text), context);
        self.transcript.add_interaction(Some(interaction));
    }

    /// Sends any kind of exchange.
    #[inline]
    pub fn send_exchange<E: Exchange>(&mut self, exchange: E) {
        self.transcript.add_interaction(Some(exchange));
    }

    /// Records the assistant's reply to the latest message.
    #[inline]
    pub fn add_assistant_response(&mut self, text: &str) {
        self.transcript.add_assistant_response(text);
    }

    /// Starts a new conversation. The preamble is kept.
    #[inline]
    pub fn reset(&mut self) {
        self.transcript.reset();
    }

    /// Returns the messages to display.
    #[inline]
    pub fn chat(&self) -> Vec<ChatMessage> {
        self.transcript.to_chat()
    }

    /// Builds the prompt for the next completion request.
    pub async fn prompt(&self) -> Result<Vec<Message>, Error> {
        self.transcript.to_prompt(self.preamble.clone()).await
    }

    /// Returns the preamble of every prompt.
    #[inline]
    pub fn preamble(&self) -> &[Message] {
        &self.preamble
    }

    /// Returns the underlying transcript.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

fn human_message(text: &str) -> Message {
    Message::new(Speaker::Human, text, short_timestamp())
}

#[cfg(test)]
mod tests {
    use little_chat_core::context::context_pair;
    use little_chat_model::{ContextFile, ErrorKind};
    use little_chat_test_exchange::{ScriptedExchange, ScriptedTurn};

    use super::*;

    fn texts(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.text.as_str()).collect()
    }

    #[tokio::test]
    async fn test_conversation() {
        let mut session = SessionBuilder::new()
            .with_system_prompt("Be brief.")
            .build();

        session.send_message("Hi", vec![]);
        session.add_assistant_response("Hello");
        let context =
            context_pair(ContextFile::new("notes.txt"), "Buy milk").to_vec();
        session.send_message("What's on my list?", context);

        let prompt = session.prompt().await.unwrap();
        assert_eq!(prompt.len(), 8);
        assert_eq!(prompt[0].text, "Be brief.");
        assert_eq!(prompt[1].text, ACKNOWLEDGEMENT);
        assert_eq!(
            texts(&prompt[2..]),
            [
                "Hi",
                "Hello",
                "Use the following text from file `notes.txt`:\nBuy milk",
                "Ok.",
                "What's on my list?",
                "",
            ]
        );

        let chat = session.chat();
        assert_eq!(chat.len(), 3);
        assert_eq!(chat[2].context_files, vec![ContextFile::new("notes.txt")]);

        session.reset();
        assert!(session.chat().is_empty());
        assert_eq!(session.prompt().await.unwrap(), session.preamble());
    }

    #[tokio::test]
    async fn test_deferred_context_failure() {
        let mut session = SessionBuilder::new().with_preamble(vec![]).build();
        session.send_message_with_deferred_context("Hi", async {
            Err::<Vec<ContextMessage>, _>(
                Error::context_unavailable().with_reason("no such file"),
            )
        });

        let err = session.prompt().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContextUnavailable);
        assert_eq!(err.reason(), "no such file");
    }

    #[tokio::test]
    async fn test_budget_applies_to_history() {
        let budget = PromptBudget::builder().with_max_prompt_length(3).build();
        let mut session = SessionBuilder::new()
            .with_budget(budget)
            .with_preamble(vec![])
            .build();

        session.send_exchange(ScriptedExchange::new(
            ScriptedTurn::new("older question").with_reply("older answer"),
        ));
        session.send_exchange(ScriptedExchange::new(
            ScriptedTurn::new("new").with_reply("one"),
        ));

        let prompt = session.prompt().await.unwrap();
        assert_eq!(texts(&prompt), ["new", "one"]);
        assert_eq!(session.transcript().len(), 2);
    }
}
