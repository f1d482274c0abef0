use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use little_chat_model::{
    ChatMessage, ContextFile, ContextMessage, Error, Exchange, Message,
    Speaker,
};

type ContextResult = Result<Arc<[ContextMessage]>, Error>;

enum Context {
    Resolved(Arc<[ContextMessage]>),
    Deferred(Shared<BoxFuture<'static, ContextResult>>),
}

impl Context {
    async fn resolve(&self) -> ContextResult {
        match self {
            Context::Resolved(context) => Ok(Arc::clone(context)),
            Context::Deferred(fut) => fut.clone().await,
        }
    }

    /// Returns the context if it's available without waiting.
    fn peek(&self) -> Option<&[ContextMessage]> {
        match self {
            Context::Resolved(context) => Some(&context[..]),
            Context::Deferred(fut) => match fut.peek() {
                Some(Ok(context)) => Some(&context[..]),
                _ => None,
            },
        }
    }
}

/// A conversation turn typed by the user.
///
/// The retrieval context of an interaction is usually still being fetched
/// when the interaction is created. It can be given as a future, which is
/// driven the first time the context is needed and then shared by every
/// later query.
pub struct Interaction {
    human: Message,
    assistant: Option<Message>,
    context: Context,
}

impl Interaction {
    /// Creates an interaction with context that is already known.
    pub fn new(human: Message, context: Vec<ContextMessage>) -> Self {
        Self {
            human,
            assistant: None,
            context: Context::Resolved(context.into()),
        }
    }

    /// Creates an interaction whose context is resolved later.
    ///
    /// If the future fails, the error is reported by every operation that
    /// needs the context.
    pub fn with_deferred_context<F>(human: Message, context: F) -> Self
    where
        F: Future<Output = Result<Vec<ContextMessage>, Error>>
            + Send
            + 'static,
    {
        let fut: BoxFuture<'static, ContextResult> =
            async move { context.await.map(Arc::from) }.boxed();
        Self {
            human,
            assistant: None,
            context: Context::Deferred(fut.shared()),
        }
    }

    /// Returns the human message.
    #[inline]
    pub fn human_message(&self) -> &Message {
        &self.human
    }

    /// Returns the assistant message, if the reply has arrived.
    #[inline]
    pub fn assistant_message(&self) -> Option<&Message> {
        self.assistant.as_ref()
    }

    fn context_files(&self) -> Vec<ContextFile> {
        let Some(context) = self.context.peek() else {
            return vec![];
        };
        let mut files: Vec<ContextFile> = vec![];
        for file in context.iter().filter_map(|msg| msg.file.as_ref()) {
            if !files.contains(file) {
                files.push(file.clone());
            }
        }
        files
    }
}

impl Exchange for Interaction {
    async fn has_context(&self) -> Result<bool, Error> {
        let context = self.context.resolve().await?;
        Ok(!context.is_empty())
    }

    async fn to_prompt_messages(
        &self,
        include_context: bool,
    ) -> Result<Vec<Message>, Error> {
        if self.human.text.is_empty() {
            return Ok(vec![]);
        }

        let mut messages = vec![];
        if include_context {
            let context = self.context.resolve().await?;
            messages.extend(context.iter().map(|msg| msg.message.clone()));
        }
        messages.push(self.human.clone());
        // An unanswered turn still takes the assistant's slot, which is
        // where the model continues.
        messages.push(self.assistant.clone().unwrap_or_else(|| {
            Message::new(Speaker::Assistant, "", &self.human.timestamp)
        }));
        Ok(messages)
    }

    fn to_display_messages(&self) -> Vec<ChatMessage> {
        if self.human.text.is_empty() {
            return vec![];
        }

        let mut human = ChatMessage::from(self.human.clone());
        human.context_files = self.context_files();

        let mut messages = vec![human];
        messages.extend(self.assistant.clone().map(ChatMessage::from));
        messages
    }

    #[inline]
    fn set_assistant_message(&mut self, message: Message) {
        self.assistant = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use little_chat_model::ErrorKind;
    use tokio::time::sleep;

    use super::*;
    use crate::context::context_pair;

    fn human(text: &str) -> Message {
        Message::new(Speaker::Human, text, "10:00")
    }

    fn snippets() -> Vec<ContextMessage> {
        let file = ContextFile::new("src/lib.rs");
        let mut context = vec![];
        context.extend(context_pair(file.clone(), "pub mod a;"));
        context.extend(context_pair(file, "pub mod b;"));
        context.extend(context_pair(ContextFile::new("README.md"), "# Hi"));
        context
    }

    #[tokio::test]
    async fn test_render_without_reply() {
        let interaction = Interaction::new(human("Explain"), snippets());
        assert!(interaction.has_context().await.unwrap());

        let messages = interaction.to_prompt_messages(false).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "Explain");
        assert_eq!(messages[1].speaker, Speaker::Assistant);
        assert_eq!(messages[1].text, "");

        let messages = interaction.to_prompt_messages(true).await.unwrap();
        assert_eq!(messages.len(), 8);
        assert!(messages[0].text.contains("pub mod a;"));
        assert_eq!(messages[1].text, "Ok.");
        assert_eq!(messages[6].text, "Explain");
    }

    #[tokio::test]
    async fn test_render_with_reply() {
        let mut interaction = Interaction::new(human("Explain"), vec![]);
        assert!(!interaction.has_context().await.unwrap());

        interaction.set_assistant_message(Message::new(
            Speaker::Assistant,
            "First",
            "10:01",
        ));
        interaction.set_assistant_message(Message::new(
            Speaker::Assistant,
            "Second",
            "10:02",
        ));

        let messages = interaction.to_prompt_messages(true).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, "Second");
        assert_eq!(interaction.to_display_messages().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_human_renders_nothing() {
        let interaction = Interaction::new(human(""), snippets());
        let messages = interaction.to_prompt_messages(true).await.unwrap();
        assert!(messages.is_empty());
        assert!(interaction.to_display_messages().is_empty());
    }

    #[tokio::test]
    async fn test_display_lists_context_files() {
        let interaction = Interaction::new(human("Explain"), snippets());
        let display = interaction.to_display_messages();
        assert_eq!(display.len(), 1);
        assert_eq!(
            display[0].context_files,
            vec![
                ContextFile::new("src/lib.rs"),
                ContextFile::new("README.md"),
            ]
        );
        // Snippets never show up in the UI.
        assert_eq!(display[0].text, "Explain");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_context() {
        let interaction =
            Interaction::with_deferred_context(human("Explain"), async {
                sleep(Duration::from_secs(1)).await;
                Ok::<_, Error>(snippets())
            });

        // Files are unknown until the context has been resolved.
        let display = interaction.to_display_messages();
        assert!(display[0].context_files.is_empty());

        assert!(interaction.has_context().await.unwrap());
        let messages = interaction.to_prompt_messages(true).await.unwrap();
        assert_eq!(messages.len(), 8);
        let display = interaction.to_display_messages();
        assert_eq!(display[0].context_files.len(), 2);
    }

    #[tokio::test]
    async fn test_deferred_context_failure() {
        let interaction =
            Interaction::with_deferred_context(human("Explain"), async {
                Err::<Vec<ContextMessage>, _>(
                    Error::context_unavailable().with_reason("index missing"),
                )
            });

        let err = interaction.has_context().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContextUnavailable);
        // The failure is shared with later callers.
        let err = interaction.to_prompt_messages(true).await.unwrap_err();
        assert_eq!(err.reason(), "index missing");

        // Rendering without context doesn't touch the failed lookup.
        let messages = interaction.to_prompt_messages(false).await.unwrap();
        assert_eq!(messages.len(), 2);
    }
}
