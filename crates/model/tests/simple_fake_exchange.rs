use std::time::Duration;

use little_chat_model::{
    ChatMessage, ContextFile, ContextMessage, Error, ErrorKind, Exchange,
    Message, Speaker,
};
use tokio::time::sleep;

struct FakeExchange {
    human: Message,
    assistant: Option<Message>,
    // `None` means the context lookup fails.
    context: Option<Vec<ContextMessage>>,
}

impl FakeExchange {
    fn new(input: &str) -> Self {
        Self {
            human: Message::new(Speaker::Human, input, "12:00"),
            assistant: None,
            context: Some(vec![]),
        }
    }

    async fn context(&self) -> Result<&[ContextMessage], Error> {
        // Pretend we are waiting on a search backend.
        sleep(Duration::from_millis(1)).await;
        self.context
            .as_deref()
            .ok_or_else(|| Error::context_unavailable().with_reason("offline"))
    }
}

impl Exchange for FakeExchange {
    async fn has_context(&self) -> Result<bool, Error> {
        Ok(!self.context().await?.is_empty())
    }

    async fn to_prompt_messages(
        &self,
        include_context: bool,
    ) -> Result<Vec<Message>, Error> {
        let mut messages = vec![];
        if include_context {
            messages.extend(
                self.context().await?.iter().map(|c| c.message.clone()),
            );
        }
        messages.push(self.human.clone());
        messages.push(self.assistant.clone().unwrap_or_else(|| {
            Message::new(Speaker::Assistant, "", &self.human.timestamp)
        }));
        Ok(messages)
    }

    fn to_display_messages(&self) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::from(self.human.clone())];
        messages.extend(self.assistant.clone().map(ChatMessage::from));
        messages
    }

    fn set_assistant_message(&mut self, message: Message) {
        self.assistant = Some(message);
    }
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn test_render() {
        let mut exchange = FakeExchange::new("What does main do?");
        exchange.context = Some(vec![ContextMessage {
            message: Message::new(Speaker::Human, "fn main() {}", "12:00"),
            file: Some(ContextFile::new("src/main.rs")),
        }]);
        assert!(exchange.has_context().await.unwrap());

        let messages = exchange.to_prompt_messages(false).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "What does main do?");
        assert_eq!(messages[1].speaker, Speaker::Assistant);
        assert!(messages[1].text.is_empty());

        let messages = exchange.to_prompt_messages(true).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].text, "fn main() {}");

        assert_eq!(exchange.to_display_messages().len(), 1);
        exchange.set_assistant_message(Message::new(
            Speaker::Assistant,
            "Nothing.",
            "12:01",
        ));
        let display = exchange.to_display_messages();
        assert_eq!(display.len(), 2);
        assert_eq!(display[1].text, "Nothing.");
    }

    #[tokio::test]
    async fn test_error() {
        let mut exchange = FakeExchange::new("Hi");
        exchange.context = None;
        let err = exchange.has_context().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContextUnavailable);
        assert_eq!(err.reason(), "offline");

        // Without context the exchange still renders.
        let messages = exchange.to_prompt_messages(false).await.unwrap();
        assert_eq!(messages.len(), 2);
    }
}
