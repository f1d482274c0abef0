use futures_util::future::BoxFuture;
use little_chat_model::{ChatMessage, Error, Exchange, Message};

pub(crate) trait ExchangeObject: Send + Sync + 'static {
    fn has_context(&self) -> BoxFuture<'_, Result<bool, Error>>;

    fn to_prompt_messages(
        &self,
        include_context: bool,
    ) -> BoxFuture<'_, Result<Vec<Message>, Error>>;

    fn to_display_messages(&self) -> Vec<ChatMessage>;

    fn set_assistant_message(&mut self, message: Message);
}

pub(crate) struct AnyExchange<T: Exchange>(pub T);

impl<T: Exchange> ExchangeObject for AnyExchange<T> {
    #[inline]
    fn has_context(&self) -> BoxFuture<'_, Result<bool, Error>> {
        Box::pin(self.0.has_context())
    }

    #[inline]
    fn to_prompt_messages(
        &self,
        include_context: bool,
    ) -> BoxFuture<'_, Result<Vec<Message>, Error>> {
        Box::pin(self.0.to_prompt_messages(include_context))
    }

    #[inline]
    fn to_display_messages(&self) -> Vec<ChatMessage> {
        self.0.to_display_messages()
    }

    #[inline]
    fn set_assistant_message(&mut self, message: Message) {
        self.0.set_assistant_message(message);
    }
}
