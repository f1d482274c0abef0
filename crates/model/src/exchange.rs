use crate::{ChatMessage, Error, Message};

/// One turn of a conversation: a human message, the assistant's reply once
/// it arrives, and any retrieval context attached to the turn.
///
/// A transcript owns its exchanges exclusively and never calls two of
/// these methods concurrently, so implementations don't need any internal
/// synchronization for the sake of the transcript.
pub trait Exchange: Send + Sync + 'static {
    /// Reports whether this exchange carries a non-empty context.
    ///
    /// Resolving the context may require asynchronous work, such as
    /// waiting for lazily-fetched snippets. A failure to resolve it should
    /// be reported as an error rather than as `false`.
    fn has_context(&self) -> impl Future<Output = Result<bool, Error>> + Send;

    /// Renders this exchange into the messages destined for the model.
    ///
    /// When `include_context` is `true`, context-derived messages (if any)
    /// are placed before the human/assistant pair. Otherwise only the pair
    /// is rendered. An exchange without a human message must render
    /// nothing.
    fn to_prompt_messages(
        &self,
        include_context: bool,
    ) -> impl Future<Output = Result<Vec<Message>, Error>> + Send;

    /// Renders this exchange into messages for the chat UI.
    ///
    /// Raw context payloads must never appear in the returned messages.
    fn to_display_messages(&self) -> Vec<ChatMessage>;

    /// Sets the assistant's reply, replacing any previous one.
    fn set_assistant_message(&mut self, message: Message);
}
