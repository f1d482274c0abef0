use serde::{Deserialize, Serialize};

use crate::ContextFile;

/// Who authored a message.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The user, or anything sent on the user's behalf (such as context
    /// snippets).
    Human,
    /// The model.
    Assistant,
}

/// A message that can be sent to the model.
///
/// `text` is what the model sees. `display_text` is what the UI renders,
/// which may carry markup the model never needs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// The author of this message.
    pub speaker: Speaker,
    /// Model-facing text.
    pub text: String,
    /// UI-facing text.
    pub display_text: String,
    /// A short, display-ready timestamp.
    pub timestamp: String,
}

impl Message {
    /// Creates a message whose display text is the same as its text.
    #[inline]
    pub fn new<S1: Into<String>, S2: Into<String>>(
        speaker: Speaker,
        text: S1,
        timestamp: S2,
    ) -> Self {
        let text = text.into();
        Self {
            speaker,
            display_text: text.clone(),
            text,
            timestamp: timestamp.into(),
        }
    }

    /// Replaces the display text.
    #[inline]
    pub fn with_display_text<S: Into<String>>(
        mut self,
        display_text: S,
    ) -> Self {
        self.display_text = display_text.into();
        self
    }
}

/// A message rendered for the chat UI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// The author of this message.
    pub speaker: Speaker,
    /// Model-facing text.
    pub text: String,
    /// UI-facing text.
    pub display_text: String,
    /// A short, display-ready timestamp.
    pub timestamp: String,
    /// Files whose snippets were used to answer this message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_files: Vec<ContextFile>,
}

impl From<Message> for ChatMessage {
    #[inline]
    fn from(msg: Message) -> Self {
        Self {
            speaker: msg.speaker,
            text: msg.text,
            display_text: msg.display_text,
            timestamp: msg.timestamp,
            context_files: vec![],
        }
    }
}
