use serde::{Deserialize, Serialize};

/// Which operation of a scripted exchange should fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedFailure {
    /// `has_context` fails with a `ContextUnavailable` error.
    HasContext,
    /// `to_prompt_messages` fails with a `RenderFailed` error.
    Render,
}

/// The script of one conversation turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptedTurn {
    /// What the user said.
    pub human: String,
    /// The assistant's reply, if it has arrived.
    #[serde(default)]
    pub reply: Option<String>,
    /// Context snippets. Each one is rendered as a snippet/"Ok." pair.
    #[serde(default)]
    pub context: Vec<String>,
    /// If set, the given operation always fails.
    #[serde(default)]
    pub failure: Option<ScriptedFailure>,
}

impl ScriptedTurn {
    /// Creates a turn with only the human message.
    #[inline]
    pub fn new<S: Into<String>>(human: S) -> Self {
        Self {
            human: human.into(),
            reply: None,
            context: vec![],
            failure: None,
        }
    }

    /// Sets the assistant's reply.
    #[inline]
    pub fn with_reply<S: Into<String>>(mut self, reply: S) -> Self {
        self.reply = Some(reply.into());
        self
    }

    /// Sets the context snippets.
    #[inline]
    pub fn with_context<I, S>(mut self, context: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context = context.into_iter().map(Into::into).collect();
        self
    }

    /// Makes an operation fail.
    #[inline]
    pub fn with_failure(mut self, failure: ScriptedFailure) -> Self {
        self.failure = Some(failure);
        self
    }
}
