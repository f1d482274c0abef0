use serde::{Deserialize, Serialize};

use crate::Message;

/// A file that contributed retrieval context to an exchange.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextFile {
    /// Path of the file, relative to its repository.
    pub file_name: String,
    /// Name of the repository the file belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,
    /// Revision the snippet was taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl ContextFile {
    /// Creates a context file with only a file name.
    #[inline]
    pub fn new<S: Into<String>>(file_name: S) -> Self {
        Self {
            file_name: file_name.into(),
            repo_name: None,
            revision: None,
        }
    }

    /// Sets the repository name.
    #[inline]
    pub fn with_repo_name<S: Into<String>>(mut self, repo_name: S) -> Self {
        self.repo_name = Some(repo_name.into());
        self
    }

    /// Sets the revision.
    #[inline]
    pub fn with_revision<S: Into<String>>(mut self, revision: S) -> Self {
        self.revision = Some(revision.into());
        self
    }
}

/// A message derived from retrieval context.
///
/// Context messages are sent to the model ahead of the turn they support.
/// They usually come in human/assistant pairs, so the prompt keeps its
/// alternating shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMessage {
    /// The message to send.
    #[serde(flatten)]
    pub message: Message,
    /// The file this message was derived from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<ContextFile>,
}
