//! Helpers for turning retrieved snippets into context messages.

use std::path::Path;

use little_chat_model::{ContextFile, ContextMessage, Message, Speaker};

use crate::timestamp::short_timestamp;

const ACKNOWLEDGEMENT: &str = "Ok.";

/// Builds the human/assistant pair that presents one snippet to the model.
///
/// Markdown and plain-text files are quoted as prose, everything else as a
/// fenced code block tagged with the file's extension.
pub fn context_pair(file: ContextFile, content: &str) -> [ContextMessage; 2] {
    let extension = Path::new(&file.file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let text = match extension {
        "md" | "markdown" | "txt" => format!(
            "Use the following text from file `{}`:\n{content}",
            file.file_name
        ),
        lang => format!(
            "Use following code snippet from file `{}`:\n```{lang}\n{content}\n```",
            file.file_name
        ),
    };

    let timestamp = short_timestamp();
    [
        ContextMessage {
            message: Message::new(Speaker::Human, text, &timestamp),
            file: Some(file),
        },
        ContextMessage {
            message: Message::new(
                Speaker::Assistant,
                ACKNOWLEDGEMENT,
                timestamp,
            ),
            file: None,
        },
    ]
}
