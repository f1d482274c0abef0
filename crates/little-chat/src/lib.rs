//! A chat client core that assembles conversation history into prompts.
//!
//! The crate includes a CLI tool for inspecting the prompts a conversation
//! produces. And you can also use it as a library to bring the transcript
//! handling into your own host apps.

#![deny(missing_docs)]

mod session;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`little_chat_core`] crate.
pub mod core {
    pub use little_chat_core::*;
}

/// Re-exports of [`little_chat_model`] crate.
pub mod model {
    pub use little_chat_model::*;
}
