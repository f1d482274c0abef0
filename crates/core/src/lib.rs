//! Conversation history and prompt assembly.
//!
//! A [`Transcript`] keeps the exchanges of one conversation and renders
//! them into the message list that is sent to the model, keeping the most
//! recent history that fits into a [`PromptBudget`].

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod budget;
pub mod context;
mod exchange;
mod interaction;
mod timestamp;
mod transcript;

pub use budget::{PromptBudget, PromptBudgetBuilder};
pub use interaction::Interaction;
pub use timestamp::short_timestamp;
pub use transcript::Transcript;
