//! Shared vocabulary for chat transcripts.
//!
//! This crate establishes the protocol between a transcript and the
//! exchanges it holds: the messages that flow to the model and to the UI,
//! and the [`Exchange`] contract that every conversation turn implements.
//! A transcript can then hold turns from different sources (plain user
//! input, recipes, replayed history) without knowing how each one resolves
//! its retrieval context.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod context;
mod error;
mod exchange;
mod message;

pub use context::*;
pub use error::*;
pub use exchange::*;
pub use message::*;
