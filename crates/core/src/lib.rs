//! Core logic including the conversation transcript and the retrying
//! chat client.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod chat_client;
pub mod conversation;

pub use chat_client::{ChatClient, ChatClientBuilder, RetryNotice};
