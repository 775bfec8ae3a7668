//! Paced text-generation provider (chat-completions API).

mod client;
mod conversions;
mod dto;

pub use client::OpenAiClient;
pub use conversions::{from_chat_response, to_chat_request};
pub use dto::{ChatChoice, ChatMessageDto, ChatRequest, ChatResponse};
