//! Social publisher with retry and deferral rules.

mod client;
mod dto;

pub use client::FacebookClient;
pub use dto::{FeedPostRequest, FeedPostResponse, GraphError, GraphErrorClass, GraphErrorEnvelope};
