//! Content host clients: the REST host and an in-memory stand-in.

mod client;
mod dto;
mod memory;

pub use client::RestHost;
pub use dto::{ArticlePayload, CreatedArticle, MetaEntry, MetaValue, TaxonomyPayload};
pub use memory::{MemoryHost, StoredArticle};
