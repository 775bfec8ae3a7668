//! Bot loops driven by the scheduled trigger.

mod generation;
mod sharing;

pub use generation::{GenerationBot, GenerationMessage};
pub use sharing::{ShareBot, ShareMessage};
