//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the marquee binary.

mod cancel;
mod commands;
mod generate;
mod serve;
mod share;
mod status;
mod sweep;
mod wire;

pub use cancel::handle_cancel_command;
pub use commands::{Cli, Commands};
pub use generate::handle_generate_command;
pub use serve::handle_serve_command;
pub use share::handle_share_command;
pub use status::handle_status_command;
pub use sweep::handle_sweep_command;
