//! Discord implementation of the moderation platform.

mod client;
mod handler;
mod platform;

pub use client::BailiffBot;
pub use handler::BailiffHandler;
pub use platform::DiscordPlatform;
