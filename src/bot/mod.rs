//! Discord bot integration.
//!
//! The bot registers a small set of slash commands when it connects and answers
//! command interactions. Every connection event and command invocation is recorded on
//! the `bot` log channel.
//!
//! # Gateway Intents
//!
//! Slash commands arrive as interactions, which need no privileged intents. The bot
//! only requests `GUILDS` so guild availability events keep the cache warm.

pub mod command;
pub mod handler;
pub mod registrar;
pub mod start;
