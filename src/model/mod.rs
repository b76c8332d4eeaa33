//! Domain models shared between the bot, the log pipeline and the site supervisor.

pub mod command;
pub mod log;
pub mod site;
