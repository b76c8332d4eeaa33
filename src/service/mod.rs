//! Services running alongside the Discord client.
//!
//! - **Log** (`log/`) - Local durable log plus batched webhook delivery per log channel
//! - **Site** (`site`) - Supervision of the secondary web server process

pub mod log;
pub mod site;
