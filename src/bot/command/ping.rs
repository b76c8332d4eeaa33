use chrono::{DateTime, Utc};

use super::CommandReply;

/// Replies with the delay between the interaction being created and handled.
///
/// Clock skew can put `invoked_at` after `now`, in which case 0 ms is reported.
pub fn run(invoked_at: DateTime<Utc>, now: DateTime<Utc>) -> CommandReply {
    let latency = (now - invoked_at).num_milliseconds().max(0);

    CommandReply::public(format!("Pong! ({} ms)", latency))
}
