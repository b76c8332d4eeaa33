use crate::model::site::SiteStatus;

use super::CommandReply;

/// Replies with the supervised web server's status.
///
/// The reply is ephemeral when no server is configured, since there is nothing
/// for the rest of the channel to see.
pub fn run(status: &SiteStatus) -> CommandReply {
    match status {
        SiteStatus::NotConfigured => CommandReply::ephemeral("Web server is not configured"),
        status => CommandReply::public(format!("Web server status: {}", status)),
    }
}
