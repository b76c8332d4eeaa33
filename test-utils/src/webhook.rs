//! Canned Discord webhook responses for the mock server.
//!
//! Every log channel gets its own path, `/webhooks/<channel>`, so tests can inspect
//! what each channel delivered independently.

use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Path the mock server serves for a log channel's webhook.
pub fn webhook_path(channel: &str) -> String {
    format!("/webhooks/{}", channel)
}

/// Answers every POST to the channel's webhook with `status`.
///
/// # Arguments
/// - `server` - Mock server to mount the response on
/// - `channel` - Log channel name
/// - `status` - HTTP status code returned to the client
pub async fn mount_status(server: &MockServer, channel: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(webhook_path(channel)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Answers the next `times` POSTs to the channel's webhook with 429.
///
/// Mounted with a higher priority than `mount_status`, so once the rate limited
/// responses are used up the regular response takes over.
///
/// # Arguments
/// - `server` - Mock server to mount the response on
/// - `channel` - Log channel name
/// - `times` - Number of requests answered with 429
/// - `retry_after` - Optional `Retry-After` header value in seconds
pub async fn mount_rate_limit(
    server: &MockServer,
    channel: &str,
    times: u64,
    retry_after: Option<&str>,
) {
    let mut response = ResponseTemplate::new(429).set_body_string(
        r#"{"message": "You are being rate limited.", "retry_after": 0.1, "global": false}"#,
    );
    if let Some(retry_after) = retry_after {
        response = response.insert_header("Retry-After", retry_after);
    }

    Mock::given(method("POST"))
        .and(path(webhook_path(channel)))
        .respond_with(response)
        .up_to_n_times(times)
        .with_priority(1)
        .mount(server)
        .await;
}
