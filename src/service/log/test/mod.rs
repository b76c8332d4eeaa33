use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use url::Url;

use crate::model::log::{ChannelConfig, ChannelPhase, FlushSettings, BOT_CHANNEL, SITE_CHANNEL};
use crate::service::log::{local::LocalLog, LogPipeline};
use test_utils::{builder::TestBuilder, context::TestContext};

use self::mock::{MockSink, Reply};

mod record;
mod retry;
mod shutdown;

const BOT_WEBHOOK: &str = "https://discord.test/api/webhooks/1/bot";

/// Pipeline with a webhook on the bot channel only, backed by the mock sink.
fn mock_pipeline(test: &TestContext, sink: &Arc<MockSink>, settings: FlushSettings) -> LogPipeline {
    let channels = vec![
        ChannelConfig::new(BOT_CHANNEL, Some(Url::parse(BOT_WEBHOOK).unwrap())),
        ChannelConfig::new(SITE_CHANNEL, None),
    ];
    let local = LocalLog::create(test.log_dir()).unwrap();

    LogPipeline::new(channels, local, sink.clone(), settings)
}

/// Strips the `[timestamp] ` prefix from every line of a payload.
fn messages(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(|line| line.split_once("] ").map_or(line, |(_, message)| message))
        .collect()
}
