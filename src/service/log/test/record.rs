use super::*;
use crate::error::log::LogError;

/// Tests that records inside one debounce window share a single delivery.
///
/// Records "X" then "Y" on the bot channel back to back and lets the debounce elapse.
///
/// Expected: exactly one delivery whose payload holds X then Y
#[tokio::test(start_paused = true)]
async fn coalesces_records_within_debounce() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::default());
    let pipeline = mock_pipeline(&test, &sink, FlushSettings::default());

    pipeline.record(BOT_CHANNEL, "X").unwrap();
    pipeline.record(BOT_CHANNEL, "Y").unwrap();
    sleep(Duration::from_millis(600)).await;

    let contents = sink.contents();
    assert_eq!(contents.len(), 1);
    assert_eq!(messages(&contents[0]), vec!["X", "Y"]);
}

/// Tests that a payload preserves record order for a longer burst.
///
/// Expected: one delivery with messages 0..20 in call order
#[tokio::test(start_paused = true)]
async fn preserves_record_order() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::default());
    let pipeline = mock_pipeline(&test, &sink, FlushSettings::default());

    let expected: Vec<String> = (0..20).map(|i| format!("line {}", i)).collect();
    for message in &expected {
        pipeline.record(BOT_CHANNEL, message).unwrap();
    }
    sleep(Duration::from_millis(600)).await;

    let contents = sink.contents();
    assert_eq!(contents.len(), 1);
    assert_eq!(messages(&contents[0]), expected);
}

/// Tests that a channel without a webhook never issues a delivery.
///
/// Records 100 lines on the site channel, which has no webhook configured.
///
/// Expected: no sink calls, all 100 lines present in the local log
#[tokio::test(start_paused = true)]
async fn channel_without_webhook_never_delivers() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::default());
    let pipeline = mock_pipeline(&test, &sink, FlushSettings::default());

    for i in 0..100 {
        pipeline.record(SITE_CHANNEL, format!("site {}", i)).unwrap();
    }
    sleep(Duration::from_secs(10)).await;

    assert_eq!(sink.call_count(), 0);
    assert_eq!(pipeline.phase(SITE_CHANNEL), Some(ChannelPhase::Idle));
    assert_eq!(pipeline.pending_len(SITE_CHANNEL), Some(0));
    assert_eq!(test.read_logs().unwrap().lines().count(), 100);
}

/// Tests recording on a channel name the pipeline does not know.
///
/// Expected: Ok, line written locally, no delivery and no channel state
#[tokio::test(start_paused = true)]
async fn unknown_channel_logs_locally_only() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::default());
    let pipeline = mock_pipeline(&test, &sink, FlushSettings::default());

    pipeline.record("audit", "who did what").unwrap();
    sleep(Duration::from_secs(1)).await;

    assert_eq!(sink.call_count(), 0);
    assert_eq!(pipeline.phase("audit"), None);
    assert!(test.read_logs().unwrap().contains("who did what"));
}

/// Tests that every record lands in the local log with its timestamp, in order.
///
/// Expected: local log lines match records across both channels in call order
#[tokio::test(start_paused = true)]
async fn writes_every_record_to_local_log() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::default());
    let pipeline = mock_pipeline(&test, &sink, FlushSettings::default());

    pipeline.record(BOT_CHANNEL, "bot started").unwrap();
    pipeline.record(SITE_CHANNEL, "listening on :8080").unwrap();
    pipeline.record(BOT_CHANNEL, "/ping used by someone").unwrap();

    let logs = test.read_logs().unwrap();
    assert_eq!(
        messages(&logs),
        vec!["bot started", "listening on :8080", "/ping used by someone"]
    );
    assert!(logs.lines().all(|line| line.starts_with('[')));
    assert_eq!(test.log_files().unwrap().len(), 1);
    assert_eq!(pipeline.log_path(), test.log_files().unwrap()[0].as_path());
}

/// Tests that a failing local write surfaces to the caller while a broken
/// remote sink does not.
///
/// Uses `/dev/full`, where every write fails with ENOSPC, as the local log file and
/// a sink that rejects everything.
///
/// Expected: Err(LocalSinkWriteFailed), nothing queued and nothing delivered
#[cfg(target_os = "linux")]
#[tokio::test(start_paused = true)]
async fn local_write_failure_surfaces_to_caller() {
    let sink = Arc::new(MockSink::scripted([Reply::Reject(500)]));
    let channels = vec![ChannelConfig::new(
        BOT_CHANNEL,
        Some(Url::parse(BOT_WEBHOOK).unwrap()),
    )];
    let local = LocalLog::open("/dev/full").unwrap();
    let pipeline = LogPipeline::new(channels, local, sink.clone(), FlushSettings::default());

    let result = pipeline.record(BOT_CHANNEL, "lost");
    sleep(Duration::from_secs(1)).await;

    assert!(matches!(
        result,
        Err(LogError::LocalSinkWriteFailed { .. })
    ));
    assert_eq!(pipeline.pending_len(BOT_CHANNEL), Some(0));
    assert_eq!(sink.call_count(), 0);
}

/// Tests that remote failures never surface from `record`.
///
/// Expected: Ok for every record even though each delivery is rejected
#[tokio::test(start_paused = true)]
async fn remote_outage_does_not_surface_to_caller() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::scripted([
        Reply::Reject(502),
        Reply::Reject(502),
        Reply::Reject(502),
    ]));
    let pipeline = mock_pipeline(&test, &sink, FlushSettings::default());

    for i in 0..3 {
        assert!(pipeline.record(BOT_CHANNEL, format!("attempt {}", i)).is_ok());
        sleep(Duration::from_secs(2)).await;
    }

    assert_eq!(sink.call_count(), 3);
}
