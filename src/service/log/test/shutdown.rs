use super::*;

/// Tests that shutdown cancels an armed rate-limit retry.
///
/// Expected: channel Idle with the batch still queued, no further delivery
#[tokio::test(start_paused = true)]
async fn cancels_armed_retry() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::scripted([Reply::RateLimited(None)]));
    let pipeline = mock_pipeline(&test, &sink, FlushSettings::default());

    pipeline.record(BOT_CHANNEL, "X").unwrap();
    sleep(Duration::from_millis(600)).await;
    assert_eq!(pipeline.phase(BOT_CHANNEL), Some(ChannelPhase::RetryWait));

    pipeline.shutdown().await;
    assert_eq!(pipeline.phase(BOT_CHANNEL), Some(ChannelPhase::Idle));
    assert_eq!(pipeline.pending_len(BOT_CHANNEL), Some(1));

    sleep(Duration::from_secs(30)).await;
    assert_eq!(sink.call_count(), 1);
}

/// Tests that shutdown cancels a flush cycle still in its debounce.
///
/// Expected: nothing delivered
#[tokio::test(start_paused = true)]
async fn cancels_pending_debounce() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::default());
    let pipeline = mock_pipeline(&test, &sink, FlushSettings::default());

    pipeline.record(BOT_CHANNEL, "X").unwrap();
    pipeline.shutdown().await;
    sleep(Duration::from_secs(5)).await;

    assert_eq!(sink.call_count(), 0);
    assert_eq!(pipeline.phase(BOT_CHANNEL), Some(ChannelPhase::Idle));
}

/// Tests recording after shutdown.
///
/// Expected: Ok, written to the local log, nothing queued or delivered
#[tokio::test(start_paused = true)]
async fn records_after_shutdown_only_log_locally() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::default());
    let pipeline = mock_pipeline(&test, &sink, FlushSettings::default());

    pipeline.shutdown().await;
    pipeline.record(BOT_CHANNEL, "late line").unwrap();
    sleep(Duration::from_secs(5)).await;

    assert_eq!(sink.call_count(), 0);
    assert_eq!(pipeline.pending_len(BOT_CHANNEL), Some(0));
    assert!(test.read_logs().unwrap().contains("late line"));
}
