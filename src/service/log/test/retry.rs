use super::*;

/// Tests that a rate-limited batch is re-queued at the head and resent after backoff.
///
/// "X" is rate limited at 500ms. "Y" is recorded during the backoff and must queue
/// behind X without starting a new cycle. The retry fires at 5.5s and delivers after
/// its debounce at 6s.
///
/// Expected: RetryWait during backoff, second delivery holds X then Y, Idle afterwards
#[tokio::test(start_paused = true)]
async fn rate_limited_batch_is_requeued_and_retried() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::scripted([Reply::RateLimited(None)]));
    let pipeline = mock_pipeline(&test, &sink, FlushSettings::default());

    pipeline.record(BOT_CHANNEL, "X").unwrap();
    sleep(Duration::from_millis(600)).await;

    assert_eq!(sink.call_count(), 1);
    assert_eq!(pipeline.phase(BOT_CHANNEL), Some(ChannelPhase::RetryWait));
    assert_eq!(pipeline.pending_len(BOT_CHANNEL), Some(1));

    pipeline.record(BOT_CHANNEL, "Y").unwrap();
    assert_eq!(pipeline.phase(BOT_CHANNEL), Some(ChannelPhase::RetryWait));

    sleep(Duration::from_millis(5500)).await;

    let contents = sink.contents();
    assert_eq!(contents.len(), 2);
    assert_eq!(messages(&contents[0]), vec!["X"]);
    assert_eq!(messages(&contents[1]), vec!["X", "Y"]);

    sleep(Duration::from_millis(900)).await;
    assert_eq!(pipeline.phase(BOT_CHANNEL), Some(ChannelPhase::Idle));
    assert_eq!(pipeline.pending_len(BOT_CHANNEL), Some(0));
}

/// Tests that the retry waits for a `Retry-After` longer than the configured backoff.
///
/// Expected: no resend before 8.5s, resend shortly after
#[tokio::test(start_paused = true)]
async fn honours_longer_retry_after() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::scripted([Reply::RateLimited(Some(
        Duration::from_secs(8),
    ))]));
    let pipeline = mock_pipeline(&test, &sink, FlushSettings::default());

    pipeline.record(BOT_CHANNEL, "X").unwrap();
    sleep(Duration::from_secs(6)).await;
    assert_eq!(sink.call_count(), 1);

    sleep(Duration::from_millis(3100)).await;
    assert_eq!(sink.call_count(), 2);
}

/// Tests that a shorter `Retry-After` does not shorten the configured backoff.
///
/// Expected: resend only after the 5s backoff plus debounce
#[tokio::test(start_paused = true)]
async fn backoff_is_a_lower_bound() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::scripted([Reply::RateLimited(Some(
        Duration::from_millis(100),
    ))]));
    let pipeline = mock_pipeline(&test, &sink, FlushSettings::default());

    pipeline.record(BOT_CHANNEL, "X").unwrap();
    sleep(Duration::from_secs(5)).await;
    assert_eq!(sink.call_count(), 1);

    sleep(Duration::from_millis(1100)).await;
    assert_eq!(sink.call_count(), 2);
}

/// Tests that a batch is dropped once it exceeds the retry limit.
///
/// With `max_retries = 2` the batch gets three attempts at 0.5s, 2s and 3.5s and is
/// dropped after the third 429; the cycle then ends at 4s.
///
/// Expected: three attempts, Idle with an empty queue, the next record delivered alone
#[tokio::test(start_paused = true)]
async fn drops_batch_after_max_retries() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::scripted([
        Reply::RateLimited(None),
        Reply::RateLimited(None),
        Reply::RateLimited(None),
    ]));
    let settings = FlushSettings {
        retry_backoff: Duration::from_secs(1),
        max_retries: 2,
        ..FlushSettings::default()
    };
    let pipeline = mock_pipeline(&test, &sink, settings);

    pipeline.record(BOT_CHANNEL, "X").unwrap();
    sleep(Duration::from_secs(5)).await;

    assert_eq!(sink.call_count(), 3);
    assert_eq!(pipeline.phase(BOT_CHANNEL), Some(ChannelPhase::Idle));
    assert_eq!(pipeline.pending_len(BOT_CHANNEL), Some(0));

    pipeline.record(BOT_CHANNEL, "Y").unwrap();
    sleep(Duration::from_millis(600)).await;

    let contents = sink.contents();
    assert_eq!(contents.len(), 4);
    assert_eq!(messages(&contents[3]), vec!["Y"]);
}

/// Tests that a 429 in the middle of a split batch only re-queues the unsent part.
///
/// The first payload is accepted, the second rate limited, so the retry resends the
/// second and third lines only.
///
/// Expected: deliveries [a], [b] (429), then [b], [c]
#[tokio::test(start_paused = true)]
async fn requeues_only_unsent_payloads() {
    let test = TestBuilder::new().build().await.unwrap();
    let sink = Arc::new(MockSink::scripted([
        Reply::Accept,
        Reply::RateLimited(None),
    ]));
    let settings = FlushSettings {
        max_payload_chars: 100,
        ..FlushSettings::default()
    };
    let pipeline = mock_pipeline(&test, &sink, settings);

    let lines: Vec<String> = ["a", "b", "c"].iter().map(|c| c.repeat(60)).collect();
    for line in &lines {
        pipeline.record(BOT_CHANNEL, line).unwrap();
    }
    sleep(Duration::from_millis(600)).await;
    assert_eq!(sink.call_count(), 2);
    assert_eq!(pipeline.pending_len(BOT_CHANNEL), Some(2));

    sleep(Duration::from_secs(6)).await;

    let contents = sink.contents();
    let delivered: Vec<Vec<&str>> = contents
        .iter()
        .map(|content| messages(content).into_iter().map(|m| &m[..1]).collect())
        .collect();
    assert_eq!(
        delivered,
        vec![vec!["a"], vec!["b"], vec!["b"], vec!["c"]]
    );
}
