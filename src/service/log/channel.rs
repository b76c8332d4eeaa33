use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use url::Url;

use crate::model::log::{ChannelConfig, ChannelPhase, LogEntry};

/// Pending queue and flush state of one log channel.
///
/// The mutex is only held for queue and phase updates, never across an `.await`. The
/// transition out of `Idle` happens under the same lock as the append, which is what
/// keeps a channel down to a single flush cycle.
pub struct LogChannel {
    name: String,
    webhook: Option<Url>,
    state: Mutex<ChannelState>,
}

struct ChannelState {
    pending: VecDeque<LogEntry>,
    phase: ChannelPhase,
    /// Task running the current flush cycle, kept so shutdown can wait on it
    cycle: Option<JoinHandle<()>>,
}

impl LogChannel {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            name: config.name,
            webhook: config.webhook,
            state: Mutex::new(ChannelState {
                pending: VecDeque::new(),
                phase: ChannelPhase::Idle,
                cycle: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn webhook(&self) -> Option<&Url> {
        self.webhook.as_ref()
    }

    pub fn phase(&self) -> ChannelPhase {
        self.state.lock().phase
    }

    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Appends an entry and starts a flush cycle if the channel is idle.
    ///
    /// `start_cycle` is only invoked when the channel was `Idle`; its handle is stored on
    /// the channel. Otherwise the entry joins the queue of the running cycle.
    pub fn push<F>(&self, entry: LogEntry, start_cycle: F)
    where
        F: FnOnce() -> JoinHandle<()>,
    {
        let mut state = self.state.lock();
        state.pending.push_back(entry);

        if state.phase == ChannelPhase::Idle {
            state.phase = ChannelPhase::Flushing;
            state.cycle = Some(start_cycle());
        }
    }

    /// Takes every pending entry for delivery.
    ///
    /// When nothing is pending the channel goes back to `Idle` in the same critical
    /// section, which ends the flush cycle.
    pub fn take_batch(&self) -> Option<Vec<LogEntry>> {
        let mut state = self.state.lock();

        if state.pending.is_empty() {
            state.phase = ChannelPhase::Idle;
            state.cycle = None;
            return None;
        }

        Some(state.pending.drain(..).collect())
    }

    /// Puts entries back at the head of the queue, keeping their order, and marks the
    /// channel as waiting for a rate-limit retry.
    pub fn requeue_front(&self, entries: Vec<LogEntry>) {
        let mut state = self.state.lock();
        for entry in entries.into_iter().rev() {
            state.pending.push_front(entry);
        }
        state.phase = ChannelPhase::RetryWait;
    }

    pub fn set_phase(&self, phase: ChannelPhase) {
        self.state.lock().phase = phase;
    }

    /// Ends the flush cycle without draining the queue.
    pub fn finish(&self) {
        let mut state = self.state.lock();
        state.phase = ChannelPhase::Idle;
        state.cycle = None;
    }

    pub fn take_cycle(&self) -> Option<JoinHandle<()>> {
        self.state.lock().cycle.take()
    }
}
