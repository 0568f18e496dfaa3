use std::time::Duration;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{
        self,
        Instant,
        MissedTickBehavior,
    },
};
use tracing::trace;

/// Identifies one rolling period. Bumped on every start and reset so that a
/// tick queued before a cancel can be told apart from a live one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RollSession(u64);

impl RollSession {
    pub fn next(self) -> Self {
        RollSession(self.0.wrapping_add(1))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickEvent {
    pub session: RollSession,
}

pub trait TickTimer {
    /// start firing every `period`, tagging each tick with `session`
    fn arm(&mut self, period: Duration, session: RollSession);

    /// stop firing; no tick is produced after this returns
    fn cancel(&mut self);

    fn is_armed(&self) -> bool;
}

pub type TickReceiver = mpsc::UnboundedReceiver<TickEvent>;

/// Periodic timer backed by a tokio task.
///
/// Ticks are not delivered as callbacks. They are sent as [`TickEvent`]s to
/// the receiver returned by [`IntervalTicker::channel`], and the owner of the
/// engine applies them on its own task. Arming requires a tokio runtime.
#[derive(Debug)]
pub struct IntervalTicker {
    tx: mpsc::UnboundedSender<TickEvent>,
    handle: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    pub fn channel() -> (Self, TickReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (IntervalTicker { tx, handle: None }, rx)
    }
}

impl TickTimer for IntervalTicker {
    fn arm(&mut self, period: Duration, session: RollSession) {
        self.cancel();
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            // first tick one period after arming, not immediately
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                trace!(session = session.id(), "tick");
                if tx.send(TickEvent { session }).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}
