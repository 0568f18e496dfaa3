use crate::{
    engine::RollEngine,
    shuffle::{
        RollCycle,
        Shuffler,
    },
    ticker::{
        RollSession,
        TickTimer,
    },
};
use std::{
    collections::VecDeque,
    time::Duration,
};

/// Hands out a fixed queue of cycles; once drained, repeats the last one
/// (or the identity if none were given).
#[derive(Clone, Debug, Default)]
pub struct FixedShuffler {
    queue: VecDeque<RollCycle>,
    last: RollCycle,
}

impl FixedShuffler {
    pub fn new(cycles: impl IntoIterator<Item = RollCycle>) -> Self {
        Self {
            queue: cycles.into_iter().collect(),
            last: RollCycle::identity(),
        }
    }

    /// Panics if `order` is not a permutation of the tile indices.
    pub fn from_order(order: [usize; crate::TILE_COUNT]) -> Self {
        let cycle = RollCycle::from_order(order).expect("order must be a permutation");
        Self::new([cycle])
    }
}

impl Shuffler for FixedShuffler {
    fn shuffle(&mut self) -> RollCycle {
        if let Some(cycle) = self.queue.pop_front() {
            self.last = cycle;
        }
        self.last
    }
}

/// Timer that never fires on its own; records how it was driven.
#[derive(Clone, Debug, Default)]
pub struct ManualTimer {
    armed: Option<(Duration, RollSession)>,
    pub arm_count: usize,
    pub cancel_count: usize,
}

impl ManualTimer {
    pub fn armed_session(&self) -> Option<RollSession> {
        self.armed.map(|(_, session)| session)
    }

    pub fn armed_period(&self) -> Option<Duration> {
        self.armed.map(|(period, _)| period)
    }
}

impl TickTimer for ManualTimer {
    fn arm(&mut self, period: Duration, session: RollSession) {
        self.armed = Some((period, session));
        self.arm_count += 1;
    }

    fn cancel(&mut self) {
        self.armed = None;
        self.cancel_count += 1;
    }

    fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

pub type TestEngine = RollEngine<FixedShuffler, ManualTimer>;

pub fn test_engine(shuffler: FixedShuffler) -> TestEngine {
    RollEngine::new(shuffler, ManualTimer::default(), crate::engine::DEFAULT_TICK_PERIOD)
}

/// Fires `n` ticks for whatever session the timer is currently armed with.
/// Returns the last index the engine moved to.
pub fn fire_ticks(engine: &mut TestEngine, n: usize) -> Option<usize> {
    let mut last = None;
    for _ in 0..n {
        let session = engine.timer().armed_session()?;
        last = engine.tick(session);
    }
    last
}
