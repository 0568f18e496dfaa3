use crate::{
    TILE_COUNT,
    TILE_LABELS,
    shuffle::{
        RollCycle,
        Shuffler,
    },
    ticker::{
        RollSession,
        TickTimer,
    },
};
use std::time::Duration;
use tracing::{
    debug,
    info,
    trace,
};


pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RollStatus {
    #[default]
    Idle,
    Rolling,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// Tile zeroed by the last stop, with the value it held before.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRestore {
    pub index: usize,
    pub value: u8,
}

/// Everything the view needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollSnapshot {
    /// Values as shown on the grid; the live tile reads 0 while rolling.
    pub tiles: [u8; TILE_COUNT],
    pub counts: [u32; TILE_COUNT],
    pub status: RollStatus,
    pub highlight: Option<usize>,
    /// Frozen result of the last stop, cleared when the next roll starts.
    pub selected: Option<usize>,
    pub theme: ThemeMode,
}

impl RollSnapshot {
    pub fn is_emphasised(&self, index: usize) -> bool {
        self.highlight == Some(index) || self.selected == Some(index)
    }

    pub fn total_rolls(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// The roll state record.
///
/// Restoring the zeroed tile and counting the last result both happen when
/// the *next* roll begins, so a finished roll stays on screen until the user
/// starts another one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollState {
    tiles: [u8; TILE_COUNT],
    counts: [u32; TILE_COUNT],
    status: RollStatus,
    live_index: Option<usize>,
    selected: Option<usize>,
    pending_restore: Option<PendingRestore>,
    pending_count: Option<usize>,
    cycle: Option<RollCycle>,
    cursor: usize,
    theme: ThemeMode,
}

impl Default for RollState {
    fn default() -> Self {
        RollState {
            tiles: TILE_LABELS,
            counts: [0; TILE_COUNT],
            status: RollStatus::Idle,
            live_index: None,
            selected: None,
            pending_restore: None,
            pending_count: None,
            cycle: None,
            cursor: 0,
            theme: ThemeMode::default(),
        }
    }
}

impl RollState {
    pub fn with_theme(theme: ThemeMode) -> Self {
        RollState {
            theme,
            ..RollState::default()
        }
    }

    pub fn tiles(&self) -> &[u8; TILE_COUNT] {
        &self.tiles
    }

    pub fn counts(&self) -> &[u32; TILE_COUNT] {
        &self.counts
    }

    pub fn status(&self) -> RollStatus {
        self.status
    }

    pub fn is_rolling(&self) -> bool {
        self.status == RollStatus::Rolling
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn pending_restore(&self) -> Option<PendingRestore> {
        self.pending_restore
    }

    pub fn pending_count(&self) -> Option<usize> {
        self.pending_count
    }

    pub fn cycle(&self) -> Option<&RollCycle> {
        self.cycle.as_ref()
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    /// Live index while rolling, otherwise the frozen result (if any).
    pub fn highlight(&self) -> Option<usize> {
        match self.status {
            RollStatus::Rolling => self.live_index,
            RollStatus::Idle => self.selected,
        }
    }

    /// Idle -> Rolling. Returns false and leaves state untouched if already rolling.
    pub fn begin_roll(&mut self, cycle: RollCycle) -> bool {
        if self.is_rolling() {
            return false;
        }
        self.selected = None;
        if let Some(PendingRestore { index, value }) = self.pending_restore.take() {
            self.tiles[index] = value;
        }
        if let Some(index) = self.pending_count.take() {
            self.counts[index] += 1;
        }
        self.cycle = Some(cycle);
        self.cursor = 0;
        self.live_index = None;
        self.status = RollStatus::Rolling;
        true
    }

    /// Moves the live highlight one step along the cycle. No-op unless rolling.
    pub fn advance(&mut self) -> Option<usize> {
        if !self.is_rolling() {
            return None;
        }
        let cycle = self.cycle?;
        let index = cycle.at(self.cursor);
        self.live_index = Some(index);
        self.cursor = (self.cursor + 1) % TILE_COUNT;
        Some(index)
    }

    /// Rolling -> Idle, freezing the live tile. Returns the frozen index.
    pub fn freeze(&mut self) -> Option<usize> {
        if !self.is_rolling() {
            return None;
        }
        // no tick yet: settle on the tile the first tick would have shown
        let index = match (self.live_index, self.cycle) {
            (Some(index), _) => index,
            (None, Some(cycle)) => cycle.at(self.cursor),
            (None, None) => return None,
        };
        self.selected = Some(index);
        self.pending_restore = Some(PendingRestore {
            index,
            value: self.tiles[index],
        });
        self.pending_count = Some(index);
        self.tiles[index] = 0;
        self.live_index = None;
        self.cycle = None;
        self.cursor = 0;
        self.status = RollStatus::Idle;
        Some(index)
    }

    /// Back to the initial board. The theme is kept.
    pub fn reset(&mut self) {
        *self = RollState::with_theme(self.theme);
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn display_values(&self) -> [u8; TILE_COUNT] {
        let mut values = self.tiles;
        if let (RollStatus::Rolling, Some(index)) = (self.status, self.live_index) {
            values[index] = 0;
        }
        values
    }

    pub fn snapshot(&self) -> RollSnapshot {
        RollSnapshot {
            tiles: self.display_values(),
            counts: self.counts,
            status: self.status,
            highlight: self.highlight(),
            selected: self.selected,
            theme: self.theme,
        }
    }
}

/// Owns the roll state together with its random source and tick driver.
///
/// The engine arms `timer` on start and cancels it on stop and reset. Tick
/// events must be fed back through [`RollEngine::tick`] with the session they
/// were armed for.
#[derive(Debug)]
pub struct RollEngine<S, T> {
    state: RollState,
    shuffler: S,
    timer: T,
    period: Duration,
    session: RollSession,
}

impl<S: Shuffler, T: TickTimer> RollEngine<S, T> {
    pub fn new(shuffler: S, timer: T, period: Duration) -> Self {
        Self {
            state: RollState::default(),
            shuffler,
            timer,
            period,
            session: RollSession::default(),
        }
    }

    pub fn with_theme(mut self, theme: ThemeMode) -> Self {
        self.state.theme = theme;
        self
    }

    pub fn state(&self) -> &RollState {
        &self.state
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn session(&self) -> RollSession {
        self.session
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn snapshot(&self) -> RollSnapshot {
        self.state.snapshot()
    }

    /// The single start/stop action exposed to the view.
    pub fn toggle_roll(&mut self) -> RollStatus {
        match self.state.status() {
            RollStatus::Idle => {
                self.start();
            }
            RollStatus::Rolling => {
                self.stop();
            }
        }
        self.state.status()
    }

    pub fn start(&mut self) -> bool {
        if self.state.is_rolling() {
            debug!("start ignored: already rolling");
            return false;
        }
        let counted = self.state.pending_count();
        let cycle = self.shuffler.shuffle();
        self.state.begin_roll(cycle);
        self.session = self.session.next();
        self.timer.arm(self.period, self.session);
        info!(
            session = self.session.id(),
            counted_tile = ?counted.map(|i| TILE_LABELS[i]),
            cycle = ?cycle.order(),
            "roll started"
        );
        true
    }

    /// Applies a tick from the driver. Ticks from an earlier session are dropped.
    pub fn tick(&mut self, session: RollSession) -> Option<usize> {
        if session != self.session {
            trace!(
                stale = session.id(),
                current = self.session.id(),
                "dropping stale tick"
            );
            return None;
        }
        self.state.advance()
    }

    pub fn stop(&mut self) -> Option<usize> {
        if !self.state.is_rolling() {
            debug!("stop ignored: not rolling");
            return None;
        }
        self.timer.cancel();
        let frozen = self.state.freeze();
        if let Some(index) = frozen {
            info!(
                session = self.session.id(),
                tile = TILE_LABELS[index],
                "roll stopped"
            );
        }
        frozen
    }

    pub fn reset(&mut self) {
        self.timer.cancel();
        self.session = self.session.next();
        self.state.reset();
        info!("board reset");
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        let theme = self.state.toggle_theme();
        debug!(?theme, "theme toggled");
        theme
    }
}
