pub mod config;

pub mod engine;

pub mod shuffle;

pub mod ticker;

pub mod test_helpers;

pub use engine::{
    RollEngine,
    RollSnapshot,
    RollState,
    RollStatus,
    ThemeMode,
};
pub use shuffle::{
    RngShuffler,
    RollCycle,
    Shuffler,
};
pub use ticker::{
    IntervalTicker,
    RollSession,
    TickEvent,
    TickTimer,
};

/// Number of tiles on the board.
pub const TILE_COUNT: usize = 9;

/// Fixed labels printed on the tiles, in board order.
pub const TILE_LABELS: [u8; TILE_COUNT] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
