use proptest::prelude::*;
use tile_roller::{
    RngShuffler,
    RollEngine,
    RollState,
    RollStatus,
    Shuffler,
    TILE_COUNT,
    TILE_LABELS,
    ThemeMode,
    TickTimer,
    engine::DEFAULT_TICK_PERIOD,
    test_helpers::{
        FixedShuffler,
        ManualTimer,
        fire_ticks,
        test_engine,
    },
};

#[derive(Clone, Copy, Debug)]
enum Action {
    ToggleRoll,
    Ticks(usize),
    Reset,
    ToggleTheme,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => Just(Action::ToggleRoll),
        3 => (1usize..25).prop_map(Action::Ticks),
        1 => Just(Action::Reset),
        1 => Just(Action::ToggleTheme),
    ]
}

type SeededEngine = RollEngine<RngShuffler, ManualTimer>;

fn seeded_engine(seed: u64) -> SeededEngine {
    RollEngine::new(
        RngShuffler::from_seed(seed),
        ManualTimer::default(),
        DEFAULT_TICK_PERIOD,
    )
}

fn tick_n(engine: &mut SeededEngine, n: usize) {
    for _ in 0..n {
        let Some(session) = engine.timer().armed_session() else {
            return;
        };
        engine.tick(session);
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn shuffle__always_yields_a_permutation(seed in any::<u64>()) {
        let mut shuffler = RngShuffler::from_seed(seed);
        for _ in 0..50 {
            let cycle = shuffler.shuffle();
            let mut order = cycle.order().to_vec();
            order.sort_unstable();
            prop_assert_eq!(order, (0..TILE_COUNT).collect::<Vec<_>>());
        }
    }

    #[test]
    fn toggle_sequence__counts_track_completed_cycles(
        seed in any::<u64>(),
        actions in prop::collection::vec(action(), 0..80),
    ) {
        let mut engine = seeded_engine(seed);
        // stops that have been followed by a start, since the last reset
        let mut completed_cycles = 0u32;
        let mut stopped_since_start = false;

        for action in actions {
            let before = engine.state().clone();
            match action {
                Action::ToggleRoll => {
                    let was_rolling = before.is_rolling();
                    engine.toggle_roll();
                    if was_rolling {
                        stopped_since_start = true;
                    } else if stopped_since_start {
                        completed_cycles += 1;
                        stopped_since_start = false;
                    }
                }
                Action::Ticks(n) => tick_n(&mut engine, n),
                Action::Reset => {
                    engine.reset();
                    completed_cycles = 0;
                    stopped_since_start = false;
                    prop_assert_eq!(
                        engine.state(),
                        &RollState::with_theme(before.theme())
                    );
                }
                Action::ToggleTheme => {
                    engine.toggle_theme();
                    prop_assert_eq!(engine.state().counts(), before.counts());
                    prop_assert_eq!(engine.state().tiles(), before.tiles());
                    prop_assert_eq!(engine.state().status(), before.status());
                }
            }

            let state = engine.state();
            let total: u32 = state.counts().iter().sum();
            prop_assert_eq!(total, completed_cycles);
            prop_assert!(total >= before.counts().iter().sum::<u32>() || matches!(action, Action::Reset));

            // at most one tile is zeroed, and only the pending one
            let zeroed: Vec<usize> = (0..TILE_COUNT).filter(|&i| state.tiles()[i] == 0).collect();
            prop_assert!(zeroed.len() <= 1);
            for i in 0..TILE_COUNT {
                if state.tiles()[i] != 0 {
                    prop_assert_eq!(state.tiles()[i], TILE_LABELS[i]);
                }
            }
            if let Some(&z) = zeroed.first() {
                prop_assert_eq!(state.pending_restore().map(|p| p.index), Some(z));
            }

            // exactly one armed timer per rolling session
            prop_assert_eq!(engine.timer().is_armed(), state.status() == RollStatus::Rolling);
        }
    }

    #[test]
    fn stop__freezes_the_highlighted_tile(seed in any::<u64>(), ticks in 1usize..40) {
        let mut engine = seeded_engine(seed);
        engine.start();
        tick_n(&mut engine, ticks);
        let h = engine.snapshot().highlight.unwrap();

        let frozen = engine.stop();

        prop_assert_eq!(frozen, Some(h));
        prop_assert_eq!(engine.state().tiles()[h], 0);
        prop_assert_eq!(engine.state().pending_count(), Some(h));
        let restore = engine.state().pending_restore().unwrap();
        prop_assert_eq!((restore.index, restore.value), (h, TILE_LABELS[h]));

        engine.start();

        prop_assert_eq!(engine.state().tiles()[h], TILE_LABELS[h]);
        prop_assert_eq!(engine.state().counts()[h], 1);
    }
}

#[test]
fn worked_example__result_lingers_until_next_roll() {
    // given
    let order = [5, 3, 8, 1, 0, 2, 4, 6, 7];
    let mut engine = test_engine(FixedShuffler::from_order(order));

    // when
    engine.toggle_roll();
    let h = fire_ticks(&mut engine, 4).unwrap();
    engine.toggle_roll();

    // then
    assert_eq!(h, order[3]);
    assert_eq!(engine.snapshot().tiles[h], 0);
    assert_eq!(engine.snapshot().counts, [0; TILE_COUNT]);
    assert_eq!(engine.snapshot().highlight, Some(h));

    // when
    engine.toggle_roll();

    // then
    assert_eq!(engine.state().tiles()[h], TILE_LABELS[h]);
    assert_eq!(engine.state().counts()[h], 1);
    assert_eq!(engine.snapshot().selected, None);
}

#[test]
fn toggle_theme__twice_restores_theme() {
    let mut engine = test_engine(FixedShuffler::default());
    let original = engine.state().theme();
    engine.toggle_theme();
    engine.toggle_theme();
    assert_eq!(engine.state().theme(), original);
    assert_eq!(original, ThemeMode::Light);
}
