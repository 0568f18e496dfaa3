use crate::ui;
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use std::time::Duration;
use tile_roller::{
    IntervalTicker,
    RngShuffler,
    RollEngine,
    RollSnapshot,
    RollStatus,
    Shuffler,
    TILE_LABELS,
    TickEvent,
    TickTimer,
    config::AppConfig,
    ticker::TickReceiver,
};

#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub roll: RollSnapshot,
    pub status: String,
    pub tick_period: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct AppController<S, T> {
    engine: RollEngine<S, T>,
    status: String,
}

impl<S: Shuffler, T: TickTimer> AppController<S, T> {
    pub fn new(engine: RollEngine<S, T>) -> Self {
        Self {
            engine,
            status: String::from("Press space to roll"),
        }
    }

    #[cfg(test)]
    pub fn engine(&self) -> &RollEngine<S, T> {
        &self.engine
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            roll: self.engine.snapshot(),
            status: self.status.clone(),
            tick_period: self.engine.period(),
        }
    }

    /// Returns whether the tick moved the highlight (and a redraw is due).
    pub fn on_tick(&mut self, tick: TickEvent) -> bool {
        self.engine.tick(tick.session).is_some()
    }

    pub fn handle(&mut self, ev: ui::UserEvent) -> Flow {
        match ev {
            ui::UserEvent::Quit => return Flow::Quit,
            ui::UserEvent::ToggleRoll => match self.engine.toggle_roll() {
                RollStatus::Rolling => self.status = String::from("Rolling..."),
                RollStatus::Idle => {
                    self.status = match self.engine.state().selected() {
                        Some(idx) => format!("Landed on {}", TILE_LABELS[idx]),
                        None => String::from("Stopped"),
                    }
                }
            },
            ui::UserEvent::Reset => {
                self.engine.reset();
                self.status = String::from("Board reset");
            }
            ui::UserEvent::ToggleTheme => {
                self.engine.toggle_theme();
            }
            ui::UserEvent::Redraw => {}
        }
        Flow::Continue
    }
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let (ticker, mut ticks) = IntervalTicker::channel();
    let shuffler = match config.seed {
        Some(seed) => RngShuffler::from_seed(seed),
        None => RngShuffler::from_os_rng(),
    };
    let engine = RollEngine::new(shuffler, ticker, config.tick_period).with_theme(config.theme);
    let mut controller = AppController::new(engine);
    let mut ui_state = ui::UiState::default();
    let mut input_events = ui::input_event_stream();

    tracing::info!("Starting UI");
    // UI bootstrap
    ui::terminal_enter(&mut ui_state)?;
    tracing::info!("UI ready");
    let res = run_loop(&mut controller, &mut ui_state, &mut input_events, &mut ticks).await;
    ui::terminal_exit()?;
    res
}

async fn run_loop<S: Shuffler, T: TickTimer>(
    controller: &mut AppController<S, T>,
    ui_state: &mut ui::UiState,
    input_events: &mut ui::InputEventReceiver,
    ticks: &mut TickReceiver,
) -> Result<()> {
    tracing::info!("Running app loop");
    ui::draw(ui_state, &controller.snapshot()).wrap_err("initial draw failed")?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { break; }
            Some(tick) = ticks.recv() => {
                if controller.on_tick(tick) {
                    ui::draw(ui_state, &controller.snapshot())
                        .wrap_err("draw after tick failed")?;
                }
            }
            raw_ev = ui::next_raw_event(input_events) => {
                let event = raw_ev?;
                let Some(ev) = ui::interpret_event(ui_state, event) else {
                    continue;
                };
                if controller.handle(ev) == Flow::Quit {
                    break;
                }
                ui::draw(ui_state, &controller.snapshot())
                    .wrap_err("draw after input failed")?;
            }
        }
    }
    Ok(())
}
