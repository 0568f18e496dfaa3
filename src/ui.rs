use crate::controller::AppSnapshot;
use color_eyre::eyre::{
    Result,
    eyre,
};
use crossterm::{
    event::{
        Event,
        EventStream,
        KeyCode,
        KeyEvent,
        KeyEventKind,
        KeyModifiers,
    },
    terminal::{
        disable_raw_mode,
        enable_raw_mode,
    },
};
use futures::StreamExt;
use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::*,
};
use std::io::{
    Stdout,
    stdout,
};
use tile_roller::{
    RollStatus,
    TILE_COUNT,
    TILE_LABELS,
    ThemeMode,
};
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserEvent {
    Quit,
    ToggleRoll,
    Reset,
    ToggleTheme,
    Redraw,
}

#[derive(Debug, Default)]
pub struct UiState {
    mode: Mode,
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Mode {
    #[default]
    Normal,
    QuitModal,
}

pub type InputEventReceiver = EventStream;

pub fn input_event_stream() -> InputEventReceiver {
    EventStream::new()
}

pub async fn next_raw_event(events: &mut InputEventReceiver) -> Result<Event> {
    match events.next().await {
        Some(event) => Ok(event?),
        None => Err(eyre!("terminal input stream closed")),
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    // Create a single persistent Terminal to preserve buffers across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    Ok(())
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    if let Some(mut term) = state.terminal.take() {
        let res = term.draw(|f| ui(f, state, snap)).map(|_| ());
        state.terminal = Some(term);
        res?;
    }
    Ok(())
}

/// Maps a terminal event to an intent. Returns `None` for events that need
/// no action.
pub fn interpret_event(state: &mut UiState, event: Event) -> Option<UserEvent> {
    match event {
        Event::Key(key) => interpret_key(state, key),
        Event::Resize(_, _) => Some(UserEvent::Redraw),
        _ => None,
    }
}

fn interpret_key(state: &mut UiState, k: KeyEvent) -> Option<UserEvent> {
    if k.kind != KeyEventKind::Press {
        return None;
    }
    // raw mode swallows SIGINT
    if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
        return Some(UserEvent::Quit);
    }
    match state.mode {
        Mode::QuitModal => match k.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserEvent::Quit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
            _ => None,
        },
        Mode::Normal => match k.code {
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('s') => {
                Some(UserEvent::ToggleRoll)
            }
            KeyCode::Char('r') => Some(UserEvent::Reset),
            KeyCode::Char('t') => Some(UserEvent::ToggleTheme),
            KeyCode::Char('q') | KeyCode::Esc => {
                state.mode = Mode::QuitModal;
                Some(UserEvent::Redraw)
            }
            _ => None,
        },
    }
}

const START_GREEN: Color = Color::Rgb(0x4C, 0xAF, 0x50);
const STOP_RED: Color = Color::Rgb(0xF4, 0x43, 0x36);

#[derive(Clone, Copy, Debug)]
struct Palette {
    page: Color,
    tile: Color,
    text: Color,
    border: Color,
    theme_button: Color,
}

fn palette(theme: ThemeMode) -> Palette {
    match theme {
        ThemeMode::Light => Palette {
            page: Color::Rgb(0xF0, 0xF0, 0xF0),
            tile: Color::Rgb(0xFF, 0xFF, 0xFF),
            text: Color::Black,
            border: Color::Gray,
            theme_button: Color::Rgb(0x22, 0x22, 0x22),
        },
        ThemeMode::Dark => Palette {
            page: Color::Rgb(0x12, 0x12, 0x12),
            tile: Color::Rgb(0x33, 0x33, 0x33),
            text: Color::White,
            border: Color::DarkGray,
            theme_button: Color::Rgb(0x55, 0x55, 0x55),
        },
    }
}

const GRID_WIDTH: u16 = 36;
const TILE_HEIGHT: u16 = 5;

pub(crate) fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    let pal = palette(snap.roll.theme);
    f.render_widget(Clear, f.area());
    f.render_widget(
        Block::default().style(Style::default().bg(pal.page).fg(pal.text)),
        f.area(),
    );
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // status
            Constraint::Length(3),               // labels
            Constraint::Length(3),               // counts
            Constraint::Length(TILE_HEIGHT * 3), // grid
            Constraint::Length(3),               // buttons
            Constraint::Length(3),               // help
            Constraint::Min(0),
        ])
        .split(f.area());

    draw_status(f, chunks[0], snap, pal);
    draw_number_row(f, chunks[1], &TILE_LABELS.map(u32::from), pal);
    draw_number_row(f, chunks[2], &snap.roll.counts, pal);
    draw_grid(f, chunks[3], snap, pal);
    draw_buttons(f, chunks[4], snap, pal);
    draw_help(f, chunks[5], pal);
    if state.mode == Mode::QuitModal {
        draw_quit_modal(f, pal);
    }
}

fn draw_status(f: &mut Frame, area: Rect, snap: &AppSnapshot, pal: Palette) {
    let roll = &snap.roll;
    let status = match roll.status {
        RollStatus::Idle => "Idle",
        RollStatus::Rolling => "Rolling",
    };
    let last = roll
        .selected
        .map(|i| TILE_LABELS[i].to_string())
        .unwrap_or_else(|| String::from("-"));
    let text = format!(
        "{} | Last: {} | Counted: {} | Tick: {}ms | {}",
        status,
        last,
        roll.total_rolls(),
        snap.tick_period.as_millis(),
        snap.status,
    );
    let p = Paragraph::new(text)
        .style(Style::default().fg(pal.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.border))
                .title("Status"),
        );
    f.render_widget(p, area);
}

fn draw_number_row(f: &mut Frame, area: Rect, values: &[u32; TILE_COUNT], pal: Palette) {
    let cells = Layout::horizontal([Constraint::Length(5); TILE_COUNT])
        .flex(Flex::Center)
        .spacing(1)
        .split(area);
    for (value, rect) in values.iter().zip(cells.iter()) {
        let cell = Paragraph::new(value.to_string())
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .bg(pal.tile)
                    .fg(pal.text)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(pal.text)),
            );
        f.render_widget(cell, *rect);
    }
}

fn draw_grid(f: &mut Frame, area: Rect, snap: &AppSnapshot, pal: Palette) {
    let [_, grid, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(GRID_WIDTH),
        Constraint::Fill(1),
    ])
    .areas(area);
    let rows = Layout::vertical([Constraint::Length(TILE_HEIGHT); 3]).split(grid);
    for (r, row_area) in rows.iter().enumerate() {
        let cols = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(*row_area);
        for (c, rect) in cols.iter().enumerate() {
            let idx = r * 3 + c;
            draw_tile(f, *rect, idx, snap, pal);
        }
    }
}

fn draw_tile(f: &mut Frame, area: Rect, idx: usize, snap: &AppSnapshot, pal: Palette) {
    let emphasised = snap.roll.is_emphasised(idx);
    let block = if emphasised {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(pal.text).add_modifier(Modifier::BOLD))
    } else {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(pal.border))
    };
    let value = Span::styled(
        snap.roll.tiles[idx].to_string(),
        if emphasised {
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        },
    );
    let p = Paragraph::new(vec![Line::from(""), Line::from(value)])
        .alignment(Alignment::Center)
        .style(Style::default().bg(pal.tile).fg(pal.text))
        .block(block);
    f.render_widget(p, area);
}

fn button_labels(snap: &AppSnapshot) -> [(&'static str, Color); 3] {
    let pal = palette(snap.roll.theme);
    let roll = match snap.roll.status {
        RollStatus::Idle => ("Start Roll", START_GREEN),
        RollStatus::Rolling => ("Stop Roll", STOP_RED),
    };
    let theme = match snap.roll.theme {
        ThemeMode::Light => "Switch to Dark Theme",
        ThemeMode::Dark => "Switch to Light Theme",
    };
    [roll, ("Reset", STOP_RED), (theme, pal.theme_button)]
}

fn draw_buttons(f: &mut Frame, area: Rect, snap: &AppSnapshot, pal: Palette) {
    let buttons = button_labels(snap);
    let widths = buttons.map(|(label, _)| Constraint::Length(label.width() as u16 + 4));
    let rects = Layout::horizontal(widths)
        .flex(Flex::Center)
        .spacing(2)
        .split(area);
    for ((label, color), rect) in buttons.iter().zip(rects.iter()) {
        let p = Paragraph::new(*label)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .bg(*color)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(pal.page).bg(*color)),
            );
        f.render_widget(p, *rect);
    }
}

fn draw_help(f: &mut Frame, area: Rect, pal: Palette) {
    let help = Paragraph::new("space/enter start-stop | r reset | t theme | q/Esc quit")
        .style(Style::default().fg(pal.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.border))
                .title("Help"),
        );
    f.render_widget(help, area);
}

fn draw_quit_modal(f: &mut Frame, pal: Palette) {
    let area = centered_rect(40, 20, f.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Confirm Quit")
        .style(Style::default().bg(pal.tile).fg(pal.text));
    let p = Paragraph::new("Quit? (Y/N)");
    f.render_widget(Clear, area);
    f.render_widget(block.clone(), area);
    f.render_widget(p, block.inner(area));
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1]);

    vertical[1]
}
