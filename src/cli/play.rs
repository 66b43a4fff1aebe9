//! Play command implementation - Interactive TUI session.

// CLI play uses intentional casts for display and timing
#![allow(
    clippy::similar_names,
    clippy::needless_pass_by_value,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use super::CliError;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gatewalk::hub::{GameHub, HubSettings, InputEvent};
use gatewalk::maze::{
    AudioCue, CellView, ChallengeViewState, Color as MazeColor, Direction as MazeDirection,
    GameConfig, GameEvent, GridPos, MazeGame, MazeSnapshot, MAX_LIVES,
};
use gatewalk::storage::{gatewalk_data_dir, FileStore, MemoryStore, SharedStore, STORE_FILE};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(3);
/// How long the cue ticker shows the last audio cue.
const CUE_TTL: Duration = Duration::from_millis(900);
/// Most toasts kept at once.
const MAX_TOASTS: usize = 6;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the TUI fails or the data directory cannot be
/// resolved.
pub(crate) fn execute(
    seed: Option<u64>,
    data_dir: Option<PathBuf>,
    ephemeral: bool,
) -> Result<(), CliError> {
    // Generate seed if not provided
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    });

    let store = if ephemeral {
        SharedStore::new(MemoryStore::new())
    } else {
        let dir = match data_dir {
            Some(dir) => dir,
            None => gatewalk_data_dir()?,
        };
        SharedStore::new(FileStore::open(dir.join(STORE_FILE)))
    };

    let config = GameConfig {
        seed,
        ..GameConfig::default()
    };
    let game = MazeGame::new(store.clone(), config)?;

    let mut hub = GameHub::new();
    let handle = hub.register(game);
    hub.init_all();
    hub.switch_to(handle);

    let settings = HubSettings::load(&store);
    run_tui(hub, store, settings)
}

/// A pending action waiting for a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    Reset,
    NewMaze,
}

impl PendingAction {
    const fn prompt(self) -> &'static str {
        match self {
            Self::Reset => "Reset all progress back to level 1?",
            Self::NewMaze => "Generate a new maze? Gate unlocks are lost.",
        }
    }

    const fn input(self) -> InputEvent {
        match self {
            Self::Reset => InputEvent::Reset,
            Self::NewMaze => InputEvent::NewMaze,
        }
    }
}

/// A short-lived status line.
struct Toast {
    text: String,
    created: Instant,
}

/// App state for the TUI.
struct App {
    hub: GameHub,
    store: SharedStore,
    settings: HubSettings,
    toasts: Vec<Toast>,
    last_cue: Option<(AudioCue, Instant)>,
    pending: Option<PendingAction>,
    last_tick: Instant,
}

impl App {
    fn new(hub: GameHub, store: SharedStore, settings: HubSettings) -> Self {
        Self {
            hub,
            store,
            settings,
            toasts: Vec::new(),
            last_cue: None,
            pending: None,
            last_tick: Instant::now(),
        }
    }

    fn snapshot(&self) -> Option<MazeSnapshot> {
        self.hub
            .active_as::<MazeGame<SharedStore>>()
            .map(MazeGame::snapshot)
    }

    fn dispatch(&mut self, input: InputEvent) {
        let events = self.hub.handle_input(input);
        self.absorb(&events);
    }

    /// Space/Enter: confirm when a modal is up, otherwise start (or
    /// replay) the challenge sequence.
    fn dispatch_primary(&mut self) {
        let wants_confirm = self
            .snapshot()
            .is_some_and(|s| s.awaiting_next_level || !s.game_active);
        if wants_confirm {
            self.dispatch(InputEvent::Confirm);
        } else {
            self.dispatch(InputEvent::StartSequence);
        }
    }

    fn confirm_pending(&mut self) {
        if let Some(action) = self.pending.take() {
            self.dispatch(action.input());
        }
    }

    fn tick(&mut self) {
        let elapsed = self.last_tick.elapsed();
        self.last_tick = Instant::now();
        let events = self.hub.tick(elapsed);
        self.absorb(&events);
    }

    fn absorb(&mut self, events: &[GameEvent]) {
        for event in events {
            if let Some(text) = event_toast(*event) {
                self.toasts.push(Toast {
                    text,
                    created: Instant::now(),
                });
            }
            if self.settings.sound
                && let Some(cue) = event.audio_cue()
            {
                self.last_cue = Some((cue, Instant::now()));
            }
        }
        if self.toasts.len() > MAX_TOASTS {
            let excess = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..excess);
        }
    }

    fn prune_toasts(&mut self) {
        self.toasts.retain(|t| t.created.elapsed() < TOAST_TTL);
    }
}

fn run_tui(hub: GameHub, store: SharedStore, settings: HubSettings) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let mut app = App::new(hub, store, settings);

    loop {
        app.tick();
        app.prune_toasts();

        // Draw
        terminal
            .draw(|f| ui(f, &app))
            .map_err(|e| CliError::new(e.to_string()))?;

        // Handle input with timeout
        if event::poll(Duration::from_millis(50)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            if app.pending.is_some() {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => app.confirm_pending(),
                    KeyCode::Char('n') | KeyCode::Esc => app.pending = None,
                    _ => {}
                }
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Up | KeyCode::Char('w') => {
                    app.dispatch(InputEvent::Move(MazeDirection::Up));
                }
                KeyCode::Down | KeyCode::Char('s') => {
                    app.dispatch(InputEvent::Move(MazeDirection::Down));
                }
                KeyCode::Left | KeyCode::Char('a') => {
                    app.dispatch(InputEvent::Move(MazeDirection::Left));
                }
                KeyCode::Right | KeyCode::Char('d') => {
                    app.dispatch(InputEvent::Move(MazeDirection::Right));
                }
                KeyCode::Char('r') => app.dispatch(InputEvent::Color(MazeColor::Red)),
                KeyCode::Char('y') => app.dispatch(InputEvent::Color(MazeColor::Yellow)),
                KeyCode::Char('g') => app.dispatch(InputEvent::Color(MazeColor::Green)),
                KeyCode::Char('b') => app.dispatch(InputEvent::Color(MazeColor::Blue)),
                KeyCode::Char('p') => app.dispatch(InputEvent::Color(MazeColor::Purple)),
                KeyCode::Char(' ') | KeyCode::Enter => app.dispatch_primary(),
                KeyCode::Char('n') => app.pending = Some(PendingAction::NewMaze),
                KeyCode::Char('x') => app.pending = Some(PendingAction::Reset),
                KeyCode::Char('t') => {
                    app.settings.toggle_dark_mode(&mut app.store);
                    app.hub.redraw_all();
                }
                KeyCode::Char('m') => app.settings.toggle_sound(&mut app.store),
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

/// Toast text for an event, or None for events that draw themselves.
fn event_toast(event: GameEvent) -> Option<String> {
    match event {
        GameEvent::ChallengeStarted {
            sequence_length, ..
        } => Some(format!(
            "Locked gate. Watch the {sequence_length}-color sequence."
        )),
        GameEvent::PlaybackComplete => Some("Your turn. Repeat the sequence.".to_string()),
        GameEvent::SequenceWrong { lives_left, .. } => {
            Some(format!("Wrong color! {lives_left} lives left."))
        }
        GameEvent::GateUnlocked {
            points,
            solved,
            total,
            ..
        } => Some(format!("Gate unlocked! +{points} points ({solved}/{total})")),
        GameEvent::GatesStillLocked { solved, total } => Some(format!(
            "The exit holds. Unlock every gate first ({solved}/{total})."
        )),
        GameEvent::GameReset => Some("Progress reset.".to_string()),
        GameEvent::MazeRegenerated { .. } => Some("New maze generated.".to_string()),
        _ => None,
    }
}

/// Palette derived from the theme flag.
struct Theme {
    base: Style,
    border: Color,
    accent: Color,
    dim: Color,
    wall: Color,
    gate_locked: Color,
    gate_open: Color,
    player: Color,
    marker: Color,
}

fn theme(dark: bool) -> Theme {
    if dark {
        Theme {
            base: Style::default(),
            border: Color::DarkGray,
            accent: Color::Cyan,
            dim: Color::Gray,
            wall: Color::Gray,
            gate_locked: Color::Red,
            gate_open: Color::Green,
            player: Color::Cyan,
            marker: Color::Yellow,
        }
    } else {
        Theme {
            base: Style::default().bg(Color::White).fg(Color::Black),
            border: Color::Black,
            accent: Color::Blue,
            dim: Color::DarkGray,
            wall: Color::Black,
            gate_locked: Color::Red,
            gate_open: Color::Green,
            player: Color::Blue,
            marker: Color::Magenta,
        }
    }
}

fn tone_color(color: MazeColor) -> Color {
    match color {
        MazeColor::Red => Color::Red,
        MazeColor::Yellow => Color::Yellow,
        MazeColor::Green => Color::Green,
        MazeColor::Blue => Color::Blue,
        MazeColor::Purple => Color::Magenta,
    }
}

fn ui(f: &mut Frame, app: &App) {
    let Some(snapshot) = app.snapshot() else {
        let message = Paragraph::new("No active game")
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(message, f.area());
        return;
    };
    let theme = theme(app.settings.dark_mode);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(13),    // Main content
            Constraint::Length(3),  // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app, &snapshot, &theme);

    // Main content - maze grid and side panel
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_maze(f, main_chunks[0], &snapshot, &theme);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(4)])
        .split(main_chunks[1]);

    render_challenge(f, side_chunks[0], &snapshot, &theme);
    render_messages(f, side_chunks[1], app, &theme);

    render_footer(f, chunks[2], app, &snapshot, &theme);

    if let Some(action) = app.pending {
        render_dialog(f, action.prompt(), "[y] yes   [n] no", &theme);
    } else if snapshot.awaiting_next_level {
        render_dialog(
            f,
            &format!("Level cleared! Ready for level {}?", snapshot.level),
            "[Space] continue",
            &theme,
        );
    } else if !snapshot.game_active {
        render_dialog(
            f,
            &format!("Out of lives. Final score: {}", snapshot.score),
            "[Space] start over",
            &theme,
        );
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App, snapshot: &MazeSnapshot, theme: &Theme) {
    let mut hearts = String::new();
    for i in 0..MAX_LIVES {
        hearts.push(if i < snapshot.lives { '\u{2665}' } else { '\u{2661}' });
    }

    let sound = if app.settings.sound {
        match app.last_cue {
            Some((cue, at)) if at.elapsed() < CUE_TTL => format!("\u{266a} {cue}"),
            _ => String::new(),
        }
    } else {
        "muted".to_string()
    };

    let title = format!(
        " Gatewalk | Level {} | Score {} | Lives {} | Gates {}/{} | {} ",
        snapshot.level, snapshot.score, hearts, snapshot.solved, snapshot.total_gates, sound
    );

    let header = Paragraph::new(title)
        .style(
            theme
                .base
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border)));

    f.render_widget(header, area);
}

fn render_maze(f: &mut Frame, area: Rect, snapshot: &MazeSnapshot, theme: &Theme) {
    let mut lines: Vec<Line> = Vec::new();

    for y in 0..snapshot.height {
        let mut spans = Vec::new();
        for x in 0..snapshot.width {
            spans.push(cell_span(snapshot, GridPos::new(x, y), theme));
        }
        lines.push(Line::from(spans));
    }

    let maze_widget = Paragraph::new(lines).style(theme.base).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(" Maze "),
    );

    f.render_widget(maze_widget, area);
}

/// One grid cell as a two-column span so the maze keeps a square-ish
/// aspect in terminal cells.
fn cell_span(snapshot: &MazeSnapshot, pos: GridPos, theme: &Theme) -> Span<'static> {
    if pos == snapshot.player {
        return Span::styled(
            "@ ",
            Style::default()
                .fg(theme.player)
                .add_modifier(Modifier::BOLD),
        );
    }
    match snapshot.cell(pos.x, pos.y) {
        CellView::Wall => Span::styled("\u{2588}\u{2588}", Style::default().fg(theme.wall)),
        CellView::Path => Span::raw("  "),
        CellView::GateLocked => Span::styled(
            "G ",
            Style::default()
                .fg(theme.gate_locked)
                .add_modifier(Modifier::BOLD),
        ),
        CellView::GateOpen => Span::styled("G ", Style::default().fg(theme.gate_open)),
        CellView::Start => Span::styled("S ", Style::default().fg(theme.marker)),
        CellView::End => Span::styled(
            "E ",
            Style::default()
                .fg(theme.marker)
                .add_modifier(Modifier::BOLD),
        ),
    }
}

fn render_challenge(f: &mut Frame, area: Rect, snapshot: &MazeSnapshot, theme: &Theme) {
    let mut lines = Vec::new();
    lines.push(Line::from(""));

    match &snapshot.challenge {
        None => {
            lines.push(Line::from("Walk into a locked gate (G)"));
            lines.push(Line::from("to face its color challenge."));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Unlock every gate, then reach E.",
                Style::default().fg(theme.dim),
            )));
        }
        Some(view) => match view.state {
            ChallengeViewState::AwaitingStart => {
                lines.push(Line::from(format!(
                    "A {}-color sequence guards this gate.",
                    view.sequence_length
                )));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "[Space] watch the sequence",
                    Style::default().fg(theme.accent),
                )));
            }
            ChallengeViewState::Playing => {
                lines.push(Line::from("Memorize:"));
                lines.push(Line::from(""));
                match view.lit {
                    Some(color) => lines.push(Line::from(Span::styled(
                        format!("  \u{2588}\u{2588}\u{2588}\u{2588} {color}"),
                        Style::default()
                            .fg(tone_color(color))
                            .add_modifier(Modifier::BOLD),
                    ))),
                    None => lines.push(Line::from(Span::styled(
                        "  ....",
                        Style::default().fg(theme.dim),
                    ))),
                }
            }
            ChallengeViewState::AwaitingInput => {
                lines.push(Line::from("Repeat the sequence:"));
                lines.push(Line::from(""));
                let mut markers = Vec::new();
                for i in 0..view.sequence_length {
                    let (dot, style) = if i < view.entered {
                        ("\u{25cf} ", Style::default().fg(theme.accent))
                    } else {
                        ("\u{25cb} ", Style::default().fg(theme.dim))
                    };
                    markers.push(Span::styled(dot, style));
                }
                lines.push(Line::from(markers));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "[r y g b p] colors   [Space] replay",
                    Style::default().fg(theme.dim),
                )));
            }
        },
    }

    let challenge_widget = Paragraph::new(lines)
        .style(theme.base)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(" Challenge "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(challenge_widget, area);
}

fn render_messages(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let lines: Vec<Line> = app
        .toasts
        .iter()
        .map(|toast| Line::from(toast.text.clone()))
        .collect();

    let messages_widget = Paragraph::new(lines)
        .style(theme.base)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(" Messages "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(messages_widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App, snapshot: &MazeSnapshot, theme: &Theme) {
    let controls = if app.pending.is_some() {
        " [y] confirm  [n] cancel "
    } else if snapshot.awaiting_next_level || !snapshot.game_active {
        " [Space] continue  [q] Quit "
    } else if snapshot.challenge.is_some() {
        " [Space] sequence  [r y g b p] colors  [arrows/wasd] move  [m] sound  [q] quit "
    } else {
        " [arrows/wasd] move  [n] new maze  [x] reset  [t] theme  [m] sound  [q] quit "
    };

    let footer = Paragraph::new(controls)
        .style(theme.base.fg(theme.dim))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );

    f.render_widget(footer, area);
}

fn render_dialog(f: &mut Frame, message: &str, controls: &str, theme: &Theme) {
    let area = centered_rect(46, 5, f.area());
    let lines = vec![
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(Span::styled(
            controls.to_string(),
            Style::default().fg(theme.accent),
        )),
    ];
    let dialog = Paragraph::new(lines)
        .style(theme.base)
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent)),
        );

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

/// A fixed-size rect centered in `r`, clamped to fit.
fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    let x = r.x + (r.width - width) / 2;
    let y = r.y + (r.height - height) / 2;
    Rect::new(x, y, width, height)
}
