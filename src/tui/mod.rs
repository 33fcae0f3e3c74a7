// TUI module - Terminal User Interface
//
// Manages the terminal with ratatui: raw mode setup and teardown, the
// event loop over keyboard input and timer ticks, and key routing into
// the application state. The tick drives the autosave debouncer, so the
// loop keeps ticking even when the user is idle.

pub mod app;
pub mod components;
pub mod editor;
pub mod modal;
pub mod theme;
pub mod views;

use crate::api::SearchQuery;
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::session::store::KvStore;
use anyhow::{Context, Result};
use app::{App, Prompt, View, TOPICS};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use editor::EditSurface;
use modal::{Modal, ModalAction};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// Run the TUI until the user quits
pub async fn run_tui(config: Config, log_buffer: LogBuffer, store: KvStore) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(config, log_buffer, store);

    let result = run_event_loop(&mut terminal, &mut app).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop: draw, then wait for a key or a tick. The tick both
/// redraws and advances the autosave deadline.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));

    // First screen needs data before the first keypress
    app.load_dashboard().await;

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        let input = tokio::select! {
            _ = tick_interval.tick() => {
                app.on_tick();
                None
            }
            input = poll_input() => input,
        };

        if let Some(Event::Key(key)) = input {
            handle_key(app, key).await;
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Poll the terminal for input without starving the tick arm
async fn poll_input() -> Option<Event> {
    if event::poll(Duration::from_millis(10)).unwrap_or(false) {
        event::read().ok()
    } else {
        None
    }
}

async fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Modals swallow all input while open
    if let Some(modal) = app.modal {
        match modal.handle_input(key.code) {
            ModalAction::Close => app.modal = None,
            ModalAction::Confirm => {
                app.modal = None;
                if modal == Modal::ConfirmReset {
                    app.apply_reset();
                }
            }
            ModalAction::None => {}
        }
        return;
    }

    // Quit works everywhere; plain 'q' only where it cannot be typing
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.prompt.is_some() {
        handle_prompt_key(app, key).await;
        return;
    }

    match app.view {
        View::Dashboard => handle_dashboard_key(app, key).await,
        View::List => handle_list_key(app, key).await,
        View::Editor => handle_editor_key(app, key).await,
    }
}

async fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    let Some(prompt) = &mut app.prompt else {
        return;
    };
    match prompt {
        Prompt::Search(buffer) => match key.code {
            KeyCode::Esc => app.prompt = None,
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Enter => {
                let query = buffer.trim().to_string();
                app.prompt = None;
                if query.is_empty() {
                    // Empty search reloads the dashboard, like the web client
                    app.load_dashboard().await;
                } else {
                    app.run_search(SearchQuery::Text(query)).await;
                }
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        },
        Prompt::Topic => match key.code {
            KeyCode::Esc => app.prompt = None,
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let index = c as usize - '0' as usize;
                app.prompt = None;
                if let Some(topic) = TOPICS.get(index) {
                    app.run_search(SearchQuery::Tag(topic.to_string())).await;
                }
            }
            _ => {}
        },
    }
}

async fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.modal = Some(Modal::Help),
        KeyCode::Char('r') => app.load_dashboard().await,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Enter => app.open_selected_card().await,
        KeyCode::Char('1') => app.run_search(SearchQuery::Difficulty("Easy".into())).await,
        KeyCode::Char('2') => {
            app.run_search(SearchQuery::Difficulty("Medium".into()))
                .await
        }
        KeyCode::Char('3') => app.run_search(SearchQuery::Difficulty("Hard".into())).await,
        KeyCode::Char('f') => app.prompt = Some(Prompt::Topic),
        KeyCode::Char('/') => app.prompt = Some(Prompt::Search(String::new())),
        _ => {}
    }
}

async fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.modal = Some(Modal::Help),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Enter => app.open_selected_problem().await,
        KeyCode::Esc | KeyCode::Char('b') => app.load_dashboard().await,
        _ => {}
    }
}

async fn handle_editor_key(app: &mut App, key: KeyEvent) {
    // Application chords first; everything else is typing
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Enter => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    app.submit().await;
                } else {
                    app.run_custom().await;
                }
            }
            KeyCode::Char('l') => app.cycle_language(),
            KeyCode::Char('t') => app.cycle_tab(),
            KeyCode::Char('p') => app.toggle_console_pane(),
            KeyCode::Char('w') => app.focus = app.focus.next(),
            KeyCode::Char('h') => app.modal = Some(Modal::Help),
            KeyCode::Char('r') => {
                if app.session.current_problem().is_some() {
                    app.modal = Some(Modal::ConfirmReset);
                }
            }
            _ => {}
        }
        return;
    }

    if key.code == KeyCode::Esc {
        app.go_back().await;
        return;
    }

    if app.focused_area().handle_key(key) {
        app.on_content_changed();
    }
}
