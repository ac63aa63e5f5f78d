use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use super::app::{Mode, TuiApp};
use super::render::render_ui;
use crate::constants::{UI_POLL_INTERVAL_MS, UI_SCROLL_LINES};
use crate::gateway::{QueryGateway, QueryResponse, StatsResponse};
use crate::utils::GatewayError;

/// Results delivered back into the event loop from spawned requests
enum UiEvent {
    /// Outcome of an in-flight question, tagged with the originating
    /// session id captured at send time
    QueryDone(String, Result<QueryResponse, GatewayError>),
    Stats(Result<StatsResponse, GatewayError>),
}

/// Run the terminal UI
pub async fn run_ui(mut app: TuiApp, gateway: Arc<dyn QueryGateway>) -> Result<()> {
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        anyhow::bail!("Procura requires an interactive terminal");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let (tx, mut rx) = mpsc::channel::<UiEvent>(8);

    // Stats load in the background; a failure just leaves the header
    // showing "stats unavailable"
    {
        let gateway = gateway.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(UiEvent::Stats(gateway.stats().await)).await;
        });
    }

    let result = run_app(&mut terminal, &mut app, gateway, tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TuiApp,
    gateway: Arc<dyn QueryGateway>,
    tx: mpsc::Sender<UiEvent>,
    rx: &mut mpsc::Receiver<UiEvent>,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| render_ui(f, app))?;

        // Merge completed requests before handling more input
        while let Ok(ui_event) = rx.try_recv() {
            match ui_event {
                UiEvent::QueryDone(session_id, outcome) => {
                    app.controller.finish_send(&session_id, outcome);
                    app.scroll_offset = 0;
                }
                UiEvent::Stats(stats) => app.controller.set_stats(stats),
            }
        }

        if !event::poll(Duration::from_millis(UI_POLL_INTERVAL_MS))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Global bindings; other control chords are swallowed so they
        // never land in the input line
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => app.quit(),
                KeyCode::Char('n') => app.new_chat(),
                _ => {}
            }
            continue;
        }
        match key.code {
            KeyCode::PageUp => {
                app.scroll_up(UI_SCROLL_LINES);
                continue;
            }
            KeyCode::PageDown => {
                app.scroll_down(UI_SCROLL_LINES);
                continue;
            }
            _ => {}
        }

        match app.mode {
            Mode::Insert => handle_insert_key(app, key.code, &gateway, &tx),
            Mode::Normal => handle_normal_key(app, key.code),
        }
    }

    Ok(())
}

/// Keys while typing into the input line
fn handle_insert_key(
    app: &mut TuiApp,
    code: KeyCode,
    gateway: &Arc<dyn QueryGateway>,
    tx: &mpsc::Sender<UiEvent>,
) {
    match code {
        KeyCode::Esc => app.mode = Mode::Normal,
        KeyCode::Enter => {
            // No-op while loading or on blank input; the controller
            // gates both
            if let Some(pending) = app.controller.begin_send() {
                app.scroll_offset = 0;
                let gateway = gateway.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let outcome = gateway.ask(&pending.question).await;
                    let _ = tx
                        .send(UiEvent::QueryDone(pending.session_id, outcome))
                        .await;
                });
            }
        }
        KeyCode::Char(c) => app.controller.input_mut().push(c),
        KeyCode::Backspace => {
            app.controller.input_mut().pop();
        }
        _ => {}
    }
}

/// Keys while browsing the sidebar and scrollback
fn handle_normal_key(app: &mut TuiApp, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('i') => app.mode = Mode::Insert,
        KeyCode::Char('n') => app.new_chat(),
        KeyCode::Char('d') => app.delete_highlighted(),
        KeyCode::Tab => app.toggle_sidebar(),
        KeyCode::Down | KeyCode::Char('j') => app.sidebar_move(1),
        KeyCode::Up | KeyCode::Char('k') => app.sidebar_move(-1),
        KeyCode::Enter => {
            app.select_highlighted();
            app.mode = Mode::Insert;
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.use_example(index);
        }
        _ => {}
    }
}
