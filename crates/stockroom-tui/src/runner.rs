// TUI event loop and terminal management
use crate::{App, InputMode};
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

/// How often the screen refreshes while idle, so toasts can time out
const TICK: Duration = Duration::from_millis(250);

pub fn run_tui(mut app: App) -> anyhow::Result<()> {
    tracing::debug!(
        "Starting TUI on {} ({} records)",
        app.inventory.storage().describe(),
        app.inventory.len()
    );

    // Same warnings the app shows on startup
    app.check_warnings(Utc::now());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        app.expire_toasts(Instant::now());
        let now = Utc::now();
        terminal.draw(|f| crate::ui::render(f, app, now))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let now = Utc::now();

    match app.input_mode {
        InputMode::Searching => match key.code {
            KeyCode::Enter | KeyCode::Esc => app.enter_normal_mode(),
            KeyCode::Char(c) => app.push_search_char(c, now),
            KeyCode::Backspace => app.pop_search_char(now),
            _ => {}
        },
        InputMode::Form => match key.code {
            KeyCode::Esc => app.cancel_form(),
            KeyCode::Enter => app.submit_form(now),
            KeyCode::Tab | KeyCode::Down => app.form_next_field(),
            KeyCode::BackTab | KeyCode::Up => app.form_previous_field(),
            KeyCode::Char(c) => app.form_push_char(c),
            KeyCode::Backspace => app.form_pop_char(),
            _ => {}
        },
        InputMode::ConfirmDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(now),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('/') => app.enter_search_mode(),
            KeyCode::Char('f') | KeyCode::Char('F') => app.cycle_filter(now),
            KeyCode::Char('a') => app.start_add(),
            KeyCode::Char('e') | KeyCode::Enter => app.start_edit(now),
            KeyCode::Char('d') | KeyCode::Delete => app.request_delete(now),
            KeyCode::Char('x') => app.export(),
            KeyCode::Char('g') => app.seed_demo(now),
            KeyCode::Char('w') => app.check_warnings(now),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(now),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
    }
}
