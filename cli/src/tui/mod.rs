pub mod app;
pub mod ui;

use std::io;
use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use hostelbook_core::{AppConfig, BookingService, FileBookingRepository};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::error;

use crate::tui::app::{App, InputMode, Tab};

pub fn run(service: BookingService<FileBookingRepository>, config: AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(service, config, Local::now().date_naive());
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("dashboard stopped: {}", err);
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(std::time::Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Tab => app.next_tab(),
                KeyCode::Char('1') => app.select_tab(Tab::Current),
                KeyCode::Char('2') => app.select_tab(Tab::Movements),
                KeyCode::Char('3') => app.select_tab(Tab::Bookings),
                KeyCode::Char('4') => app.select_tab(Tab::Occupancy),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Left | KeyCode::Char('h') => app.shift_day(-1),
                KeyCode::Right | KeyCode::Char('l') => app.shift_day(1),
                KeyCode::Char('f') => app.cycle_filter(),
                KeyCode::Char('+') => app.widen_window(),
                KeyCode::Char('-') => app.narrow_window(),
                KeyCode::Char('r') => app.reload(),
                KeyCode::Char('R') => {
                    app.message = Some("Refreshing from portal...".to_string());
                    terminal.draw(|f| ui::draw(f, app))
                        .map_err(|e| io::Error::other(e.to_string()))?;
                    app.refresh_from_portal();
                }
                KeyCode::Char('a') => app.enter_add_mode(),
                KeyCode::Char('e') => app.export(),
                _ => {}
            },
            InputMode::Adding => match key.code {
                KeyCode::Enter => app.submit_command(),
                KeyCode::Esc => app.exit_input_mode(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                KeyCode::Left => app.move_cursor_left(),
                KeyCode::Right => app.move_cursor_right(),
                _ => {}
            },
        }
    }
}
