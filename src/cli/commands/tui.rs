use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use std::time::Duration;

use crate::app::AngelTracker;
use crate::tui::ScreenRuntime;

const FRAME: Duration = Duration::from_millis(16);

pub async fn tui_command(tracker: &mut AngelTracker) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runtime = ScreenRuntime::new(tracker);
    let result = run_tui(&mut terminal, &mut runtime).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("TUI closed");
    result
}

async fn run_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    runtime: &mut ScreenRuntime<'_>,
) -> Result<()> {
    loop {
        let frame_start = std::time::Instant::now();

        // Process all pending events FIRST for minimal input latency
        let mut should_quit = false;
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    should_quit = true;
                    break;
                }

                if !runtime.handle_key(key)? {
                    should_quit = true;
                    break;
                }
            }
        }

        // Results land between input and drawing so the frame shows them
        if should_quit || !runtime.poll_async()? {
            break;
        }

        terminal.draw(|frame| runtime.render(frame))?;

        // Sleep for remainder of 16ms frame (60 FPS)
        if let Some(remaining) = FRAME.checked_sub(frame_start.elapsed()) {
            tokio::time::sleep(remaining).await;
        }
    }

    Ok(())
}
