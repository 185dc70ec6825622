//! streambrowse - terminal browser for streaming-media listings
//!
//! # Usage
//!
//! ```bash
//! # Launch the browser with the default provider
//! streambrowse
//!
//! # Browse a local media directory
//! streambrowse --provider files --media-dir ~/Videos
//!
//! # See what providers are available
//! streambrowse --list-providers
//! ```

use std::io::{stdout, Stdout};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    Frame, Terminal,
};
use tracing_subscriber::EnvFilter;

use streambrowse::cli::Cli;
use streambrowse::ui::table::StreamStatus;
use streambrowse::ui::Theme;
use streambrowse::{App, Config, Focus, ProviderRegistry};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let registry = ProviderRegistry::with_builtins();

    if cli.list_providers {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    if let Some(path) = &cli.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".parse().unwrap()),
            )
            .with_writer(file)
            .with_ansi(false)
            .init();
    }

    let mut config = Config::load();
    cli.apply(&mut config);

    let mut app = App::new(registry, config, cli.provider.as_deref())?;
    run_tui(&mut app).await
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(app: &mut App) -> Result<()> {
    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, app).await;
    // Always restore the terminal, even on error
    restore_terminal(&mut terminal)?;
    result
}

/// Main event loop - handles input, pulls stream rows, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(50);

    while app.running {
        // Pull a bounded budget of rows from the live query stream
        app.tick();

        terminal.draw(|frame| render_ui(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}

// =============================================================================
// UI Rendering
// =============================================================================

/// Main render function: toolbar strip, listing table, status line
fn render_ui(frame: &mut Frame, app: &mut App) {
    let [toolbar_area, table_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let focus = app.focus;
    let title = app.session().provider_name().to_uppercase();
    let status = status_text(app);

    let session = app.session_mut();
    session
        .toolbar
        .render(frame, toolbar_area, focus == Focus::Toolbar);
    session
        .table
        .render(frame, table_area, &title, focus == Focus::Table);

    render_status(frame, status_area, status);
}

/// Pick the status line content: transient message, stream state, or hints
fn status_text(app: &App) -> (String, ratatui::style::Style) {
    if let Some(message) = &app.status {
        return (message.clone(), Theme::accent());
    }
    match app.session().table.status() {
        StreamStatus::Truncated(reason) => {
            (format!("listing truncated: {}", reason), Theme::warning())
        }
        StreamStatus::Streaming | StreamStatus::Idle => ("loading...".to_string(), Theme::dimmed()),
        StreamStatus::Complete => (
            "q quit · / filter · tab focus · ^p provider · ^r refresh · d download · ? info"
                .to_string(),
            Theme::dimmed(),
        ),
    }
}

fn render_status(frame: &mut Frame, area: Rect, (text, style): (String, ratatui::style::Style)) {
    let line = Line::from(Span::styled(text, style));
    frame.render_widget(ratatui::widgets::Paragraph::new(line), area);
}
