//! Pipefolio CLI - a portfolio that scrolls like a CI/CD pipeline

mod app;
mod clock;
mod color;
mod config;
mod logging;
mod ui;
mod views;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pipefolio_core::Portfolio;
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Rows moved per mouse wheel notch
const WHEEL_ROWS: isize = 3;

#[derive(Parser, Debug)]
#[command(name = "pipefolio")]
#[command(author, version, about = "A portfolio that scrolls like a CI/CD pipeline")]
struct Args {
    /// Portfolio TOML file (defaults to the built-in portfolio)
    #[arg(short, long)]
    content: Option<PathBuf>,

    /// Built-in theme: jenkins, github, gitlab or ansi
    #[arg(short, long)]
    theme: Option<String>,

    /// Theme mode: dark or light
    #[arg(long, value_enum)]
    theme_mode: Option<CliThemeMode>,

    /// Start in zen mode (content only)
    #[arg(long)]
    zen: bool,

    /// Milliseconds a stage must stay active before it completes
    #[arg(long, value_name = "MS")]
    dwell: Option<u64>,

    /// Milliseconds between console log lines
    #[arg(long, value_name = "MS")]
    line_interval: Option<u64>,

    /// Milliseconds between typed prompt characters
    #[arg(long, value_name = "MS")]
    char_interval: Option<u64>,

    /// Write diagnostic logs to this file (or set PIPEFOLIO_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the resolved portfolio as JSON and exit
    #[arg(long)]
    dump_content: bool,

    /// List built-in themes and exit
    #[arg(long)]
    list_themes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliThemeMode {
    Dark,
    Light,
}

fn main() -> Result<()> {
    // The local offset can only be read while the process is single-threaded
    let clock = clock::Clock::local();
    let args = Args::parse();

    logging::init(logging::log_path(args.log_file.clone()).as_deref())?;

    if args.list_themes {
        for (name, _) in config::BUILTIN_THEMES {
            let marker = if *name == config::DEFAULT_THEME {
                " (default)"
            } else {
                ""
            };
            println!("{name}{marker}");
        }
        return Ok(());
    }

    let mut config = config::Config::load();

    let content_path = args.content.clone().or_else(|| config.content_path());
    let portfolio = match &content_path {
        Some(path) => Portfolio::load(path)
            .with_context(|| format!("Failed to load portfolio: {}", path.display()))?,
        None => Portfolio::builtin().context("Built-in portfolio is invalid")?,
    };
    tracing::info!(
        stages = portfolio.stage_count(),
        source = %content_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string()),
        "portfolio loaded"
    );

    if args.dump_content {
        println!("{}", portfolio.to_json()?);
        return Ok(());
    }

    // CLI overrides config
    if let Some(dwell) = args.dwell {
        config.timing.dwell_ms = dwell;
    }
    if let Some(interval) = args.line_interval {
        config.timing.line_interval_ms = interval;
    }
    if let Some(interval) = args.char_interval {
        config.timing.char_interval_ms = interval;
    }
    if let Some(theme) = args.theme.clone() {
        config.ui.theme.name = Some(theme);
    }

    let mut app = App::new(portfolio, &config.timing, &config.viewport);
    app.clock = clock;
    app.zen_mode = args.zen || config.ui.zen;
    app.nav_mode = config.ui.nav;
    app.progress_rail = config.ui.progress_rail;
    if let Some(build) = config.ui.build_number {
        app.build_number = build;
    }

    // Compute theme mode: CLI overrides config, default to dark
    let light_mode = match args.theme_mode {
        Some(CliThemeMode::Light) => true,
        Some(CliThemeMode::Dark) => false,
        None => config.ui.theme.is_light_mode(),
    };
    app.theme = config.ui.theme.resolve(light_mode);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let result = run_app(&mut terminal, &mut app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(%err, "event loop failed");
        eprintln!("Error: {}", err);
        return Err(err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let frame_interval = Duration::from_millis(16);
    let started = Instant::now();

    loop {
        app.tick(started.elapsed());
        terminal.draw(|f| ui::draw(f, app))?;

        // Sleep until the next frame or the next timer, whichever is sooner
        let timeout = app
            .time_until_next_timer(started.elapsed())
            .map_or(frame_interval, |due| due.min(frame_interval));

        if event::poll(timeout)? {
            let event = event::read()?;
            app.tick(started.elapsed());
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Any key skips the splash
    if app.is_booting() {
        app.finish_boot();
        return;
    }

    // The prompt popup is modal
    if app.prompt().is_some() {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('p')
        ) {
            app.close_prompt();
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.escape(),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_down();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_up();
        }
        KeyCode::PageDown => app.scroll_half_page_down(),
        KeyCode::PageUp => app.scroll_half_page_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        // Stage navigation
        KeyCode::Right | KeyCode::Char('n') | KeyCode::Char('l') => app.next_stage(),
        KeyCode::Left | KeyCode::Char('N') | KeyCode::Char('h') => app.prev_stage(),
        KeyCode::Char(c @ '1'..='9') => app.jump_to_number((c as u8 - b'0') as usize),
        KeyCode::Home | KeyCode::Char('g') => app.first_stage(),
        KeyCode::End | KeyCode::Char('G') => app.last_stage(),
        KeyCode::Char('p') => app.toggle_prompt(),
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('Z') => app.toggle_zen(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.is_booting() || app.prompt().is_some() {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => app.viewport.scroll_by(-WHEEL_ROWS),
        MouseEventKind::ScrollDown => app.viewport.scroll_by(WHEEL_ROWS),
        MouseEventKind::Down(MouseButton::Left) => {
            app.click(mouse.column, mouse.row);
        }
        _ => {}
    }
}
