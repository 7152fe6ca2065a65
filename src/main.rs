//! blockdrop - falling blocks in the terminal

mod input;
mod ui;

use blockdrop::settings::Settings;
use blockdrop::timer::DropTimer;
use blockdrop::{Action, GameEngine, TickOutcome};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::{Command, InputHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::Instant,
};

/// Get the blockdrop temp directory, creating it if needed
fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blockdrop");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();

    // Logs go to a file; the terminal belongs to the game
    let log_dir = temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blockdrop=debug"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "blockdrop starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    // Writes the defaults on first run
    let settings = Settings::load().unwrap_or_else(|e| {
        tracing::warn!("using default settings: {}", e);
        Settings::default()
    });

    let mut game = match settings.gameplay.seed {
        Some(seed) => {
            tracing::info!(seed, "seeded game");
            GameEngine::with_seed(seed)
        }
        None => GameEngine::new(),
    };
    let input = InputHandler::from_settings(&settings);

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut game, &input, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    let score = game.score();
    tracing::info!(points = score.points, lines = score.lines, "shutting down");
    if result.is_ok() {
        println!("\nThanks for playing blockdrop!");
        println!("Final Score: {} | Lines: {}", score.points, score.lines);
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut GameEngine,
    input: &InputHandler,
    settings: &Settings,
) -> io::Result<()> {
    let mut timer = DropTimer::new(settings.gameplay.tick_interval(), Instant::now());

    loop {
        let snapshot = game.snapshot();
        terminal.draw(|frame| ui::render_game(frame, &snapshot, settings))?;

        // Wait for input until the next gravity tick is due
        if event::poll(timer.time_until_due(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let command = if game.is_game_over() {
                        Some(input.game_over_key(key))
                    } else {
                        input.key_down(key)
                    };
                    match command {
                        Some(Command::Quit) => return Ok(()),
                        Some(Command::Game(Action::Reset)) => {
                            game.reset();
                            timer.restart(Instant::now());
                        }
                        Some(Command::Game(action)) => game.apply(action),
                        None => {}
                    }
                }
            }
        }

        if timer.poll(Instant::now()) {
            if let TickOutcome::ToppedOut { .. } = game.tick() {
                tracing::info!(points = game.score().points, "topped out");
            }
        }
    }
}
