use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use arcade_snake::clock::TickClock;
use arcade_snake::config::{CollisionPolicy, Difficulty, FRAME_INTERVAL, THEME_CLASSIC};
use arcade_snake::game::{GameOverCause, GameState, Status, StepOutcome};
use arcade_snake::input::{GameInput, InputHandler};
use arcade_snake::renderer;
use arcade_snake::score::{self, Leaderboard};
use arcade_snake::terminal_runtime::{AppTerminal, TerminalSession};
use arcade_snake::ui::hud::HudInfo;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Difficulty preset; defaults to the one used last time.
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Seed food placement for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// Leaderboard file location.
    #[arg(long = "scores-file")]
    scores_file: Option<PathBuf>,

    /// Log file location; filtered with RUST_LOG (default `info`).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Let the head move into the cell the tail leaves in the same tick.
    #[arg(long = "tail-vacates")]
    tail_vacates: bool,
}

/// Per-session bookkeeping the renderer needs beyond the snapshot.
#[derive(Debug, Default)]
struct Session {
    previous_high_score: u32,
    last_cause: Option<GameOverCause>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file.clone().unwrap_or_else(score::log_path));

    let scores_path = cli.scores_file.clone().unwrap_or_else(score::leaderboard_path);
    // An unreadable file is left alone; scores from this session are not saved.
    let (mut leaderboard, save_path) = match Leaderboard::load_or_backup(&scores_path) {
        Ok(board) => (board, Some(scores_path.as_path())),
        Err(error) => {
            eprintln!("Leaderboard unavailable, scores will not be saved: {error}");
            warn!(%error, "starting with an unsaved empty leaderboard");
            (Leaderboard::default(), None)
        }
    };

    let mut session = TerminalSession::enter()?;
    let result = run(session.terminal_mut(), &cli, &mut leaderboard, save_path);
    drop(session);

    if let Some(path) = save_path {
        if let Err(error) = leaderboard.save_to_path(path) {
            eprintln!("Failed to save leaderboard: {error}");
        }
    }

    result
}

fn run(
    terminal: &mut AppTerminal,
    cli: &Cli,
    leaderboard: &mut Leaderboard,
    save_path: Option<&Path>,
) -> io::Result<()> {
    let difficulty = cli
        .difficulty
        .or(leaderboard.last_difficulty())
        .unwrap_or_default();
    let mut state = match cli.seed {
        Some(seed) => GameState::new_with_seed(difficulty, seed),
        None => GameState::new(difficulty),
    }
    .map_err(io::Error::other)?;
    if cli.tail_vacates {
        state.set_collision_policy(CollisionPolicy::TailVacates);
    }
    leaderboard.set_last_difficulty(difficulty);
    info!(%difficulty, seed = ?cli.seed, "session started");

    let mut input = InputHandler;
    let mut clock = TickClock::new(difficulty.params().tick_interval, Instant::now());
    let mut session = Session {
        previous_high_score: leaderboard.high_score(difficulty),
        last_cause: None,
    };

    loop {
        let snapshot = state.snapshot();
        let hud_info = HudInfo {
            high_score: leaderboard
                .high_score(snapshot.difficulty)
                .max(snapshot.score),
            previous_high_score: session.previous_high_score,
            last_cause: session.last_cause,
            leaderboard: leaderboard.entries(),
            theme: &THEME_CLASSIC,
        };
        terminal.draw(|frame| renderer::render(frame, &snapshot, &hud_info))?;

        let timeout = clock.time_until_due(Instant::now()).min(FRAME_INTERVAL);
        if let Some(game_input) = input.poll_input(timeout)? {
            if game_input == GameInput::Quit {
                break;
            }

            let was_playing = state.status() == Status::Playing;
            handle_input(&mut state, game_input).map_err(io::Error::other)?;

            if state.status() == Status::Idle {
                session.previous_high_score = leaderboard.high_score(state.difficulty());
                session.last_cause = None;
                leaderboard.set_last_difficulty(state.difficulty());
                clock.set_interval(state.difficulty().params().tick_interval);
            }
            if !was_playing && state.status() == Status::Playing {
                clock.restart(Instant::now());
            }
        }

        let now = Instant::now();
        if state.status() == Status::Playing && clock.is_due(now) {
            clock.restart(now);
            if let StepOutcome::GameOver(event) = state.step() {
                session.last_cause = Some(event.cause);
                leaderboard.record(event);
                if let Some(path) = save_path {
                    if let Err(error) = leaderboard.save_to_path(path) {
                        warn!(%error, "failed to save leaderboard");
                    }
                }
            }
        }
    }

    info!("session ended");
    Ok(())
}

fn handle_input(
    state: &mut GameState,
    input: GameInput,
) -> Result<(), arcade_snake::error::GameError> {
    match input {
        GameInput::Direction(direction) => {
            state.request_direction(direction);
        }
        GameInput::Pause => state.toggle_pause(),
        GameInput::Start if state.status() == Status::GameOver => state.restart()?,
        GameInput::Start => {
            state.start();
        }
        GameInput::Reset => state.restart()?,
        GameInput::CycleDifficulty if state.status() != Status::Playing => {
            state.change_difficulty(state.difficulty().next())?;
        }
        GameInput::CycleDifficulty | GameInput::Quit => {}
    }

    Ok(())
}

/// Sends tracing output to `path`; stdout belongs to the terminal UI.
fn init_logging(path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
