use chrono::{DateTime, SecondsFormat, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{CollisionPolicy, Difficulty, GridSize, POINTS_PER_FOOD};
use crate::error::GameError;
use crate::food::place_food;
use crate::input::Direction;
use crate::snake::{Position, Snake};

/// High-level lifecycle of one game instance.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    /// Freshly reset; waiting for the first direction input.
    Idle,
    Playing,
    Paused,
    /// Terminal until the next reset.
    GameOver,
}

/// What ended a game.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameOverCause {
    Wall,
    Body,
    /// The snake covered the grid and no food could be placed.
    BoardFull,
}

/// Terminal event handed to the scoring collaborator once per game.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverEvent {
    pub final_score: u32,
    pub difficulty: Difficulty,
    pub cause: GameOverCause,
    pub timestamp: DateTime<Utc>,
}

impl GameOverEvent {
    #[must_use]
    pub fn timestamp_iso8601(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Result of one call to [`GameState::step`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StepOutcome {
    /// The game was not playing; nothing changed.
    Skipped,
    Moved { ate: bool },
    GameOver(GameOverEvent),
}

/// Read-only view handed to the renderer each frame.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub snake: Vec<Position>,
    pub food: Position,
    pub direction: Direction,
    pub status: Status,
    pub score: u32,
    pub grid_size: u16,
    pub difficulty: Difficulty,
}

/// Authoritative state of one snake game.
///
/// Mutated only through [`reset`](Self::reset),
/// [`request_direction`](Self::request_direction),
/// [`start`](Self::start), [`toggle_pause`](Self::toggle_pause) and
/// [`step`](Self::step).
#[derive(Debug, Clone)]
pub struct GameState {
    snake: Snake,
    food: Position,
    score: u32,
    status: Status,
    tick_count: u64,
    grid: GridSize,
    difficulty: Difficulty,
    policy: CollisionPolicy,
    rng: StdRng,
}

impl GameState {
    /// Creates an idle game for `difficulty` seeded from OS entropy.
    pub fn new(difficulty: Difficulty) -> Result<Self, GameError> {
        Self::with_rng(difficulty, difficulty.params().grid, StdRng::from_entropy())
    }

    /// Creates a deterministic idle game for tests and reproducible runs.
    pub fn new_with_seed(difficulty: Difficulty, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(
            difficulty,
            difficulty.params().grid,
            StdRng::seed_from_u64(seed),
        )
    }

    /// Creates a deterministic idle game on a custom grid size.
    pub fn with_grid_size(
        grid_size: u16,
        difficulty: Difficulty,
        seed: u64,
    ) -> Result<Self, GameError> {
        Self::with_rng(
            difficulty,
            GridSize::new(grid_size)?,
            StdRng::seed_from_u64(seed),
        )
    }

    /// Creates a game already in progress from an explicit layout.
    ///
    /// The game starts in [`Status::Playing`]. Fails when a segment or the
    /// food lies outside the grid, segments overlap, or food sits on the snake.
    pub fn from_layout(
        grid_size: u16,
        difficulty: Difficulty,
        snake: Snake,
        food: Position,
        seed: u64,
    ) -> Result<Self, GameError> {
        let grid = GridSize::new(grid_size)?;
        let invalid = GameError::InvalidLayout { size: grid_size };

        let segments: Vec<Position> = snake.segments().copied().collect();
        let fits = segments.iter().all(|segment| segment.is_within(grid));
        let distinct = segments
            .iter()
            .enumerate()
            .all(|(index, segment)| !segments[index + 1..].contains(segment));
        if !fits || !distinct || !food.is_within(grid) || snake.occupies(food) {
            return Err(invalid);
        }

        Ok(Self {
            snake,
            food,
            score: 0,
            status: Status::Playing,
            tick_count: 0,
            grid,
            difficulty,
            policy: CollisionPolicy::default(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn with_rng(difficulty: Difficulty, grid: GridSize, mut rng: StdRng) -> Result<Self, GameError> {
        let (snake, food) = fresh_layout(&mut rng, grid, Direction::Right)?;

        Ok(Self {
            snake,
            food,
            score: 0,
            status: Status::Idle,
            tick_count: 0,
            grid,
            difficulty,
            policy: CollisionPolicy::default(),
            rng,
        })
    }

    /// Starts a new game on a `grid_size` grid heading right.
    ///
    /// On error the current game is left untouched.
    pub fn reset(&mut self, grid_size: u16) -> Result<(), GameError> {
        self.reset_with_direction(grid_size, Direction::Right)
    }

    /// Starts a new game on a `grid_size` grid heading `direction`.
    pub fn reset_with_direction(
        &mut self,
        grid_size: u16,
        direction: Direction,
    ) -> Result<(), GameError> {
        let grid = GridSize::new(grid_size)?;
        let (snake, food) = fresh_layout(&mut self.rng, grid, direction)?;

        self.snake = snake;
        self.food = food;
        self.grid = grid;
        self.score = 0;
        self.tick_count = 0;
        self.status = Status::Idle;

        info!(grid_size, difficulty = %self.difficulty, "game reset");
        Ok(())
    }

    /// Resets on the current grid.
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.reset(self.grid.size())
    }

    /// Switches preset and resets on its grid.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        let previous = self.difficulty;
        self.difficulty = difficulty;

        if let Err(error) = self.reset(difficulty.params().grid.size()) {
            self.difficulty = previous;
            return Err(error);
        }

        Ok(())
    }

    /// Offers a new direction for the next step.
    ///
    /// Ignored unless the game is idle or playing. Any directional input
    /// starts an idle game, even one the reversal guard then drops. Returns
    /// whether the direction was buffered.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        match self.status {
            Status::Idle => {
                self.status = Status::Playing;
                info!(?direction, "game started by direction input");
            }
            Status::Playing => {}
            Status::Paused | Status::GameOver => return false,
        }

        if !self.snake.request_direction(direction) {
            debug!(?direction, current = ?self.snake.direction(), "direction rejected");
            return false;
        }

        true
    }

    /// Moves an idle game to playing without changing direction.
    pub fn start(&mut self) -> bool {
        if self.status != Status::Idle {
            return false;
        }

        self.status = Status::Playing;
        info!("game started");
        true
    }

    /// Toggles between playing and paused; ignored in any other status.
    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            Status::Playing => Status::Paused,
            Status::Paused => Status::Playing,
            other => other,
        };

        debug!(status = ?self.status, "pause toggled");
    }

    /// Advances the simulation by one tick.
    ///
    /// Does nothing unless the game is playing. A collision leaves the snake
    /// where it was and returns the one terminal event for this game.
    pub fn step(&mut self) -> StepOutcome {
        if self.status != Status::Playing {
            return StepOutcome::Skipped;
        }

        self.tick_count += 1;
        self.snake.commit_direction();
        let head = self.snake.next_head();

        if !head.is_within(self.grid) {
            return self.finish(GameOverCause::Wall);
        }

        let ate = head == self.food;
        if self.snake.hits_body(head, self.policy, ate) {
            return self.finish(GameOverCause::Body);
        }

        self.snake.advance(head, ate);

        if ate {
            self.score += POINTS_PER_FOOD;
            match place_food(&mut self.rng, &self.snake, self.grid) {
                Ok(food) => self.food = food,
                Err(error) => {
                    warn!(%error, "no room left for food");
                    return self.finish(GameOverCause::BoardFull);
                }
            }
        }

        StepOutcome::Moved { ate }
    }

    fn finish(&mut self, cause: GameOverCause) -> StepOutcome {
        self.status = Status::GameOver;

        let event = GameOverEvent {
            final_score: self.score,
            difficulty: self.difficulty,
            cause,
            timestamp: Utc::now(),
        };
        info!(
            score = event.final_score,
            difficulty = %event.difficulty,
            ?cause,
            ticks = self.tick_count,
            "game over"
        );

        StepOutcome::GameOver(event)
    }

    /// Copies the state the renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            direction: self.snake.direction(),
            status: self.status,
            score: self.score,
            grid_size: self.grid.size(),
            difficulty: self.difficulty,
        }
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Position {
        self.food
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Number of steps taken since the last reset.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn collision_policy(&self) -> CollisionPolicy {
        self.policy
    }

    pub fn set_collision_policy(&mut self, policy: CollisionPolicy) {
        self.policy = policy;
    }
}

fn fresh_layout(
    rng: &mut StdRng,
    grid: GridSize,
    direction: Direction,
) -> Result<(Snake, Position), GameError> {
    let center = i32::from(grid.size() / 2);
    let snake = Snake::new(Position::new(center, center), direction);
    let food = place_food(rng, &snake, grid)?;
    Ok((snake, food))
}
