use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Smallest grid that still leaves room for a snake and its food.
pub const MIN_GRID_SIZE: u16 = 5;

/// Largest supported grid edge.
pub const MAX_GRID_SIZE: u16 = 255;

/// Score granted for each food eaten.
pub const POINTS_PER_FOOD: u32 = 10;

/// Random draws made before food placement chooses among the free cells.
pub const FOOD_PLACEMENT_ATTEMPTS: usize = 16;

/// Square play field of `size × size` cells, origin top-left.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct GridSize {
    size: u16,
}

impl GridSize {
    /// Validates `size` against [`MIN_GRID_SIZE`] and [`MAX_GRID_SIZE`].
    pub fn new(size: u16) -> Result<Self, GameError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            return Err(GameError::InvalidGridSize {
                size,
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            });
        }

        Ok(Self { size })
    }

    /// Returns the edge length in cells.
    #[must_use]
    pub fn size(self) -> u16 {
        self.size
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.size) * usize::from(self.size)
    }
}

/// Named preset selecting tick interval and grid size.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
    ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Parameters fixed for one game instance.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DifficultyParams {
    pub tick_interval: Duration,
    pub grid: GridSize,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub fn params(self) -> DifficultyParams {
        let (tick_ms, size) = match self {
            Self::Easy => (150, 15),
            Self::Medium => (100, 20),
            Self::Hard => (70, 25),
        };

        DifficultyParams {
            tick_interval: Duration::from_millis(tick_ms),
            grid: GridSize { size },
        }
    }

    /// Returns the next preset in menu order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a step treats the tail cell when checking for self collision.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum CollisionPolicy {
    /// The new head is checked against the full pre-move body, tail included.
    #[default]
    Strict,
    /// The tail is ignored when it is vacated in the same step (no food eaten).
    TailVacates,
}

/// Colors applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub snake_tail: Color,
    pub food: Color,
    pub border_fg: Color,
    pub hud_label: Color,
    pub hud_value: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

pub const THEME_CLASSIC: Theme = Theme {
    snake_head: Color::White,
    snake_body: Color::Green,
    snake_tail: Color::DarkGray,
    food: Color::Red,
    border_fg: Color::White,
    hud_label: Color::DarkGray,
    hud_value: Color::White,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Terminal columns used to draw one grid cell, so cells look square.
pub const CELL_WIDTH: u16 = 2;

pub const GLYPH_SNAKE_HEAD_UP: &str = "▲▲";
pub const GLYPH_SNAKE_HEAD_DOWN: &str = "▼▼";
pub const GLYPH_SNAKE_HEAD_LEFT: &str = "◀◀";
pub const GLYPH_SNAKE_HEAD_RIGHT: &str = "▶▶";
pub const GLYPH_SNAKE_BODY: &str = "██";
pub const GLYPH_SNAKE_TAIL: &str = "▓▓";
pub const GLYPH_FOOD: &str = "◖◗";

/// Upper bound on how long the main loop waits for input between frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
