use thiserror::Error;

/// Failures reported by the simulation core.
///
/// Rejected commands are not errors; they are silently ignored by
/// [`crate::game::GameState`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum GameError {
    /// The requested grid cannot hold a snake and food without overlap.
    #[error("grid size {size} is outside the playable range {min}..={max}")]
    InvalidGridSize { size: u16, min: u16, max: u16 },

    /// Every cell is covered by the snake, so no food can be placed.
    #[error("no free cell left on the {size}x{size} grid")]
    FullGrid { size: u16 },

    /// A supplied layout puts the snake or food off the grid or on top of each other.
    #[error("snake and food layout does not fit a {size}x{size} grid")]
    InvalidLayout { size: u16 },
}
