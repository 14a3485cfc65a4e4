//! Snake simulation core plus the terminal collaborators that drive it.
//!
//! The [`game::GameState`] owns the authoritative state and advances it one
//! discrete step per tick. Everything else in the crate either feeds it
//! commands ([`input`], [`clock`]) or observes its snapshots and terminal
//! events ([`renderer`], [`score`]).

pub mod clock;
pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod input;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
