use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::{CollisionPolicy, GridSize};
use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies inside the grid.
    #[must_use]
    pub fn is_within(self, grid: GridSize) -> bool {
        let size = i32::from(grid.size());
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }

    /// Returns the neighbouring cell one move away in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Snake body plus its direction of travel and single-slot direction buffer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Direction,
}

impl Snake {
    /// Creates a one-cell snake at `start` heading in `direction`.
    #[must_use]
    pub fn new(start: Position, direction: Direction) -> Self {
        Self::from_segments(vec![start], direction)
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// Returns `None` when `segments` is empty.
    #[must_use]
    pub fn try_from_segments(segments: Vec<Position>, direction: Direction) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }

        Some(Self {
            body: VecDeque::from(segments),
            direction,
            pending_direction: direction,
        })
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        Self::try_from_segments(segments, direction)
            .expect("snake body must always contain at least one segment")
    }

    /// Offers `direction` to the pending slot.
    ///
    /// The request is dropped when it reverses the current direction of
    /// travel or the direction already waiting in the slot. Otherwise it
    /// overwrites the slot, so the last accepted request before a step wins.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.direction) || direction.is_opposite(self.pending_direction) {
            return false;
        }

        self.pending_direction = direction;
        true
    }

    /// Makes the pending direction the direction of travel.
    pub fn commit_direction(&mut self) -> Direction {
        self.direction = self.pending_direction;
        self.direction
    }

    /// Returns the head position one move ahead in the current direction.
    #[must_use]
    pub fn next_head(&self) -> Position {
        self.head().step(self.direction)
    }

    /// Returns true if a head entering `position` would hit the body.
    ///
    /// `growing` tells whether the tail stays in place this step; the tail is
    /// only skipped under [`CollisionPolicy::TailVacates`] when it moves away.
    #[must_use]
    pub fn hits_body(&self, position: Position, policy: CollisionPolicy, growing: bool) -> bool {
        let skip_tail = policy == CollisionPolicy::TailVacates && !growing;
        let checked = if skip_tail {
            self.body.len() - 1
        } else {
            self.body.len()
        };

        self.body.iter().take(checked).any(|segment| *segment == position)
    }

    /// Pushes `head` to the front and drops the tail unless `grow` is set.
    pub fn advance(&mut self, head: Position, grow: bool) {
        self.body.push_front(head);
        if !grow {
            let _ = self.body.pop_back();
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the current tail position.
    #[must_use]
    pub fn tail(&self) -> Position {
        *self
            .body
            .back()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
