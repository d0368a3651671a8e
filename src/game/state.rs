use std::time::Duration;

use super::action::Direction;

/// Grid side as a coordinate bound; validated configs always fit.
pub(crate) fn grid_side(grid_size: usize) -> i32 {
    i32::try_from(grid_size).unwrap_or(i32::MAX)
}

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Position>,
}

impl Snake {
    /// Create a one-cell snake
    pub fn new(head: Position) -> Self {
        Self { body: vec![head] }
    }

    /// Create a snake from its cells, head first.
    ///
    /// # Panics
    ///
    /// Panics if `body` is empty.
    pub fn from_body(body: Vec<Position>) -> Self {
        assert!(!body.is_empty(), "a snake needs at least one cell");
        Self { body }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    /// Check if any cell of the snake, head and tail included, is at `pos`
    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Prepend `new_head`, dropping the tail unless `grow` is set
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Lifecycle stage of one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    /// Waiting for the first direction input
    #[default]
    NotStarted,
    Running,
    Over,
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }

    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::Over)
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// One cell of a render snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellState {
    pub x: i32,
    pub y: i32,
    pub is_snake: bool,
    pub is_food: bool,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    /// Direction governing movement
    pub direction: Direction,
    /// Requested direction, committed at the next tick
    pub pending_direction: Direction,
    pub grid_size: usize,
    pub score: u32,
    /// Current tick interval in milliseconds
    pub speed_ms: u64,
    pub phase: GamePhase,
}

impl GameState {
    /// Create a fresh, not yet started state
    pub fn new(
        snake: Snake,
        food: Position,
        direction: Direction,
        grid_size: usize,
        speed_ms: u64,
    ) -> Self {
        Self {
            snake,
            food,
            direction,
            pending_direction: direction,
            grid_size,
            score: 0,
            speed_ms,
            phase: GamePhase::NotStarted,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let size = grid_side(self.grid_size);
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }
}
