use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::{
    action::Direction,
    config::GameConfig,
    state::{CellState, CollisionType, GamePhase, GameState, Position, Snake, grid_side},
};
use crate::error::ConfigError;
use crate::host::ExitPayload;

/// Result of a game tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Phase after the tick
    pub phase: GamePhase,
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Type of collision if one ended the round
    pub collision: Option<CollisionType>,
}

impl TickOutcome {
    fn idle(phase: GamePhase) -> Self {
        Self {
            phase,
            ate_food: false,
            collision: None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase.is_over()
    }
}

/// Owns one round of Snake and every transition on it.
///
/// All mutation goes through [`reset`](Self::reset),
/// [`set_direction`](Self::set_direction) and [`tick`](Self::tick); callers
/// must not interleave these from different threads.
#[derive(Debug)]
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = Self::fresh_state(&config, &mut rng);
        Ok(Self { config, state, rng })
    }

    fn fresh_state(config: &GameConfig, rng: &mut StdRng) -> GameState {
        GameState::new(
            Snake::new(config.start_position()),
            random_cell(rng, config.grid_size),
            config.start_direction,
            config.grid_size,
            config.initial_speed_ms,
        )
    }

    /// Reset the game to its initial, not yet started state
    pub fn reset(&mut self) {
        self.state = Self::fresh_state(&self.config, &mut self.rng);
        debug!(food = ?self.state.food, "game reset");
    }

    /// Request a new direction, applied at the next tick.
    ///
    /// The first request of a round starts it, even when the request itself
    /// is rejected. A request opposite to the committed direction is
    /// rejected. Returns whether the pending direction was updated.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        match self.state.phase {
            GamePhase::Over => return false,
            GamePhase::NotStarted => {
                self.state.phase = GamePhase::Running;
                debug!("game started");
            }
            GamePhase::Running => {}
        }

        if self.state.direction.is_opposite(requested) {
            debug!(
                current = %self.state.direction,
                %requested,
                "rejected reversal"
            );
            return false;
        }

        self.state.pending_direction = requested;
        true
    }

    /// Like [`set_direction`](Self::set_direction), for direction names coming
    /// from the host. Unrecognized names leave the state untouched.
    ///
    /// Library API for hosts that deliver input as strings (`"ArrowUp"`,
    /// `"left"`); the terminal front-end maps keys to [`Direction`] directly.
    pub fn set_direction_str(&mut self, name: &str) -> bool {
        match name.parse::<Direction>() {
            Ok(direction) => self.set_direction(direction),
            Err(err) => {
                warn!(%err, "ignoring malformed direction input");
                false
            }
        }
    }

    /// Advance the simulation by one step
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.phase.is_running() {
            return TickOutcome::idle(self.state.phase);
        }

        self.state.direction = self.state.pending_direction;
        let new_head = self.state.snake.head().moved_in_direction(self.state.direction);

        if let Some(collision) = self.check_collision(new_head) {
            self.state.phase = GamePhase::Over;
            info!(
                score = self.state.score,
                length = self.state.snake.len(),
                ?collision,
                "game over"
            );

            return TickOutcome {
                phase: GamePhase::Over,
                ate_food: false,
                collision: Some(collision),
            };
        }

        let ate_food = new_head == self.state.food;
        self.state.snake.advance(new_head, ate_food);

        if ate_food {
            self.state.score += 1;
            self.state.speed_ms = self.config.next_speed_ms(self.state.speed_ms);
            let food = self.place_food();
            debug!(
                score = self.state.score,
                speed_ms = self.state.speed_ms,
                ?food,
                "food eaten"
            );
        }

        TickOutcome {
            phase: GamePhase::Running,
            ate_food,
            collision: None,
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // The tail has not moved yet, so stepping onto it is fatal too.
        if self.state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Move the food to a uniformly random cell.
    ///
    /// Snake cells are not excluded, so food can appear under the body.
    pub fn place_food(&mut self) -> Position {
        self.state.food = random_cell(&mut self.rng, self.config.grid_size);
        self.state.food
    }

    /// Row-major view of every cell, for rendering
    pub fn cells(&self) -> impl Iterator<Item = CellState> + '_ {
        let size = grid_side(self.state.grid_size);
        (0..size).flat_map(move |y| {
            (0..size).map(move |x| {
                let pos = Position::new(x, y);
                CellState {
                    x,
                    y,
                    is_snake: self.state.snake.contains(pos),
                    is_food: self.state.food == pos,
                }
            })
        })
    }

    /// Materialized [`cells`](Self::cells); index is `y * grid_size + x`
    pub fn snapshot(&self) -> Vec<CellState> {
        self.cells().collect()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.state.snake
    }

    pub fn food(&self) -> Position {
        self.state.food
    }

    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.state.pending_direction
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Current tick interval; re-read after every tick
    pub fn speed(&self) -> Duration {
        self.state.speed()
    }

    pub fn speed_ms(&self) -> u64 {
        self.state.speed_ms
    }

    /// Score hand-off for the host's exit action
    pub fn exit_payload(&self) -> ExitPayload {
        ExitPayload::new(self.state.score)
    }
}

fn random_cell(rng: &mut StdRng, grid_size: usize) -> Position {
    let size = grid_side(grid_size);
    let x = rng.gen_range(0..size);
    let y = rng.gen_range(0..size);
    Position::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7).unwrap()
    }

    /// Engine already running with the given snake, direction and food
    fn running(body: Vec<Position>, direction: Direction, food: Position) -> GameEngine {
        let mut engine = engine();
        engine.state.snake = Snake::from_body(body);
        engine.state.direction = direction;
        engine.state.pending_direction = direction;
        engine.state.food = food;
        engine.state.phase = GamePhase::Running;
        engine
    }

    #[test]
    fn test_reset() {
        let engine = engine();
        let state = engine.state();

        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed_ms, 150);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.snake.body(), &[Position::new(10, 10)]);
        assert!(state.is_in_bounds(state.food));
    }

    #[test]
    fn test_reset_twice_matches_reset_once() {
        let mut once = engine();
        once.set_direction(Direction::Up);
        once.tick();
        once.reset();

        let mut twice = engine();
        twice.reset();
        twice.reset();

        // Food is drawn from the RNG on each reset; everything else is fixed.
        let mut a = once.state().clone();
        let mut b = twice.state().clone();
        a.food = Position::new(0, 0);
        b.food = Position::new(0, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let a = GameEngine::with_seed(GameConfig::default(), 42).unwrap();
        let b = GameEngine::with_seed(GameConfig::default(), 42).unwrap();
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            grid_size: 0,
            ..Default::default()
        };
        assert!(GameEngine::new(config).is_err());

        let err = GameEngine::new(GameConfig::new(1 << 20)).unwrap_err();
        assert!(matches!(err, ConfigError::GridTooLarge { .. }));
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut engine = engine();
        let before = engine.state().clone();

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::idle(GamePhase::NotStarted));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_first_move_right() {
        let mut engine = engine();
        engine.state.food = Position::new(0, 0);
        assert!(engine.set_direction(Direction::Right));
        assert_eq!(engine.phase(), GamePhase::Running);

        let outcome = engine.tick();

        assert_eq!(outcome.phase, GamePhase::Running);
        assert!(!outcome.ate_food);
        assert_eq!(engine.snake().body(), &[Position::new(11, 10)]);
    }

    #[test]
    fn test_rejected_first_input_still_starts_game() {
        let mut engine = engine();

        assert!(!engine.set_direction(Direction::Left));

        assert_eq!(engine.phase(), GamePhase::Running);
        assert_eq!(engine.pending_direction(), Direction::Right);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = running(
            vec![Position::new(19, 10)],
            Direction::Right,
            Position::new(0, 0),
        );
        let snake_before = engine.snake().clone();

        let outcome = engine.tick();

        assert!(outcome.is_game_over());
        assert_eq!(outcome.collision, Some(CollisionType::Wall));
        assert_eq!(engine.snake(), &snake_before);
    }

    #[test]
    fn test_self_collision_on_neck() {
        let mut engine = running(
            vec![Position::new(10, 10), Position::new(9, 10)],
            Direction::Left,
            Position::new(0, 0),
        );

        let outcome = engine.tick();

        assert_eq!(outcome.phase, GamePhase::Over);
        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
        assert_eq!(engine.snake().len(), 2);
    }

    #[test]
    fn test_self_collision_on_tail_cell() {
        // A 2x2 loop: the head steps into the cell the tail still occupies.
        let mut engine = running(
            vec![
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(6, 6),
                Position::new(6, 5),
            ],
            Direction::Up,
            Position::new(0, 0),
        );
        engine.set_direction(Direction::Right);

        let outcome = engine.tick();

        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = running(
            vec![Position::new(10, 10)],
            Direction::Right,
            Position::new(11, 10),
        );

        let outcome = engine.tick();

        assert!(outcome.ate_food);
        assert_eq!(outcome.phase, GamePhase::Running);
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.speed_ms(), 145);
        assert_eq!(
            engine.snake().body(),
            &[Position::new(11, 10), Position::new(10, 10)]
        );
        assert!(engine.state().is_in_bounds(engine.food()));
    }

    #[test]
    fn test_speed_floor() {
        let mut engine = running(
            vec![Position::new(10, 10)],
            Direction::Right,
            Position::new(11, 10),
        );
        engine.state.speed_ms = 52;
        engine.tick();
        assert_eq!(engine.speed_ms(), 50);

        engine.state.food = engine.snake().head().moved_in_direction(Direction::Right);
        engine.tick();
        assert_eq!(engine.speed_ms(), 50);
        assert_eq!(engine.score(), 2);
    }

    #[test]
    fn test_move_keeps_length() {
        let mut engine = running(
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Direction::Right,
            Position::new(0, 0),
        );

        engine.set_direction(Direction::Down);
        engine.tick();

        assert_eq!(
            engine.snake().body(),
            &[Position::new(5, 6), Position::new(5, 5), Position::new(4, 5)]
        );
    }

    #[test]
    fn test_prevent_reversal_for_every_direction() {
        for direction in Direction::ALL {
            let mut engine = running(vec![Position::new(10, 10)], direction, Position::new(0, 0));

            assert!(!engine.set_direction(direction.opposite()));

            assert_eq!(engine.direction(), direction);
            assert_eq!(engine.pending_direction(), direction);
        }
    }

    #[test]
    fn test_opposite_check_uses_committed_direction() {
        let mut engine = engine();

        // Committed direction is Right, so neither request is a reversal.
        assert!(engine.set_direction(Direction::Up));
        assert!(engine.set_direction(Direction::Down));
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.pending_direction(), Direction::Down);

        engine.state.food = Position::new(0, 0);
        engine.tick();
        assert_eq!(engine.direction(), Direction::Down);

        // Once Down is committed, Up is a reversal.
        assert!(!engine.set_direction(Direction::Up));
    }

    #[test]
    fn test_game_over_freezes_state() {
        let mut engine = running(
            vec![Position::new(0, 0)],
            Direction::Up,
            Position::new(5, 5),
        );
        engine.tick();
        assert_eq!(engine.phase(), GamePhase::Over);
        let frozen = engine.state().clone();

        assert!(!engine.set_direction(Direction::Right));
        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::idle(GamePhase::Over));
        assert_eq!(engine.state(), &frozen);

        engine.reset();
        assert_eq!(engine.phase(), GamePhase::NotStarted);
    }

    #[test]
    fn test_malformed_direction_ignored() {
        let mut engine = engine();
        let before = engine.state().clone();

        assert!(!engine.set_direction_str("sideways"));
        assert_eq!(engine.state(), &before);

        assert!(engine.set_direction_str("ArrowUp"));
        assert_eq!(engine.phase(), GamePhase::Running);
        assert_eq!(engine.pending_direction(), Direction::Up);
    }

    #[test]
    fn test_snapshot() {
        let mut engine = running(
            vec![Position::new(3, 2), Position::new(2, 2)],
            Direction::Right,
            Position::new(7, 4),
        );
        engine.state.score = 3;

        let cells = engine.snapshot();
        let size = engine.config().grid_size;

        assert_eq!(cells.len(), size * size);
        assert_eq!(cells.iter().filter(|c| c.is_snake).count(), 2);
        assert_eq!(cells.iter().filter(|c| c.is_food).count(), 1);

        let food = cells[4 * size + 7];
        assert_eq!((food.x, food.y, food.is_food), (7, 4, true));
        let head = cells[2 * size + 3];
        assert!(head.is_snake && !head.is_food);
        assert_eq!(engine.exit_payload().player_count, 3);
    }

    #[test]
    fn test_place_food_stays_in_bounds() {
        let mut engine = GameEngine::with_seed(GameConfig::new(3), 1).unwrap();
        for _ in 0..200 {
            let food = engine.place_food();
            assert!(engine.state().is_in_bounds(food));
            assert_eq!(engine.food(), food);
        }
    }
}
