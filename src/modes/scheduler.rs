use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::debug;

use crate::game::{GameEngine, GamePhase, TickOutcome};

/// Drives `GameEngine::tick` at the engine's current speed.
///
/// The period is re-read after every tick, so eating food speeds the game up
/// from the next tick on. No ticks are produced outside a running round.
pub struct TickScheduler {
    timer: Interval,
    period: Duration,
}

impl TickScheduler {
    pub fn new(engine: &GameEngine) -> Self {
        let period = engine.speed();
        Self {
            timer: schedule_ticks(period),
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Resolves at the next tick deadline; never resolves unless a round is running.
    pub async fn next_tick(&mut self, engine: &GameEngine) {
        if !engine.phase().is_running() {
            std::future::pending::<()>().await;
        }
        self.timer.tick().await;
    }

    /// Call after input was applied; a round that just started gets its first
    /// tick one full period later.
    pub fn after_input(&mut self, phase_before: GamePhase, engine: &GameEngine) {
        if phase_before != GamePhase::Running && engine.phase().is_running() {
            self.rearm(engine.speed());
        }
    }

    /// Call after every tick with its outcome.
    pub fn after_tick(&mut self, outcome: TickOutcome, engine: &GameEngine) {
        if outcome.is_game_over() {
            debug!(score = engine.score(), "tick timer stopped");
        } else if engine.speed() != self.period {
            debug!(speed_ms = engine.speed_ms(), "rescheduling tick timer");
            self.rearm(engine.speed());
        }
    }

    fn rearm(&mut self, period: Duration) {
        self.period = period;
        self.timer = schedule_ticks(period);
    }
}

/// Timer whose first tick is one `period` from now
fn schedule_ticks(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}
