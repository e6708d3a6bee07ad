#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy decision system: chase a nearby player, otherwise keep wandering.

use labyrinth_core::{Direction, EnemyId, GameConfig, Position};
use labyrinth_world::GameLevel;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// What the host should do with the enemy's timer after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Schedule the next tick after the configured step delay.
    Reschedule,
    /// The enemy left play; drop its timer.
    Stop,
}

/// Seeded source of enemy decisions.
#[derive(Debug)]
pub struct EnemyAi {
    rng: ChaCha8Rng,
}

impl EnemyAi {
    /// Creates the system with a deterministic seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniformly random heading, used for spawns and blocked steps.
    pub fn random_heading(&mut self) -> Direction {
        Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())]
    }

    /// Runs one decision step for `id`.
    ///
    /// Parked or unknown enemies do nothing and stop. Within the detection
    /// radius the heading greedily points at the player; a step into a wall or
    /// a treasure cell is abandoned in favour of a random heading.
    pub fn tick(
        &mut self,
        level: &mut GameLevel,
        player: Position,
        id: EnemyId,
        config: &GameConfig,
    ) -> TickOutcome {
        let Some((enemy, obstacles)) = level.enemy_with_obstacles(id) else {
            return TickOutcome::Stop;
        };
        if !enemy.is_active() {
            return TickOutcome::Stop;
        }

        if enemy.position().distance_to(player) < config.detection_radius {
            if let Some(heading) = chase_heading(enemy.position(), player) {
                enemy.set_heading(heading);
            }
        }

        let destination = enemy.position().step(enemy.heading(), config.cell_size);
        if obstacles.blocks(destination) {
            let heading = self.random_heading();
            trace!(enemy = id.get(), ?heading, "enemy blocked, turning");
            enemy.set_heading(heading);
        } else {
            enemy.relocate(destination);
        }

        if enemy.is_active() {
            TickOutcome::Reschedule
        } else {
            TickOutcome::Stop
        }
    }
}

/// Greedy heading toward `target`, resolving the horizontal axis first.
///
/// Returns `None` when both positions coincide.
#[must_use]
pub fn chase_heading(from: Position, target: Position) -> Option<Direction> {
    if target.x < from.x {
        Some(Direction::Left)
    } else if target.x > from.x {
        Some(Direction::Right)
    } else if target.y < from.y {
        Some(Direction::Down)
    } else if target.y > from.y {
        Some(Direction::Up)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_axis_wins_over_vertical() {
        let from = Position::new(0.0, 0.0);
        assert_eq!(
            chase_heading(from, Position::new(-24.0, 48.0)),
            Some(Direction::Left)
        );
        assert_eq!(
            chase_heading(from, Position::new(0.0, -24.0)),
            Some(Direction::Down)
        );
        assert_eq!(chase_heading(from, from), None);
    }

    #[test]
    fn same_seed_gives_same_headings() {
        let mut first = EnemyAi::new(7);
        let mut second = EnemyAi::new(7);
        let a: Vec<Direction> = (0..16).map(|_| first.random_heading()).collect();
        let b: Vec<Direction> = (0..16).map(|_| second.random_heading()).collect();
        assert_eq!(a, b);
    }
}
