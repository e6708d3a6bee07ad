#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scripted player replays: the auto-solve and the victory walk back.
//!
//! Both replays move the player with unchecked steps, one per timer tick. The
//! host drives them by calling [`Replay::advance`] whenever the step token
//! fires and rescheduling while [`ReplayStep::Moved`] comes back.

use std::collections::VecDeque;

use labyrinth_core::{Direction, Position};
use labyrinth_world::{Player, Steering};
use tracing::debug;

/// Which script is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayKind {
    /// Pre-recorded solution walked forward from the spawn.
    AutoSolve,
    /// Move history walked backwards after reaching the end.
    Reverse,
}

impl ReplayKind {
    const fn steering(self) -> Steering {
        match self {
            Self::AutoSolve => Steering::AutoSolve,
            Self::Reverse => Steering::Reverse,
        }
    }
}

/// Result of advancing a replay by one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayStep {
    /// The player moved; schedule another step.
    Moved(Direction),
    /// The script is exhausted.
    Finished,
}

/// A running replay script.
#[derive(Clone, Debug, PartialEq)]
pub struct Replay {
    kind: ReplayKind,
    steps: VecDeque<Direction>,
}

impl Replay {
    /// Starts the auto-solve: the player is steered by the script, moved back
    /// to `spawn` and its history is forgotten.
    pub fn begin_auto_solve(tokens: &[String], player: &mut Player, spawn: Position) -> Self {
        player.set_steering(Steering::AutoSolve);
        player.reset_to(spawn);
        debug!(steps = tokens.len(), "auto-solve started");
        Self {
            kind: ReplayKind::AutoSolve,
            steps: tokens.iter().map(|token| Direction::parse(token)).collect(),
        }
    }

    /// Starts walking the player's history backwards.
    pub fn begin_reverse(player: &mut Player) -> Self {
        player.set_steering(Steering::Reverse);
        debug!(steps = player.history().len(), "victory replay started");
        Self {
            kind: ReplayKind::Reverse,
            steps: player.history().iter().rev().copied().collect(),
        }
    }

    /// Which script is running.
    #[must_use]
    pub const fn kind(&self) -> ReplayKind {
        self.kind
    }

    /// Steps not yet taken.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    /// Takes the next step.
    ///
    /// Once the auto-solve runs out the player is handed back to manual
    /// steering; a finished reverse replay keeps the player locked.
    pub fn advance(&mut self, player: &mut Player, cell_size: f32) -> ReplayStep {
        if player.steering() != self.kind.steering() {
            return ReplayStep::Finished;
        }
        match self.steps.pop_front() {
            Some(direction) => {
                player.move_unchecked(direction, cell_size);
                ReplayStep::Moved(direction)
            }
            None => {
                if self.kind == ReplayKind::AutoSolve {
                    player.set_steering(Steering::Manual);
                }
                ReplayStep::Finished
            }
        }
    }
}
