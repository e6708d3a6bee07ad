#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Maze content and live entity state for Labyrinth.
//!
//! Layout text is parsed into a [`GameLevel`] once; entering the level spawns
//! a [`Player`] and repopulates the treasure and enemy [`Slots`]. Systems
//! mutate the level through its methods while renderers observe it through
//! [`query`].

mod builtin;
mod entities;
mod layout;
mod level;
mod maze_file;

pub use builtin::built_in_levels;
pub use entities::{Enemy, Player, Slots, Slotted, Steering, Treasure};
pub use layout::{half_rounded_even, MazeLayout};
pub use level::{GameLevel, Obstacles};
pub use maze_file::{MazeFile, RawTile};

/// Read-only views that adapters use to draw a level.
pub mod query {
    use labyrinth_core::{ActorHandle, ActorKind, Position};

    use super::{GameLevel, Player, Slotted};

    /// Position of one drawable actor.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ActorSnapshot {
        /// Stable handle of the actor.
        pub handle: ActorHandle,
        /// Where the actor stands.
        pub position: Position,
        /// Whether the actor is still in play.
        pub active: bool,
    }

    /// Wall cells sorted top to bottom, then left to right.
    #[must_use]
    pub fn wall_positions(level: &GameLevel) -> Vec<Position> {
        let mut walls: Vec<Position> = level.walls().iter().copied().collect();
        walls.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));
        walls
    }

    /// Every treasure, enemy and the player, parked entries included.
    #[must_use]
    pub fn actor_snapshots(level: &GameLevel, player: Option<&Player>) -> Vec<ActorSnapshot> {
        let treasures = level.treasures().iter().map(|(slot, treasure)| {
            snapshot(ActorKind::Treasure, slot, treasure.slot_position(), treasure)
        });
        let enemies = level
            .enemies()
            .iter()
            .map(|(slot, enemy)| snapshot(ActorKind::Enemy, slot, enemy.slot_position(), enemy));

        let mut actors: Vec<ActorSnapshot> = treasures.chain(enemies).collect();
        if let Some(player) = player {
            actors.push(ActorSnapshot {
                handle: ActorHandle {
                    kind: ActorKind::Player,
                    slot: 0,
                },
                position: player.position(),
                active: player.liveness() == labyrinth_core::Liveness::Active,
            });
        }
        actors
    }

    fn snapshot<T: Slotted>(
        kind: ActorKind,
        slot: u32,
        position: Position,
        entity: &T,
    ) -> ActorSnapshot {
        ActorSnapshot {
            handle: ActorHandle { kind, slot },
            position,
            active: entity.liveness() == labyrinth_core::Liveness::Active,
        }
    }
}
