//! Movable actors living on the maze grid.

use std::collections::HashSet;

use labyrinth_core::{Direction, Liveness, Position};

/// Who is currently steering the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Steering {
    /// Keyboard input moves the player.
    #[default]
    Manual,
    /// The scripted auto-solve replay is running.
    AutoSolve,
    /// The victory reverse-replay is running.
    Reverse,
}

/// The player character.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    position: Position,
    gold: u32,
    // Each entry is the direction that undoes the corresponding forward move,
    // so walking the history backwards retraces the path to its origin.
    history: Vec<Direction>,
    steering: Steering,
    liveness: Liveness,
}

impl Player {
    /// Creates a player standing at `position` with no gold and no history.
    #[must_use]
    pub fn spawn_at(position: Position) -> Self {
        Self {
            position,
            gold: 0,
            history: Vec::new(),
            steering: Steering::Manual,
            liveness: Liveness::Active,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Gold collected so far.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// Undo directions of every validated move, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Direction] {
        &self.history
    }

    /// Current steering source.
    #[must_use]
    pub const fn steering(&self) -> Steering {
        self.steering
    }

    /// Whether the scripted auto-solve is running.
    #[must_use]
    pub fn is_auto_mode(&self) -> bool {
        self.steering == Steering::AutoSolve
    }

    /// Whether the victory replay is running.
    #[must_use]
    pub fn is_reverse_mode(&self) -> bool {
        self.steering == Steering::Reverse
    }

    /// Liveness of the player.
    #[must_use]
    pub const fn liveness(&self) -> Liveness {
        self.liveness
    }

    /// Switches the steering source.
    pub fn set_steering(&mut self, steering: Steering) {
        self.steering = steering;
    }

    /// Attempts a keyboard-driven move.
    ///
    /// Returns `false` without mutating anything when the destination is a
    /// wall or a replay currently steers the player.
    pub fn try_move(
        &mut self,
        direction: Direction,
        walls: &HashSet<Position>,
        cell_size: f32,
    ) -> bool {
        if self.steering != Steering::Manual || self.liveness == Liveness::Parked {
            return false;
        }

        let candidate = self.position.step(direction, cell_size);
        if walls.contains(&candidate) {
            return false;
        }

        self.position = candidate;
        self.history.push(direction.opposite());
        true
    }

    /// Moves one cell without consulting walls or recording history.
    pub fn move_unchecked(&mut self, direction: Direction, cell_size: f32) {
        self.position = self.position.step(direction, cell_size);
    }

    /// Teleports the player and forgets its move history.
    pub fn reset_to(&mut self, position: Position) {
        self.position = position;
        self.history.clear();
    }

    /// Adds collected gold.
    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Removes the player from play.
    pub fn park(&mut self) {
        self.liveness = Liveness::Parked;
    }
}

/// Collectible treasure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Treasure {
    position: Position,
    gold: u32,
    liveness: Liveness,
}

impl Treasure {
    /// Creates an active treasure worth `gold`.
    #[must_use]
    pub const fn new(position: Position, gold: u32) -> Self {
        Self {
            position,
            gold,
            liveness: Liveness::Active,
        }
    }

    /// Position of the treasure.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Gold awarded on pickup.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// Removes the treasure from play.
    pub fn park(&mut self) {
        self.liveness = Liveness::Parked;
    }
}

/// Enemy that wanders the maze and chases a nearby player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    position: Position,
    heading: Direction,
    liveness: Liveness,
}

impl Enemy {
    /// Creates an active enemy facing `heading`.
    #[must_use]
    pub const fn new(position: Position, heading: Direction) -> Self {
        Self {
            position,
            heading,
            liveness: Liveness::Active,
        }
    }

    /// Position of the enemy.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Direction of the next attempted step.
    #[must_use]
    pub const fn heading(&self) -> Direction {
        self.heading
    }

    /// Whether the enemy still ticks.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.liveness == Liveness::Active
    }

    /// Turns the enemy.
    pub fn set_heading(&mut self, heading: Direction) {
        self.heading = heading;
    }

    /// Moves the enemy to `position`.
    pub fn relocate(&mut self, position: Position) {
        self.position = position;
    }

    /// Removes the enemy from play; any pending tick becomes a no-op.
    pub fn park(&mut self) {
        self.liveness = Liveness::Parked;
    }
}

/// Shared behaviour of entities stored in [`Slots`].
pub trait Slotted {
    /// Liveness of the entity.
    fn liveness(&self) -> Liveness;

    /// Position of the entity.
    fn slot_position(&self) -> Position;
}

impl Slotted for Treasure {
    fn liveness(&self) -> Liveness {
        self.liveness
    }

    fn slot_position(&self) -> Position {
        self.position
    }
}

impl Slotted for Enemy {
    fn liveness(&self) -> Liveness {
        self.liveness
    }

    fn slot_position(&self) -> Position {
        self.position
    }
}

/// Index-stable collection: entities are parked, never removed, while a level
/// is live.
#[derive(Clone, Debug, PartialEq)]
pub struct Slots<T> {
    entries: Vec<T>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Slotted> Slots<T> {
    /// Stores a new entity and returns its slot index.
    pub fn insert(&mut self, entity: T) -> u32 {
        self.entries.push(entity);
        (self.entries.len() - 1) as u32
    }

    /// Entity in `slot`, if the slot exists.
    #[must_use]
    pub fn get(&self, slot: u32) -> Option<&T> {
        self.entries.get(slot as usize)
    }

    /// Mutable entity in `slot`, if the slot exists.
    pub fn get_mut(&mut self, slot: u32) -> Option<&mut T> {
        self.entries.get_mut(slot as usize)
    }

    /// Every slot with its index, parked entries included.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entity)| (index as u32, entity))
    }

    /// Active entities with their slot index.
    pub fn active(&self) -> impl Iterator<Item = (u32, &T)> {
        self.iter()
            .filter(|(_, entity)| entity.liveness() == Liveness::Active)
    }

    /// Number of slots, parked entries included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no slot was ever filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every slot. Only valid once the renderer released the handles.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
