//! Static maze content plus the live entities of one play-through.

use std::collections::HashSet;

use labyrinth_core::{
    collides, ContentError, Direction, EnemyId, GameConfig, LayoutSymbol, Position, TreasureId,
};
use tracing::debug;

use crate::{Enemy, MazeLayout, Player, Slots, Treasure};

/// Occupancy sets an enemy consults before stepping.
#[derive(Clone, Copy, Debug)]
pub struct Obstacles<'a> {
    /// Wall cells, including the start marker.
    pub walls: &'a HashSet<Position>,
    /// Cells that held a treasure when the level was parsed.
    pub treasures: &'a HashSet<Position>,
}

impl Obstacles<'_> {
    /// Whether an enemy may not enter `position`.
    #[must_use]
    pub fn blocks(&self, position: Position) -> bool {
        self.walls.contains(&position) || self.treasures.contains(&position)
    }
}

/// A playable level.
///
/// The static layout is parsed once on construction. Treasures and enemies
/// are repopulated from their spawn cells on every [`GameLevel::enter`] and
/// parked by [`GameLevel::exit`].
#[derive(Clone, Debug)]
pub struct GameLevel {
    name: String,
    layout: MazeLayout,
    cell_size: f32,
    treasure_value: u32,
    walls: HashSet<Position>,
    treasure_cells: HashSet<Position>,
    treasure_spawns: Vec<Position>,
    enemy_spawns: Vec<Position>,
    start: Option<Position>,
    end: Option<Position>,
    player_spawn: Option<Position>,
    auto_solution: Vec<String>,
    treasures: Slots<Treasure>,
    enemies: Slots<Enemy>,
}

impl GameLevel {
    /// Parses `layout` into a level.
    pub fn new(
        name: impl Into<String>,
        layout: MazeLayout,
        auto_solution: Vec<String>,
        config: &GameConfig,
    ) -> Result<Self, ContentError> {
        if layout.row_count() == 0 {
            return Err(ContentError::EmptyLayout);
        }

        let cell_size = config.cell_size;
        let mut walls = HashSet::new();
        let mut treasure_cells = HashSet::new();
        let mut treasure_spawns = Vec::new();
        let mut enemy_spawns = Vec::new();
        let mut start = None;
        let mut end = None;
        let mut player_spawn = None;

        for (cell, symbol) in layout.symbols() {
            let position = layout.screen_position(cell, cell_size);
            match symbol {
                LayoutSymbol::Wall => {
                    let _ = walls.insert(position);
                }
                LayoutSymbol::PlayerSpawn => player_spawn = Some(position),
                LayoutSymbol::Treasure => {
                    treasure_spawns.push(position);
                    let _ = treasure_cells.insert(position);
                }
                LayoutSymbol::Enemy => enemy_spawns.push(position),
                LayoutSymbol::Start => {
                    start = Some(position);
                    if player_spawn.is_none() {
                        player_spawn = Some(position);
                    }
                    // The start tile cannot be walked back onto.
                    let _ = walls.insert(position);
                }
                LayoutSymbol::End => end = Some(position),
                LayoutSymbol::Floor => {}
            }
        }

        Ok(Self {
            name: name.into(),
            layout,
            cell_size,
            treasure_value: config.treasure_value,
            walls,
            treasure_cells,
            treasure_spawns,
            enemy_spawns,
            start,
            end,
            player_spawn,
            auto_solution,
            treasures: Slots::default(),
            enemies: Slots::default(),
        })
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layout the level was parsed from.
    #[must_use]
    pub const fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    /// Edge length of one cell.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Wall occupancy set.
    #[must_use]
    pub const fn walls(&self) -> &HashSet<Position> {
        &self.walls
    }

    /// Treasure occupancy set as parsed; pickups do not shrink it.
    #[must_use]
    pub const fn treasure_cells(&self) -> &HashSet<Position> {
        &self.treasure_cells
    }

    /// Occupancy sets consulted by enemies.
    #[must_use]
    pub fn obstacles(&self) -> Obstacles<'_> {
        Obstacles {
            walls: &self.walls,
            treasures: &self.treasure_cells,
        }
    }

    /// Start marker position.
    #[must_use]
    pub const fn start(&self) -> Option<Position> {
        self.start
    }

    /// End marker position.
    #[must_use]
    pub const fn end(&self) -> Option<Position> {
        self.end
    }

    /// Where the player appears.
    #[must_use]
    pub const fn player_spawn(&self) -> Option<Position> {
        self.player_spawn
    }

    /// Pre-recorded direction tokens solving the level.
    #[must_use]
    pub fn auto_solution(&self) -> &[String] {
        &self.auto_solution
    }

    /// Whether the level offers an auto-solve.
    #[must_use]
    pub fn has_auto_solution(&self) -> bool {
        !self.auto_solution.is_empty()
    }

    /// Treasure slots of the current play-through.
    #[must_use]
    pub const fn treasures(&self) -> &Slots<Treasure> {
        &self.treasures
    }

    /// Enemy slots of the current play-through.
    #[must_use]
    pub const fn enemies(&self) -> &Slots<Enemy> {
        &self.enemies
    }

    /// Validates the level and repopulates its live entities.
    ///
    /// `initial_heading` picks the heading of each spawned enemy. Returns the
    /// freshly spawned player.
    pub fn enter<H>(&mut self, mut initial_heading: H) -> Result<Player, ContentError>
    where
        H: FnMut() -> Direction,
    {
        let spawn = self.player_spawn.ok_or(ContentError::MissingSpawn)?;
        if self.end.is_none() {
            return Err(ContentError::MissingEnd);
        }

        self.treasures.clear();
        for position in &self.treasure_spawns {
            let _ = self
                .treasures
                .insert(Treasure::new(*position, self.treasure_value));
        }

        self.enemies.clear();
        for position in &self.enemy_spawns {
            let _ = self.enemies.insert(Enemy::new(*position, initial_heading()));
        }

        debug!(
            level = %self.name,
            treasures = self.treasures.len(),
            enemies = self.enemies.len(),
            "entered level"
        );
        Ok(Player::spawn_at(spawn))
    }

    /// Parks every live entity, which stops all further enemy ticks.
    pub fn exit(&mut self) {
        for slot in 0..self.enemies.len() as u32 {
            if let Some(enemy) = self.enemies.get_mut(slot) {
                enemy.park();
            }
        }
        for slot in 0..self.treasures.len() as u32 {
            if let Some(treasure) = self.treasures.get_mut(slot) {
                treasure.park();
            }
        }
        debug!(level = %self.name, "exited level");
    }

    /// Parks every active treasure touching `position` and returns the pickups.
    pub fn collect_treasures(
        &mut self,
        position: Position,
        threshold: f32,
    ) -> Vec<(TreasureId, u32)> {
        let touched: Vec<u32> = self
            .treasures
            .active()
            .filter(|(_, treasure)| collides(position, treasure.position(), threshold))
            .map(|(slot, _)| slot)
            .collect();

        let mut pickups = Vec::with_capacity(touched.len());
        for slot in touched {
            if let Some(treasure) = self.treasures.get_mut(slot) {
                treasure.park();
                pickups.push((TreasureId::new(slot), treasure.gold()));
            }
        }
        pickups
    }

    /// First active enemy touching `position`.
    #[must_use]
    pub fn enemy_touching(&self, position: Position, threshold: f32) -> Option<EnemyId> {
        self.enemies
            .active()
            .find(|(_, enemy)| collides(position, enemy.position(), threshold))
            .map(|(slot, _)| EnemyId::new(slot))
    }

    /// Whether `position` touches the end marker.
    #[must_use]
    pub fn reached_end(&self, position: Position, threshold: f32) -> bool {
        self.end.is_some_and(|end| collides(position, end, threshold))
    }

    /// Enemy in `id` together with the obstacles it must respect.
    pub fn enemy_with_obstacles(&mut self, id: EnemyId) -> Option<(&mut Enemy, Obstacles<'_>)> {
        let enemy = self.enemies.get_mut(id.get())?;
        let obstacles = Obstacles {
            walls: &self.walls,
            treasures: &self.treasure_cells,
        };
        Some((enemy, obstacles))
    }

    /// Ids of every active enemy.
    #[must_use]
    pub fn active_enemy_ids(&self) -> Vec<EnemyId> {
        self.enemies
            .active()
            .map(|(slot, _)| EnemyId::new(slot))
            .collect()
    }
}
