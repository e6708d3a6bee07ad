#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Labyrinth engine.
//!
//! This crate defines the vocabulary that connects adapters, the level world,
//! and pure systems. Adapters translate raw host events into [`Input`] values,
//! the session routes them to the active component, and reports observable
//! outcomes as [`Event`] values. Delays are expressed as [`TimerToken`] values
//! handed to the host-provided [`Timer`] collaborator, which hands them back to
//! the session once they are due.

use std::{
    fmt,
    hash::{Hash, Hasher},
    path::PathBuf,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical title emitted when the experience boots.
pub const GAME_TITLE: &str = "LABYRINTH GAME";

/// Screen-space coordinate pair.
///
/// Equality and hashing compare exact bit patterns so positions can key the
/// wall and treasure occupancy sets. Negative zero is folded into positive
/// zero first, so `-0.0` and `0.0` address the same cell.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate; grows to the right.
    pub x: f32,
    /// Vertical coordinate; grows upward.
    pub y: f32,
}

impl Position {
    /// Creates a new position from raw coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the position displaced one cell in the provided direction.
    #[must_use]
    pub fn step(self, direction: Direction, cell_size: f32) -> Self {
        let (dx, dy) = direction.displacement(cell_size);
        Self::new(self.x + dx, self.y + dy)
    }

    fn key(self) -> (u32, u32) {
        (fold_zero(self.x).to_bits(), fold_zero(self.y).to_bits())
    }
}

fn fold_zero(value: f32) -> f32 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Reports whether two positions are close enough to count as touching.
///
/// The comparison is strict, so positions exactly `threshold` apart do not
/// collide.
#[must_use]
pub fn collides(a: Position, b: Position, threshold: f32) -> bool {
    a.distance_to(b) < threshold
}

/// Cardinal movement directions available to every actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing `y`.
    Up,
    /// Movement toward decreasing `y`.
    Down,
    /// Movement toward decreasing `x`.
    Left,
    /// Movement toward increasing `x`.
    Right,
}

impl Direction {
    /// Every direction, in declaration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Signed displacement of exactly one cell.
    #[must_use]
    pub fn displacement(self, cell_size: f32) -> (f32, f32) {
        match self {
            Self::Up => (0.0, cell_size),
            Self::Down => (0.0, -cell_size),
            Self::Left => (-cell_size, 0.0),
            Self::Right => (cell_size, 0.0),
        }
    }

    /// Direction that undoes a move in `self`.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Parses a direction token case-insensitively, falling back to `Up`.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Up,
        }
    }

    /// Lowercase token accepted by [`Direction::parse`].
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Location of a single grid cell expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Axis-aligned clickable rectangle anchored at its lower-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its lower-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Position) -> bool {
        self.x <= point.x
            && point.x <= self.x + self.width
            && self.y <= point.y
            && point.y <= self.y + self.height
    }

    /// Point at which a centred label should be written.
    #[must_use]
    pub fn label_anchor(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 3.0)
    }
}

/// Symbols of the in-game layout vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutSymbol {
    /// `.` or any unrecognised character.
    Floor,
    /// `X`.
    Wall,
    /// `T`.
    Treasure,
    /// `E`.
    Enemy,
    /// `S`: start marker, doubling as the spawn when no `P` exists.
    Start,
    /// `F`.
    End,
    /// `P`: explicit player spawn.
    PlayerSpawn,
}

impl LayoutSymbol {
    /// Classifies a layout character; unknown characters are floor.
    #[must_use]
    pub const fn from_char(symbol: char) -> Self {
        match symbol {
            'X' => Self::Wall,
            'T' => Self::Treasure,
            'E' => Self::Enemy,
            'S' => Self::Start,
            'F' => Self::End,
            'P' => Self::PlayerSpawn,
            _ => Self::Floor,
        }
    }

    /// Canonical character written for the symbol.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Floor => '.',
            Self::Wall => 'X',
            Self::Treasure => 'T',
            Self::Enemy => 'E',
            Self::Start => 'S',
            Self::End => 'F',
            Self::PlayerSpawn => 'P',
        }
    }
}

/// Items offered by the level editor palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaletteSymbol {
    /// Wall tile.
    Wall,
    /// Treasure pickup.
    Treasure,
    /// Enemy spawn.
    Enemy,
    /// Start marker and player spawn.
    Start,
    /// End marker.
    End,
}

impl PaletteSymbol {
    /// Every palette symbol in palette order, top to bottom.
    pub const ALL: [PaletteSymbol; 5] = [
        PaletteSymbol::Wall,
        PaletteSymbol::Treasure,
        PaletteSymbol::Enemy,
        PaletteSymbol::Start,
        PaletteSymbol::End,
    ];

    /// In-game symbol written for the palette entry on export.
    #[must_use]
    pub const fn layout_symbol(self) -> LayoutSymbol {
        match self {
            Self::Wall => LayoutSymbol::Wall,
            Self::Treasure => LayoutSymbol::Treasure,
            Self::Enemy => LayoutSymbol::Enemy,
            Self::Start => LayoutSymbol::Start,
            Self::End => LayoutSymbol::End,
        }
    }

    /// Parses the lowercase name used by text front-ends.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "wall" => Some(Self::Wall),
            "treasure" => Some(Self::Treasure),
            "enemy" => Some(Self::Enemy),
            "start" => Some(Self::Start),
            "end" => Some(Self::End),
            _ => None,
        }
    }
}

/// Whether an entity still takes part in the simulation.
///
/// Parked entities keep their slot so that renderer handles stay valid for
/// one more frame; they never collide and never tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Liveness {
    /// Participates in collisions and ticks.
    #[default]
    Active,
    /// Removed from play but still addressable.
    Parked,
}

/// Unique identifier assigned to an enemy slot within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided slot index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the slot index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a treasure slot within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreasureId(u32);

impl TreasureId {
    /// Creates a new treasure identifier with the provided slot index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the slot index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of movable actors the renderer draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorKind {
    /// The player character.
    Player,
    /// A collectible treasure.
    Treasure,
    /// A pursuing enemy.
    Enemy,
}

/// Stable handle a renderer uses to track a drawn actor across frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorHandle {
    /// Kind of the actor.
    pub kind: ActorKind,
    /// Slot index within the owning collection; always zero for the player.
    pub slot: u32,
}

/// Reference to a playable level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelRef {
    /// Built-in level identified by its zero-based index.
    BuiltIn(usize),
    /// Level authored in the editor.
    Custom,
}

/// Top-level modes of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Main menu.
    Menu,
    /// A level is being played.
    PlayLevel(LevelRef),
    /// The level editor is resident.
    Create,
    /// Level selection list.
    Select,
    /// All built-in levels completed.
    Victory,
}

/// Host input routed to the active component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    /// Directional key press.
    Key(Direction),
    /// Pointer click at a screen coordinate.
    Click(Position),
    /// The host window is closing.
    Close,
}

/// Reasons an editor placement may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementRejection {
    /// The clicked cell lies outside the editor grid. Reported silently.
    OutOfBounds,
    /// Another item already occupies the canonical cell.
    Stacked,
    /// A start marker is already placed.
    DuplicateStart,
    /// An end marker is already placed.
    DuplicateEnd,
}

impl PlacementRejection {
    /// Transient message shown to the user, if the rejection is reported.
    #[must_use]
    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::OutOfBounds => None,
            Self::Stacked => Some("Cannot stack items on same tile!"),
            Self::DuplicateStart => Some("Only ONE start allowed!"),
            Self::DuplicateEnd => Some("Only ONE end allowed!"),
        }
    }
}

/// Observable outcomes reported by the session after processing input or timers.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The active mode changed.
    ModeChanged {
        /// Mode that became active.
        mode: Mode,
    },
    /// The visible state changed and the host should present a new frame.
    RedrawRequested,
    /// A transient message became visible.
    NoticeShown {
        /// Text of the message.
        text: String,
    },
    /// The player picked up a treasure.
    TreasureCollected {
        /// Slot of the collected treasure.
        treasure: TreasureId,
        /// Gold held by the player after the pickup.
        gold: u32,
    },
    /// An enemy touched the player.
    PlayerCaught {
        /// Slot of the enemy that caught the player.
        enemy: EnemyId,
    },
    /// The player reached the end of a level and the victory replay finished.
    LevelCompleted {
        /// Level that was completed.
        level: LevelRef,
    },
    /// An editor placement was rejected.
    PlacementRejected {
        /// Reason for the rejection.
        reason: PlacementRejection,
    },
    /// The user asked to end the process.
    ShutdownRequested,
}

/// Pauses the session waits out between discrete simulation phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PauseKind {
    /// Display the finished auto-solve before resetting the player.
    AutoSolveFinished,
    /// Display the victory message before tearing the level down.
    VictoryMessage,
    /// Display the caught player before returning to the menu.
    Defeat,
    /// Victory screen ignores clicks until this elapses.
    VictoryScreen,
}

/// Deferred work the session asks the host timer to hand back later.
///
/// Every token carries the epoch of the level or screen that scheduled it, so
/// tokens that outlive their owner are recognised and dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerToken {
    /// One enemy decision step.
    EnemyTick {
        /// Epoch of the level that owns the enemy.
        epoch: u64,
        /// Enemy slot to tick.
        enemy: EnemyId,
    },
    /// One step of the running replay script.
    ReplayStep {
        /// Epoch of the level running the replay.
        epoch: u64,
    },
    /// End of a timed pause.
    Pause {
        /// Epoch of the level or screen that started the pause.
        epoch: u64,
        /// Which pause elapsed.
        kind: PauseKind,
    },
    /// A transient notice should disappear.
    NoticeExpired {
        /// Serial number of the notice.
        serial: u64,
    },
}

/// Timer collaborator provided by the host.
pub trait Timer {
    /// Monotonic time elapsed since the host started.
    fn now(&self) -> Duration;

    /// Requests that `token` be handed back to the session after `delay`.
    fn after(&mut self, delay: Duration, token: TimerToken);
}

/// Tunable constants of the simulation.
///
/// Durations are expressed in milliseconds so the structure reads naturally
/// from TOML; the accessor methods convert them to [`Duration`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Edge length of one maze cell in screen units.
    pub cell_size: f32,
    /// Distance under which two actors collide.
    pub collision_distance: f32,
    /// Distance under which an enemy switches to chasing the player.
    pub detection_radius: f32,
    /// Gold awarded for a treasure.
    pub treasure_value: u32,
    /// Editor grid columns.
    pub editor_columns: u32,
    /// Editor grid rows.
    pub editor_rows: u32,
    /// Delay before an enemy's first tick after level entry.
    pub enemy_first_step_ms: u64,
    /// Delay between enemy ticks.
    pub enemy_step_ms: u64,
    /// Delay between auto-solve steps.
    pub auto_step_ms: u64,
    /// Pause after an auto-solve finishes.
    pub auto_finish_pause_ms: u64,
    /// Delay between victory replay steps.
    pub victory_step_ms: u64,
    /// Pause showing the victory message.
    pub victory_message_pause_ms: u64,
    /// Pause after the player is caught.
    pub death_pause_ms: u64,
    /// Lifetime of editor rejection messages.
    pub editor_notice_ms: u64,
    /// Lifetime of content error messages.
    pub content_notice_ms: u64,
    /// Time the victory screen ignores clicks.
    pub victory_click_delay_ms: u64,
    /// Seed for enemy heading choices.
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 24.0,
            collision_distance: 5.0,
            detection_radius: 100.0,
            treasure_value: 100,
            editor_columns: 25,
            editor_rows: 20,
            enemy_first_step_ms: 250,
            enemy_step_ms: 200,
            auto_step_ms: 300,
            auto_finish_pause_ms: 2_000,
            victory_step_ms: 200,
            victory_message_pause_ms: 2_000,
            death_pause_ms: 1_000,
            editor_notice_ms: 500,
            content_notice_ms: 2_000,
            victory_click_delay_ms: 3_000,
            rng_seed: 0x6c61_6279_7269_6e74,
        }
    }
}

impl GameConfig {
    /// Delay before an enemy's first tick.
    #[must_use]
    pub const fn enemy_first_step(&self) -> Duration {
        Duration::from_millis(self.enemy_first_step_ms)
    }

    /// Delay between enemy ticks.
    #[must_use]
    pub const fn enemy_step(&self) -> Duration {
        Duration::from_millis(self.enemy_step_ms)
    }

    /// Delay between auto-solve steps.
    #[must_use]
    pub const fn auto_step(&self) -> Duration {
        Duration::from_millis(self.auto_step_ms)
    }

    /// Pause after an auto-solve finishes.
    #[must_use]
    pub const fn auto_finish_pause(&self) -> Duration {
        Duration::from_millis(self.auto_finish_pause_ms)
    }

    /// Delay between victory replay steps.
    #[must_use]
    pub const fn victory_step(&self) -> Duration {
        Duration::from_millis(self.victory_step_ms)
    }

    /// Pause showing the victory message.
    #[must_use]
    pub const fn victory_message_pause(&self) -> Duration {
        Duration::from_millis(self.victory_message_pause_ms)
    }

    /// Pause after the player is caught.
    #[must_use]
    pub const fn death_pause(&self) -> Duration {
        Duration::from_millis(self.death_pause_ms)
    }

    /// Lifetime of editor rejection messages.
    #[must_use]
    pub const fn editor_notice(&self) -> Duration {
        Duration::from_millis(self.editor_notice_ms)
    }

    /// Lifetime of content error messages.
    #[must_use]
    pub const fn content_notice(&self) -> Duration {
        Duration::from_millis(self.content_notice_ms)
    }

    /// Time the victory screen ignores clicks.
    #[must_use]
    pub const fn victory_click_delay(&self) -> Duration {
        Duration::from_millis(self.victory_click_delay_ms)
    }
}

/// Maze content that cannot be played.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The layout has neither a `P` nor an `S` cell.
    #[error("maze has no player spawn")]
    MissingSpawn,
    /// The layout has no `F` cell.
    #[error("maze has no end marker")]
    MissingEnd,
    /// An authored layout lacks its start or its end marker.
    #[error("ERROR: Level needs START (green) and END (red)!")]
    MissingStartOrEnd,
    /// The layout contains no rows.
    #[error("maze layout is empty")]
    EmptyLayout,
}

/// Failures while reading a maze source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The maze source does not exist.
    #[error("maze source {path} was not found")]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },
    /// The maze source exists but could not be read.
    #[error("failed to read maze source {path}")]
    Io {
        /// Requested path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Classifies an I/O failure for the provided path.
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}
