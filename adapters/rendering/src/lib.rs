#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Labyrinth adapters.
//!
//! A [`Scene`] is captured from the session after each batch of events and
//! replayed onto any [`Renderer`]. Scenes hold plain data, so adapters can
//! diff, log or snapshot them without touching the simulation.

use anyhow::Result as AnyResult;
use glam::Vec2;
use labyrinth_core::{ActorHandle, Mode, PaletteSymbol, Position, Rect};
use labyrinth_system_editor::palette_anchor;
use labyrinth_system_session::Session;
use labyrinth_world::query;
use std::{error::Error, fmt};

/// Where transient notices are written.
pub const NOTICE_ANCHOR: Vec2 = Vec2::new(0.0, -450.0);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors used by the default look.
pub mod palette {
    use super::Color;

    /// Title text.
    pub const TITLE: Color = Color::from_rgb_u8(0xF7, 0x7F, 0x00);
    /// Regular text.
    pub const TEXT: Color = Color::from_rgb_u8(0xFF, 0xFF, 0xFF);
    /// Hints and instructions.
    pub const HINT: Color = Color::from_rgb_u8(0x80, 0x80, 0x80);
    /// Victory headline.
    pub const GOLD: Color = Color::from_rgb_u8(0xFF, 0xD7, 0x00);
    /// Transient warnings.
    pub const WARNING: Color = Color::from_rgb_u8(0xFF, 0xA5, 0x00);
    /// Button fill.
    pub const BUTTON: Color = Color::from_rgb_u8(0x00, 0x30, 0x49);
}

/// Static grid content other than walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Impassable wall.
    Wall,
    /// Start marker.
    Start,
    /// End marker.
    End,
    /// Treasure stamped in the editor.
    Treasure,
    /// Enemy stamped in the editor.
    Enemy,
}

impl From<PaletteSymbol> for Tile {
    fn from(symbol: PaletteSymbol) -> Self {
        match symbol {
            PaletteSymbol::Wall => Self::Wall,
            PaletteSymbol::Treasure => Self::Treasure,
            PaletteSymbol::Enemy => Self::Enemy,
            PaletteSymbol::Start => Self::Start,
            PaletteSymbol::End => Self::End,
        }
    }
}

/// Text appearance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Point size.
    pub size: u16,
    /// Fill color.
    pub color: Color,
    /// Whether the text is centred on its anchor.
    pub centered: bool,
}

impl TextStyle {
    const fn centered(size: u16, color: Color) -> Self {
        Self {
            size,
            color,
            centered: true,
        }
    }
}

/// A line of text placed in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneText {
    /// Anchor point.
    pub position: Vec2,
    /// Content.
    pub text: String,
    /// Appearance.
    pub style: TextStyle,
}

/// A button as it should be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneButton {
    /// Clickable area.
    pub rect: Rect,
    /// Caption.
    pub label: String,
    /// Whether the button currently reacts to clicks.
    pub enabled: bool,
}

/// A drawable actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneActor {
    /// Stable handle.
    pub handle: ActorHandle,
    /// World position.
    pub position: Vec2,
    /// Parked actors are cleared instead of drawn.
    pub visible: bool,
}

/// Everything a renderer needs to present one frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Scene {
    /// Static tiles: walls, markers and editor stamps.
    pub tiles: Vec<(Vec2, Tile)>,
    /// Player, treasures and enemies.
    pub actors: Vec<SceneActor>,
    /// Buttons of the active screen.
    pub buttons: Vec<SceneButton>,
    /// Text overlays.
    pub texts: Vec<SceneText>,
}

/// Converts a simulation position into renderer space.
#[must_use]
pub fn to_vec2(position: Position) -> Vec2 {
    Vec2::new(position.x, position.y)
}

impl Scene {
    /// Captures the visible state of `session`.
    #[must_use]
    pub fn capture(session: &Session) -> Self {
        let mut scene = Self::default();
        match session.mode() {
            Mode::Menu => {
                scene.title(Vec2::new(0.0, 250.0), labyrinth_core::GAME_TITLE, 32);
                scene.text(
                    Vec2::new(0.0, 200.0),
                    "Choose Your Adventure",
                    TextStyle::centered(18, palette::TEXT),
                );
                scene.text(
                    Vec2::new(0.0, -280.0),
                    "Use arrow keys to move | Collect treasures | Avoid enemies",
                    TextStyle::centered(12, palette::HINT),
                );
            }
            Mode::Select => scene.title(Vec2::new(0.0, 300.0), "SELECT LEVEL", 28),
            Mode::Create => scene.capture_editor(session),
            Mode::PlayLevel(_) => scene.capture_level(session),
            Mode::Victory => {
                scene.text(
                    Vec2::new(0.0, 100.0),
                    "CONGRATULATIONS!",
                    TextStyle::centered(32, palette::GOLD),
                );
                scene.text(
                    Vec2::new(0.0, 30.0),
                    "You completed all levels!",
                    TextStyle::centered(24, palette::TEXT),
                );
                scene.text(
                    Vec2::new(0.0, -30.0),
                    format!("Final Score: {}", session.final_score()),
                    TextStyle::centered(20, palette::TITLE),
                );
            }
        }

        let armed = session.mode() != Mode::Victory || session.victory_armed();
        scene.buttons = session
            .buttons()
            .iter()
            .map(|button| SceneButton {
                rect: button.rect,
                label: button.label.clone(),
                enabled: armed,
            })
            .collect();

        if let Some(notice) = session.notice() {
            scene.text(NOTICE_ANCHOR, notice, TextStyle::centered(12, palette::WARNING));
        }
        scene
    }

    fn capture_level(&mut self, session: &Session) {
        let Some(level) = session.active_level() else {
            return;
        };
        let start = level.start();
        self.tiles.extend(
            query::wall_positions(level)
                .into_iter()
                .filter(|wall| Some(*wall) != start)
                .map(|wall| (to_vec2(wall), Tile::Wall)),
        );
        if let Some(start) = start {
            self.tiles.push((to_vec2(start), Tile::Start));
        }
        if let Some(end) = level.end() {
            self.tiles.push((to_vec2(end), Tile::End));
        }
        self.actors = query::actor_snapshots(level, session.player())
            .into_iter()
            .map(|actor| SceneActor {
                handle: actor.handle,
                position: to_vec2(actor.position),
                visible: actor.active,
            })
            .collect();

        self.text(
            Vec2::new(0.0, 300.0),
            session.scoreboard().to_string(),
            TextStyle::centered(24, palette::TEXT),
        );
        if let Some(banner) = session.banner() {
            self.text(
                Vec2::new(-30.0, 0.0),
                banner,
                TextStyle {
                    size: 18,
                    color: palette::TEXT,
                    centered: false,
                },
            );
        }
    }

    fn capture_editor(&mut self, session: &Session) {
        self.title(Vec2::new(0.0, 400.0), "LEVEL CREATOR", 24);
        self.text(
            Vec2::new(0.0, 360.0),
            "Click palette items, then click grid to place",
            TextStyle::centered(14, palette::TEXT),
        );
        for symbol in PaletteSymbol::ALL {
            self.tiles.push((to_vec2(palette_anchor(symbol)), symbol.into()));
        }
        if let Some(editor) = session.editor() {
            self.tiles.extend(
                editor
                    .placements()
                    .iter()
                    .map(|placement| (to_vec2(placement.position), placement.symbol.into())),
            );
        }
    }

    fn title(&mut self, position: Vec2, text: &str, size: u16) {
        self.text(position, text, TextStyle::centered(size, palette::TITLE));
    }

    fn text(&mut self, position: Vec2, text: impl Into<String>, style: TextStyle) {
        self.texts.push(SceneText {
            position,
            text: text.into(),
            style,
        });
    }

    /// Replays the scene onto `renderer` and presents the frame.
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) -> AnyResult<()> {
        for (position, tile) in &self.tiles {
            match tile {
                Tile::Wall => renderer.draw_wall(*position),
                other => renderer.draw_tile(*position, *other),
            }
        }
        for actor in &self.actors {
            if actor.visible {
                renderer.draw_actor(actor.handle, actor.position);
            } else {
                renderer.clear_actor(actor.handle);
            }
        }
        for button in &self.buttons {
            renderer.draw_button(button);
        }
        for text in &self.texts {
            renderer.write_text(text.position, &text.text, text.style);
        }
        renderer.present()
    }
}

/// Drawing surface provided by the host.
pub trait Renderer {
    /// Stamps a wall tile.
    fn draw_wall(&mut self, position: Vec2) {
        self.draw_tile(position, Tile::Wall);
    }

    /// Stamps a static tile.
    fn draw_tile(&mut self, position: Vec2, tile: Tile);

    /// Draws or moves the actor behind `handle`.
    fn draw_actor(&mut self, handle: ActorHandle, position: Vec2);

    /// Removes the actor behind `handle` from view.
    fn clear_actor(&mut self, handle: ActorHandle);

    /// Draws a button.
    fn draw_button(&mut self, button: &SceneButton) {
        let style = TextStyle {
            size: 14,
            color: if button.enabled {
                palette::TEXT
            } else {
                palette::BUTTON.lighten(0.5)
            },
            centered: true,
        };
        self.write_text(to_vec2(button.rect.label_anchor()), &button.label, style);
    }

    /// Writes text anchored at `position`.
    fn write_text(&mut self, position: Vec2, text: &str, style: TextStyle);

    /// Presents everything drawn since the previous call.
    fn present(&mut self) -> AnyResult<()>;
}

/// Maps world space onto a character grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    columns: usize,
    rows: usize,
    cell_size: f32,
    center: Vec2,
}

impl Viewport {
    /// Creates a viewport `columns` by `rows` cells wide, centred on the origin.
    pub fn new(columns: usize, rows: usize, cell_size: f32) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyViewport { columns, rows });
        }
        if cell_size <= 0.0 || !cell_size.is_finite() {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }
        Ok(Self {
            columns,
            rows,
            cell_size,
            center: Vec2::ZERO,
        })
    }

    /// Number of character columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of character rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Character cell showing `position`, if it lies inside the viewport.
    #[must_use]
    pub fn project(&self, position: Vec2) -> Option<(usize, usize)> {
        let relative = ((position - self.center) / self.cell_size).round();
        let column = relative.x + (self.columns / 2) as f32;
        let row = (self.rows / 2) as f32 - relative.y;
        if column < 0.0 || row < 0.0 {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        (column < self.columns && row < self.rows).then_some((column, row))
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// A viewport needs at least one row and one column.
    EmptyViewport {
        /// Requested columns.
        columns: usize,
        /// Requested rows.
        rows: usize,
    },
    /// Cell size must be a positive finite number.
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyViewport { columns, rows } => {
                write!(f, "viewport must not be empty (received {columns}x{rows})")
            }
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell_size must be positive (received {cell_size})")
            }
        }
    }
}

impl Error for RenderingError {}
