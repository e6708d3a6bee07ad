#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level editor system: palette selection, placement rules and layout export.

use labyrinth_core::{
    GameConfig, LayoutSymbol, PaletteSymbol, PlacementRejection, Position, Rect,
};
use labyrinth_world::MazeLayout;
use tracing::{debug, warn};

/// Button that hands the authored layout to the game.
pub const PLAY_MAP_BUTTON: Rect = Rect::new(-600.0, -200.0, 120.0, 50.0);
/// Button that wipes every placement.
pub const CLEAR_ALL_BUTTON: Rect = Rect::new(-600.0, -300.0, 120.0, 50.0);

const PALETTE_X: f32 = -600.0;
const PALETTE_HALF_EXTENT: f32 = 12.0;

/// Vertical centre of the palette swatch for `symbol`.
#[must_use]
pub const fn palette_center_y(symbol: PaletteSymbol) -> f32 {
    match symbol {
        PaletteSymbol::Wall => 300.0,
        PaletteSymbol::Treasure => 200.0,
        PaletteSymbol::Enemy => 100.0,
        PaletteSymbol::Start => 0.0,
        PaletteSymbol::End => -100.0,
    }
}

/// Screen position of the palette swatch for `symbol`.
#[must_use]
pub const fn palette_anchor(symbol: PaletteSymbol) -> Position {
    Position::new(PALETTE_X, palette_center_y(symbol))
}

fn within_palette_column(point: Position) -> bool {
    PALETTE_X - PALETTE_HALF_EXTENT < point.x && point.x < PALETTE_X + PALETTE_HALF_EXTENT
}

fn palette_symbol_at(point: Position) -> Option<PaletteSymbol> {
    PaletteSymbol::ALL.into_iter().find(|symbol| {
        let centre = palette_center_y(*symbol);
        centre - PALETTE_HALF_EXTENT < point.y && point.y < centre + PALETTE_HALF_EXTENT
    })
}

/// One item stamped onto the editor grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Item placed.
    pub symbol: PaletteSymbol,
    /// Canonical pixel position of the cell.
    pub position: Position,
}

/// What a click in the editor did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditorOutcome {
    /// PLAY MAP was pressed.
    PlayRequested,
    /// CLEAR ALL was pressed.
    Cleared,
    /// A palette swatch was picked.
    Selected(PaletteSymbol),
    /// An item was stamped onto the grid.
    Placed(Placement),
    /// A placement was refused; state is unchanged.
    Rejected(PlacementRejection),
    /// The click hit nothing actionable.
    Ignored,
}

/// Editor state: the current selection and the ordered placements.
#[derive(Clone, Debug)]
pub struct LevelEditor {
    columns: i32,
    rows: i32,
    cell_size: f32,
    selected: Option<PaletteSymbol>,
    placements: Vec<Placement>,
}

impl LevelEditor {
    /// Creates an empty editor sized from `config`.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let defaults = GameConfig::default();
        Self {
            columns: grid_extent(config.editor_columns, defaults.editor_columns),
            rows: grid_extent(config.editor_rows, defaults.editor_rows),
            cell_size: config.cell_size,
            selected: None,
            placements: Vec::new(),
        }
    }

    /// Palette item that the next grid click places.
    #[must_use]
    pub const fn selected(&self) -> Option<PaletteSymbol> {
        self.selected
    }

    /// Items placed so far, in placement order.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Editor grid dimensions as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (i32, i32) {
        (self.columns, self.rows)
    }

    /// Routes a click: editor buttons first, then the palette column, then
    /// the grid.
    pub fn handle_click(&mut self, point: Position) -> EditorOutcome {
        if PLAY_MAP_BUTTON.contains(point) {
            return EditorOutcome::PlayRequested;
        }
        if CLEAR_ALL_BUTTON.contains(point) {
            self.clear_all();
            return EditorOutcome::Cleared;
        }

        if within_palette_column(point) {
            return match palette_symbol_at(point) {
                Some(symbol) => {
                    self.select(symbol);
                    EditorOutcome::Selected(symbol)
                }
                None => EditorOutcome::Ignored,
            };
        }

        let Some(symbol) = self.selected else {
            return EditorOutcome::Ignored;
        };
        match self.place(symbol, point) {
            Ok(placement) => EditorOutcome::Placed(placement),
            Err(reason) => EditorOutcome::Rejected(reason),
        }
    }

    /// Picks the palette item for subsequent placements.
    pub fn select(&mut self, symbol: PaletteSymbol) {
        self.selected = Some(symbol);
    }

    /// Places `symbol` at the cell nearest to `point`.
    pub fn place(
        &mut self,
        symbol: PaletteSymbol,
        point: Position,
    ) -> Result<Placement, PlacementRejection> {
        let Some((cx, cy)) = self.cell_of(point) else {
            return Err(PlacementRejection::OutOfBounds);
        };
        let position = Position::new(cx as f32 * self.cell_size, cy as f32 * self.cell_size);

        let rejection = if self.placements.iter().any(|placed| placed.position == position) {
            Some(PlacementRejection::Stacked)
        } else if symbol == PaletteSymbol::Start && self.has(PaletteSymbol::Start) {
            Some(PlacementRejection::DuplicateStart)
        } else if symbol == PaletteSymbol::End && self.has(PaletteSymbol::End) {
            Some(PlacementRejection::DuplicateEnd)
        } else {
            None
        };
        if let Some(reason) = rejection {
            debug!(?symbol, %position, ?reason, "placement rejected");
            return Err(reason);
        }

        let placement = Placement { symbol, position };
        self.placements.push(placement);
        debug!(?symbol, %position, "item placed");
        Ok(placement)
    }

    /// Removes every placement and forgets the selection.
    pub fn clear_all(&mut self) {
        self.placements.clear();
        self.selected = None;
    }

    /// Whether both a start and an end marker are placed.
    #[must_use]
    pub fn has_start_and_end(&self) -> bool {
        self.has(PaletteSymbol::Start) && self.has(PaletteSymbol::End)
    }

    /// Projects the placements onto a full grid enclosed by walls.
    ///
    /// Grid row indices grow with the placement's vertical cell, so the
    /// exported maze is mirrored vertically relative to the editor view.
    #[must_use]
    pub fn export(&self) -> MazeLayout {
        let columns = self.columns.max(0) as usize;
        let rows = self.rows.max(0) as usize;
        let mut grid = vec![vec![LayoutSymbol::Floor.to_char(); columns]; rows];
        let mut markers: Vec<(usize, usize)> = Vec::new();

        for placement in &self.placements {
            let Some((cx, cy)) = self.cell_of(placement.position) else {
                continue;
            };
            let column = cx + self.columns / 2;
            let row = cy + self.rows / 2;
            if !(0..self.columns).contains(&column) || !(0..self.rows).contains(&row) {
                continue;
            }
            let (column, row) = (column as usize, row as usize);
            grid[row][column] = placement.symbol.layout_symbol().to_char();
            if matches!(placement.symbol, PaletteSymbol::Start | PaletteSymbol::End) {
                markers.push((row, column));
            }
        }

        let floor = LayoutSymbol::Floor.to_char();
        let wall = LayoutSymbol::Wall.to_char();
        for (row, cells) in grid.iter_mut().enumerate() {
            for (column, cell) in cells.iter_mut().enumerate() {
                let perimeter =
                    row == 0 || row + 1 == rows || column == 0 || column + 1 == columns;
                if perimeter && *cell == floor && !markers.contains(&(row, column)) {
                    *cell = wall;
                }
            }
        }

        MazeLayout::from_rows(grid.into_iter().map(|cells| cells.into_iter().collect::<String>()))
    }

    fn has(&self, symbol: PaletteSymbol) -> bool {
        self.placements.iter().any(|placed| placed.symbol == symbol)
    }

    /// Grid cell nearest to `point`, or `None` when it lies off the grid.
    fn cell_of(&self, point: Position) -> Option<(i32, i32)> {
        let cx = snap(point.x / self.cell_size, self.columns / 2)?;
        let cy = snap(point.y / self.cell_size, self.rows / 2)?;
        Some((cx, cy))
    }
}

/// Rounds `cells` half-to-even and keeps it only when `|cell| < half`.
/// Non-finite and far points are rejected before the cast.
fn snap(cells: f32, half: i32) -> Option<i32> {
    let cell = cells.round_ties_even();
    (cell.is_finite() && cell.abs() < half as f32).then_some(cell as i32)
}

fn grid_extent(requested: u32, fallback: u32) -> i32 {
    i32::try_from(requested).unwrap_or_else(|_| {
        warn!(requested, fallback, "editor grid extent too large, using the default");
        i32::try_from(fallback).unwrap_or(i32::MAX)
    })
}
