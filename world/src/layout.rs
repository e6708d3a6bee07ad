//! In-game maze layouts and the grid-to-screen transform.

use std::{fs, path::Path};

use labyrinth_core::{CellCoord, LayoutSymbol, LoadError, Position};

/// Ordered rows of in-game layout symbols (`. X T E S F P`).
///
/// Rows may differ in length; the first row's length drives horizontal
/// centring and the row count drives vertical centring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeLayout {
    rows: Vec<String>,
}

impl MazeLayout {
    /// Creates a layout from the provided rows.
    #[must_use]
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a layout with one row per line of `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::from_rows(text.lines())
    }

    /// Reads a layout text file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|error| LoadError::from_io(path, error))?;
        Ok(Self::from_text(&text))
    }

    /// Rows composing the layout.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the first row, or zero for an empty layout.
    #[must_use]
    pub fn first_row_len(&self) -> usize {
        self.rows.first().map_or(0, |row| row.chars().count())
    }

    /// Reports whether any cell holds `symbol`.
    #[must_use]
    pub fn contains(&self, symbol: LayoutSymbol) -> bool {
        self.symbols().any(|(_, candidate)| candidate == symbol)
    }

    /// Iterates every cell in row-major order.
    pub fn symbols(&self) -> impl Iterator<Item = (CellCoord, LayoutSymbol)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, text)| {
            text.chars().enumerate().map(move |(column, symbol)| {
                (
                    CellCoord::new(column as u32, row as u32),
                    LayoutSymbol::from_char(symbol),
                )
            })
        })
    }

    /// Converts a grid cell into its centred screen position.
    #[must_use]
    pub fn screen_position(&self, cell: CellCoord, cell_size: f32) -> Position {
        let half_width = half_rounded_even(self.first_row_len()) as f32;
        let half_height = half_rounded_even(self.row_count()) as f32;
        Position::new(
            -(cell_size * half_width) + cell.column() as f32 * cell_size,
            cell_size * half_height - cell.row() as f32 * cell_size,
        )
    }

    /// Renders the layout back into newline-separated text.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.rows.join("\n")
    }
}

/// Halves `count`, rounding exact halves to the nearest even integer.
#[must_use]
pub fn half_rounded_even(count: usize) -> usize {
    let half = count / 2;
    if count % 2 == 1 && half % 2 == 1 {
        half + 1
    } else {
        half
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_round_to_even() {
        assert_eq!(half_rounded_even(4), 2);
        assert_eq!(half_rounded_even(15), 8);
        assert_eq!(half_rounded_even(25), 12);
        assert_eq!(half_rounded_even(1), 0);
        assert_eq!(half_rounded_even(3), 2);
    }

    #[test]
    fn screen_position_centres_the_maze() {
        let layout = MazeLayout::from_rows(["XXXX", "X..X", "XXXX", "XXXX"]);
        assert_eq!(
            layout.screen_position(CellCoord::new(0, 0), 24.0),
            Position::new(-48.0, 48.0)
        );
        assert_eq!(
            layout.screen_position(CellCoord::new(3, 2), 24.0),
            Position::new(24.0, 0.0)
        );
    }

    #[test]
    fn jagged_rows_use_the_first_row_for_width() {
        let layout = MazeLayout::from_rows(["XX", "XXXXXX"]);
        assert_eq!(layout.first_row_len(), 2);
        assert_eq!(
            layout.screen_position(CellCoord::new(5, 1), 24.0),
            Position::new(96.0, 0.0)
        );
    }

    #[test]
    fn symbols_are_row_major() {
        let layout = MazeLayout::from_rows(["XP", "F?"]);
        let symbols: Vec<_> = layout.symbols().map(|(_, symbol)| symbol).collect();
        assert_eq!(
            symbols,
            vec![
                LayoutSymbol::Wall,
                LayoutSymbol::PlayerSpawn,
                LayoutSymbol::End,
                LayoutSymbol::Floor,
            ]
        );
    }
}
