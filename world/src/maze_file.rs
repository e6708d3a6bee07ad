//! Loader for the raw maze file vocabulary (`. # x X`).

use std::{fs, path::Path};

use labyrinth_core::{CellCoord, LayoutSymbol, LoadError};
use tracing::debug;

use crate::MazeLayout;

/// Tile recognised in a raw maze file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawTile {
    /// `.`
    Floor,
    /// `#`
    Wall,
    /// `x`: walkable start marker.
    Start,
    /// `X`: walkable end marker.
    End,
}

impl RawTile {
    const fn from_char(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Self::Floor),
            '#' => Some(Self::Wall),
            'x' => Some(Self::Start),
            'X' => Some(Self::End),
            _ => None,
        }
    }

    /// Wall grid value of the tile: `1` for walls, `0` otherwise.
    #[must_use]
    pub const fn wall_bit(self) -> u8 {
        match self {
            Self::Wall => 1,
            Self::Floor | Self::Start | Self::End => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct RawRow {
    tiles: Vec<RawTile>,
}

/// Parsed raw maze file.
///
/// Start and end coordinates record the physical line and character index of
/// the marker. Characters outside the vocabulary are skipped, and lines that
/// contain no recognised character do not produce a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeFile {
    rows: Vec<RawRow>,
    start: Option<CellCoord>,
    end: Option<CellCoord>,
}

impl MazeFile {
    /// Reads and parses the maze file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|error| LoadError::from_io(path, error))?;
        let maze = Self::parse(&text);
        debug!(
            path = %path.display(),
            rows = maze.rows.len(),
            has_start = maze.start.is_some(),
            has_end = maze.end.is_some(),
            "loaded raw maze file"
        );
        Ok(maze)
    }

    /// Parses raw maze text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut rows = Vec::new();
        let mut start = None;
        let mut end = None;

        for (line_index, line) in text.lines().enumerate() {
            let mut tiles = Vec::new();
            for (char_index, symbol) in line.chars().enumerate() {
                let Some(tile) = RawTile::from_char(symbol) else {
                    continue;
                };
                let marker = CellCoord::new(char_index as u32, line_index as u32);
                match tile {
                    RawTile::Start => start = Some(marker),
                    RawTile::End => end = Some(marker),
                    RawTile::Floor | RawTile::Wall => {}
                }
                tiles.push(tile);
            }
            if !tiles.is_empty() {
                rows.push(RawRow { tiles });
            }
        }

        Self { rows, start, end }
    }

    /// 0/1 wall grid, one inner vector per non-empty row.
    #[must_use]
    pub fn wall_grid(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.tiles.iter().map(|tile| tile.wall_bit()).collect())
            .collect()
    }

    /// Location of the last start marker, if any.
    #[must_use]
    pub const fn start(&self) -> Option<CellCoord> {
        self.start
    }

    /// Location of the last end marker, if any.
    #[must_use]
    pub const fn end(&self) -> Option<CellCoord> {
        self.end
    }

    /// Translates the raw maze into the in-game layout vocabulary.
    #[must_use]
    pub fn to_layout(&self) -> MazeLayout {
        MazeLayout::from_rows(self.rows.iter().map(|row| {
            row.tiles
                .iter()
                .map(|tile| {
                    match tile {
                        RawTile::Floor => LayoutSymbol::Floor,
                        RawTile::Wall => LayoutSymbol::Wall,
                        RawTile::Start => LayoutSymbol::Start,
                        RawTile::End => LayoutSymbol::End,
                    }
                    .to_char()
                })
                .collect::<String>()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_walls_and_markers() {
        let maze = MazeFile::parse("#####\n#x.X#\n#####\n");
        assert_eq!(
            maze.wall_grid(),
            vec![vec![1, 1, 1, 1, 1], vec![1, 0, 0, 0, 1], vec![1, 1, 1, 1, 1]]
        );
        assert_eq!(maze.start(), Some(CellCoord::new(1, 1)));
        assert_eq!(maze.end(), Some(CellCoord::new(3, 1)));
    }

    #[test]
    fn missing_markers_are_not_an_error() {
        let maze = MazeFile::parse("###\n#.#\n###");
        assert!(maze.start().is_none());
        assert!(maze.end().is_none());
        assert_eq!(maze.wall_grid().len(), 3);
    }

    #[test]
    fn blank_lines_are_skipped_but_still_counted() {
        let maze = MazeFile::parse("##\n\n#x");
        assert_eq!(maze.wall_grid().len(), 2);
        assert_eq!(maze.start(), Some(CellCoord::new(1, 2)));
    }

    #[test]
    fn converts_to_in_game_layout() {
        let maze = MazeFile::parse("###\n#x#\n#X#\n");
        assert_eq!(maze.to_layout().rows(), ["XXX", "XSX", "XFX"]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let error = MazeFile::load("definitely/not/a/maze.txt").expect_err("file is absent");
        assert!(matches!(error, LoadError::NotFound { .. }));
    }
}
