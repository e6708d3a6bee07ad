//! Character-grid renderer for terminals and logs.

use std::{collections::HashMap, io::Write};

use anyhow::{Context, Result};
use glam::Vec2;
use labyrinth_core::{ActorHandle, ActorKind};
use labyrinth_rendering::{Renderer, SceneButton, TextStyle, Tile, Viewport};

const BLANK: char = ' ';

/// Draws scenes as text, one character per maze cell.
///
/// Static tiles are redrawn every frame. Actors are retained between frames
/// until cleared, mirroring sprite-based hosts.
pub(crate) struct AsciiRenderer<W: Write> {
    out: W,
    viewport: Viewport,
    cells: Vec<Vec<char>>,
    actors: HashMap<ActorHandle, (usize, usize)>,
    lines: Vec<String>,
    buttons: Vec<String>,
}

impl<W: Write> AsciiRenderer<W> {
    pub(crate) fn new(out: W, viewport: Viewport) -> Self {
        Self {
            out,
            cells: vec![vec![BLANK; viewport.columns()]; viewport.rows()],
            viewport,
            actors: HashMap::new(),
            lines: Vec::new(),
            buttons: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn compose(&self) -> Vec<String> {
        let mut grid = self.cells.clone();
        let mut handles: Vec<_> = self.actors.iter().collect();
        // Player last so it stays visible on top of anything it overlaps.
        handles.sort_by_key(|(handle, _)| (handle.kind == ActorKind::Player, handle.slot));
        for (handle, &(column, row)) in handles {
            grid[row][column] = actor_glyph(handle.kind);
        }

        let occupied = |row: &Vec<char>| row.iter().any(|cell| *cell != BLANK);
        let Some(first) = grid.iter().position(occupied) else {
            return Vec::new();
        };
        let last = grid.iter().rposition(occupied).unwrap_or(first);
        let left = grid
            .iter()
            .filter_map(|row| row.iter().position(|cell| *cell != BLANK))
            .min()
            .unwrap_or(0);

        grid[first..=last]
            .iter()
            .map(|row| {
                row[left..]
                    .iter()
                    .collect::<String>()
                    .trim_end()
                    .to_owned()
            })
            .collect()
    }
}

const fn tile_glyph(tile: Tile) -> char {
    match tile {
        Tile::Wall => '#',
        Tile::Start => 'S',
        Tile::End => 'F',
        Tile::Treasure => 'T',
        Tile::Enemy => 'E',
    }
}

const fn actor_glyph(kind: ActorKind) -> char {
    match kind {
        ActorKind::Player => '@',
        ActorKind::Treasure => '$',
        ActorKind::Enemy => 'E',
    }
}

impl<W: Write> Renderer for AsciiRenderer<W> {
    fn draw_tile(&mut self, position: Vec2, tile: Tile) {
        if let Some((column, row)) = self.viewport.project(position) {
            self.cells[row][column] = tile_glyph(tile);
        }
    }

    fn draw_actor(&mut self, handle: ActorHandle, position: Vec2) {
        match self.viewport.project(position) {
            Some(cell) => {
                let _ = self.actors.insert(handle, cell);
            }
            None => {
                let _ = self.actors.remove(&handle);
            }
        }
    }

    fn clear_actor(&mut self, handle: ActorHandle) {
        let _ = self.actors.remove(&handle);
    }

    fn draw_button(&mut self, button: &SceneButton) {
        let label = if button.enabled {
            format!("[{}]", button.label)
        } else {
            format!("({})", button.label)
        };
        self.buttons.push(label);
    }

    fn write_text(&mut self, _position: Vec2, text: &str, _style: TextStyle) {
        self.lines.push(text.to_owned());
    }

    fn present(&mut self) -> Result<()> {
        let mut frame = self.compose();
        frame.append(&mut self.lines);
        if !self.buttons.is_empty() {
            frame.push(self.buttons.join(" "));
            self.buttons.clear();
        }
        for row in &mut self.cells {
            row.fill(BLANK);
        }

        for line in &frame {
            writeln!(self.out, "{line}").context("failed to write frame")?;
        }
        writeln!(self.out).context("failed to write frame separator")?;
        self.out.flush().context("failed to flush frame")
    }
}
