//! Line-oriented commands accepted by `labyrinth play` and `labyrinth export`.

use anyhow::{anyhow, bail, Context, Result};
use labyrinth_core::{Direction, PaletteSymbol, Position};

/// One line typed by the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Command {
    /// Arrow key.
    Move(Direction),
    /// Pointer click in screen coordinates.
    Click(Position),
    /// Press the button with this caption.
    Press(&'static str),
    /// Close the window.
    Quit,
}

impl Command {
    /// Parses a command line. Blank lines yield `None`.
    pub(crate) fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let command = match verb.to_ascii_lowercase().as_str() {
            "up" | "w" => Self::Move(Direction::Up),
            "down" | "s" => Self::Move(Direction::Down),
            "left" | "a" => Self::Move(Direction::Left),
            "right" | "d" => Self::Move(Direction::Right),
            "click" => {
                let x = coordinate(words.next(), "x")?;
                let y = coordinate(words.next(), "y")?;
                Self::Click(Position::new(x, y))
            }
            "menu" => Self::Press("MENU"),
            "auto" => Self::Press("AUTO"),
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command `{other}`"),
        };
        if let Some(extra) = words.next() {
            bail!("unexpected argument `{extra}` after `{verb}`");
        }
        Ok(Some(command))
    }
}

/// Parses an editor placement line: `SYMBOL X Y`.
pub(crate) fn parse_placement(line: &str) -> Result<Option<(PaletteSymbol, Position)>> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let symbol = PaletteSymbol::from_name(name)
        .ok_or_else(|| anyhow!("unknown palette symbol `{name}`"))?;
    let x = coordinate(words.next(), "x")?;
    let y = coordinate(words.next(), "y")?;
    Ok(Some((symbol, Position::new(x, y))))
}

fn coordinate(word: Option<&str>, axis: &str) -> Result<f32> {
    let word = word.ok_or_else(|| anyhow!("missing {axis} coordinate"))?;
    word.parse()
        .with_context(|| format!("invalid {axis} coordinate `{word}`"))
}
