//! Levels shipped with the game.

use labyrinth_core::{ContentError, Direction, GameConfig};

use crate::{GameLevel, MazeLayout};

const CORRIDOR: [&str; 4] = [
    "XXXXXXXXXXXXXXSX",
    "X             PX",
    "FTXXXXXXXXXXXXXX",
    "XXXXXXXXXXXXXXXX",
];

const SWITCHBACK: [&str; 12] = [
    "XXXXXXXXXXXXXXX",
    "X X XT        F",
    "X X   XXXXXXXXX",
    "XT  X         X",
    "XXXXXXXXXXXXX X",
    "XXXXXXXXXXXXX X",
    "XT          X X",
    "XXXXXXXXXXX   X",
    "XT          X X",
    "XXXXXXXXXXXXX X",
    "XP            X",
    "XXXXXXXXXXXXXXX",
];

const WARREN: [&str; 25] = [
    "XXXXXXXXXXXXXXXXXXXXXXXXX",
    "XP XXXXXXX          XXXXX",
    "X  XXXXXXX  XXXXXX  XXXXX",
    "X       XX EXXXXXX EXXXXX",
    "X       XX  XXX        XX",
    "XXXXXX  XX  XXX E      XX",
    "XXXXXX  XX  XXXXXX  XXXXX",
    "XXXXXX  XX    XXXX  XXXXX",
    "X  XXX        XXXXT XXXXX",
    "X  XXX  XXXXXXXXXXXXXXXXX",
    "X         XXXXXXXXXXXXXXX",
    "XE               XXXXXXXX",
    "XXXXXXXXXXXX     XXXXXT X",
    "XXXXXXXXXXXXXXX  XXXXX  X",
    "XXXT XXXXXXXXXX         X",
    "XXX                     X",
    "XXX         XXXXXXXXXXXXX",
    "XXXXXXXXXX  XXXXXXXXXXXXX",
    "XXXXXXXXXX             TX",
    "XXT  XXXXXE             X",
    "XX   XXXXXX        XXXXX",
    "XX    FXXXXXXXXXXX  XXXXX",
    "XX          XXXX        X",
    "XXXXE                   X",
    "XXXXXXXXXXXXXXXXXXXXXXXXX",
];

fn script(runs: &[(Direction, usize)]) -> Vec<String> {
    runs.iter()
        .flat_map(|(direction, count)| std::iter::repeat(direction.token().to_owned()).take(*count))
        .collect()
}

/// Builds the three built-in levels in play order.
pub fn built_in_levels(config: &GameConfig) -> Result<Vec<GameLevel>, ContentError> {
    use Direction::{Down, Left, Right, Up};

    Ok(vec![
        GameLevel::new(
            "Level 1",
            MazeLayout::from_rows(CORRIDOR),
            script(&[(Left, 12), (Down, 1), (Left, 2)]),
            config,
        )?,
        GameLevel::new(
            "Level 2",
            MazeLayout::from_rows(SWITCHBACK),
            script(&[(Right, 12), (Up, 7), (Left, 8), (Up, 2), (Right, 9)]),
            config,
        )?,
        GameLevel::new("Level 3", MazeLayout::from_rows(WARREN), Vec::new(), config)?,
    ])
}
