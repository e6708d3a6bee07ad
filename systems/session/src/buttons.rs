use labyrinth_core::{Position, Rect};
use labyrinth_system_editor::{CLEAR_ALL_BUTTON, PLAY_MAP_BUTTON};

const MENU_WIDTH: f32 = 300.0;
const MENU_HEIGHT: f32 = 60.0;
const SIDE_WIDTH: f32 = 120.0;
const SIDE_HEIGHT: f32 = 50.0;
const SELECT_TOP: f32 = 150.0;
const SELECT_SPACING: f32 = 80.0;

/// What pressing a button asks the session to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    /// Start the built-in campaign at its first level.
    PlayLevels,
    /// Open the level editor.
    CreateLevel,
    /// Open the level list.
    SelectLevel,
    /// End the session.
    Quit,
    /// Abandon the level and return to the menu.
    Menu,
    /// Run the level's recorded solution.
    Auto,
    /// Play the built-in level with this index.
    PlayBuiltIn(usize),
    /// Leave the level list.
    Back,
    /// Leave the victory screen.
    MainMenu,
    /// Hand the authored layout to the game.
    PlayMap,
    /// Wipe the editor grid.
    ClearAll,
}

/// Labelled clickable region.
#[derive(Clone, Debug, PartialEq)]
pub struct Button {
    /// Clickable area.
    pub rect: Rect,
    /// Caption.
    pub label: String,
    /// Action triggered by a click.
    pub action: ButtonAction,
}

impl Button {
    fn new(rect: Rect, label: impl Into<String>, action: ButtonAction) -> Self {
        Self {
            rect,
            label: label.into(),
            action,
        }
    }
}

pub(crate) fn hit(buttons: &[Button], point: Position) -> Option<ButtonAction> {
    buttons
        .iter()
        .find(|button| button.rect.contains(point))
        .map(|button| button.action)
}

pub(crate) fn menu_buttons() -> Vec<Button> {
    [
        (50.0, "PLAY LEVELS", ButtonAction::PlayLevels),
        (-30.0, "CREATE LEVEL", ButtonAction::CreateLevel),
        (-110.0, "SELECT LEVEL", ButtonAction::SelectLevel),
        (-190.0, "QUIT", ButtonAction::Quit),
    ]
    .into_iter()
    .map(|(y, label, action)| {
        Button::new(Rect::new(-150.0, y, MENU_WIDTH, MENU_HEIGHT), label, action)
    })
    .collect()
}

pub(crate) fn play_buttons(has_auto_solution: bool) -> Vec<Button> {
    let secondary = Rect::new(-600.0, 100.0, SIDE_WIDTH, SIDE_HEIGHT);
    vec![
        Button::new(
            Rect::new(-600.0, 200.0, SIDE_WIDTH, SIDE_HEIGHT),
            "MENU",
            ButtonAction::Menu,
        ),
        if has_auto_solution {
            Button::new(secondary, "AUTO", ButtonAction::Auto)
        } else {
            Button::new(secondary, "CREATE", ButtonAction::CreateLevel)
        },
    ]
}

pub(crate) fn select_buttons(level_count: usize) -> Vec<Button> {
    let row = |index: usize| {
        Rect::new(
            -200.0,
            SELECT_TOP - index as f32 * SELECT_SPACING,
            400.0,
            MENU_HEIGHT,
        )
    };
    let mut buttons: Vec<Button> = (0..level_count)
        .map(|index| {
            Button::new(
                row(index),
                format!("Level {}", index + 1),
                ButtonAction::PlayBuiltIn(index),
            )
        })
        .collect();
    buttons.push(Button::new(row(level_count), "BACK TO MENU", ButtonAction::Back));
    buttons
}

pub(crate) fn editor_buttons() -> Vec<Button> {
    vec![
        Button::new(PLAY_MAP_BUTTON, "PLAY MAP", ButtonAction::PlayMap),
        Button::new(CLEAR_ALL_BUTTON, "CLEAR ALL", ButtonAction::ClearAll),
    ]
}

pub(crate) fn victory_buttons() -> Vec<Button> {
    vec![Button::new(
        Rect::new(-150.0, -150.0, MENU_WIDTH, MENU_HEIGHT),
        "MAIN MENU",
        ButtonAction::MainMenu,
    )]
}
