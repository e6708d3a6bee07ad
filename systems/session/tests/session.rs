use std::time::Duration;

use labyrinth_core::{
    Direction, EnemyId, Event, GameConfig, Input, LevelRef, Mode, Position, Timer, TimerToken,
};
use labyrinth_system_session::{ButtonAction, CustomSource, PlayPhase, Session, VICTORY_MESSAGE};
use labyrinth_world::{GameLevel, MazeLayout};

#[derive(Default)]
struct ManualTimer {
    now: Duration,
    sequence: u64,
    pending: Vec<(Duration, u64, TimerToken)>,
}

impl Timer for ManualTimer {
    fn now(&self) -> Duration {
        self.now
    }

    fn after(&mut self, delay: Duration, token: TimerToken) {
        self.pending.push((self.now + delay, self.sequence, token));
        self.sequence += 1;
    }
}

impl ManualTimer {
    fn pop_due(&mut self, until: Duration) -> Option<TimerToken> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (due, _, _))| *due <= until)
            .min_by_key(|(_, (due, sequence, _))| (*due, *sequence))
            .map(|(index, _)| index)?;
        let (due, _, token) = self.pending.remove(index);
        self.now = due;
        Some(token)
    }
}

struct Harness {
    session: Session,
    timer: ManualTimer,
    events: Vec<Event>,
}

impl Harness {
    fn new() -> Self {
        Self::from_session(Session::new(GameConfig::default()).expect("built-ins parse"))
    }

    fn with_levels(rows: &[&[&str]]) -> Self {
        Self::with_config_and_levels(GameConfig::default(), rows)
    }

    fn with_config_and_levels(config: GameConfig, rows: &[&[&str]]) -> Self {
        let levels = rows
            .iter()
            .enumerate()
            .map(|(index, layout)| {
                GameLevel::new(
                    format!("Level {}", index + 1),
                    MazeLayout::from_rows(layout.iter().copied()),
                    Vec::new(),
                    &config,
                )
                .expect("layout parses")
            })
            .collect();
        Self::from_session(Session::with_levels(config, levels))
    }

    fn from_session(mut session: Session) -> Self {
        let mut events = Vec::new();
        session.boot(&mut events);
        Self {
            session,
            timer: ManualTimer::default(),
            events,
        }
    }

    fn input(&mut self, input: Input) {
        self.session.handle(input, &mut self.timer, &mut self.events);
    }

    fn click(&mut self, x: f32, y: f32) {
        self.input(Input::Click(Position::new(x, y)));
    }

    fn press(&mut self, direction: Direction, times: usize) {
        for _ in 0..times {
            self.input(Input::Key(direction));
        }
    }

    fn advance(&mut self, millis: u64) {
        let until = self.timer.now + Duration::from_millis(millis);
        while let Some(token) = self.timer.pop_due(until) {
            self.session
                .on_timer(token, &mut self.timer, &mut self.events);
        }
        self.timer.now = until;
    }

    fn player_position(&self) -> Position {
        self.session.player().expect("level running").position()
    }

    fn saw(&self, expected: &Event) -> bool {
        self.events.iter().any(|event| event == expected)
    }
}

const MENU_PLAY: (f32, f32) = (0.0, 80.0);
const MENU_CREATE: (f32, f32) = (0.0, 0.0);
const MENU_SELECT: (f32, f32) = (0.0, -80.0);
const MENU_QUIT: (f32, f32) = (0.0, -160.0);
const SIDE_SECONDARY: (f32, f32) = (-540.0, 125.0);
const SIDE_MENU: (f32, f32) = (-540.0, 225.0);
const PLAY_MAP: (f32, f32) = (-540.0, -175.0);

#[test]
fn play_button_starts_the_first_level_with_auto() {
    let mut harness = Harness::new();
    harness.click(MENU_PLAY.0, MENU_PLAY.1);

    assert_eq!(harness.session.mode(), Mode::PlayLevel(LevelRef::BuiltIn(0)));
    assert_eq!(harness.session.phase(), Some(PlayPhase::Interactive));
    let actions: Vec<ButtonAction> = harness
        .session
        .buttons()
        .iter()
        .map(|button| button.action)
        .collect();
    assert_eq!(actions, vec![ButtonAction::Menu, ButtonAction::Auto]);
}

#[test]
fn winning_the_first_level_by_hand_advances_the_campaign() {
    let mut harness = Harness::new();
    harness.click(MENU_PLAY.0, MENU_PLAY.1);

    harness.press(Direction::Left, 13);
    harness.press(Direction::Down, 1);
    assert_eq!(harness.session.scoreboard().current(), 100);
    harness.press(Direction::Left, 1);
    assert_eq!(harness.session.phase(), Some(PlayPhase::VictoryReplay));

    let before = harness.player_position();
    harness.press(Direction::Right, 1);
    assert_eq!(
        harness.player_position(),
        before,
        "keys are ignored during the victory replay"
    );

    harness.advance(3_000);
    assert_eq!(harness.session.banner(), Some(VICTORY_MESSAGE));
    assert_eq!(harness.player_position(), Position::new(144.0, 24.0));

    harness.advance(2_000);
    assert!(harness.saw(&Event::LevelCompleted {
        level: LevelRef::BuiltIn(0)
    }));
    assert_eq!(harness.session.mode(), Mode::PlayLevel(LevelRef::BuiltIn(1)));
    assert_eq!(harness.session.scoreboard().current(), 0);
    assert_eq!(harness.session.scoreboard().high(), 100);
}

#[test]
fn auto_solve_replays_then_resets_to_the_spawn() {
    let mut harness = Harness::new();
    harness.click(MENU_PLAY.0, MENU_PLAY.1);
    let spawn = harness.player_position();

    harness.click(SIDE_SECONDARY.0, SIDE_SECONDARY.1);
    assert_eq!(harness.session.phase(), Some(PlayPhase::AutoSolving));
    harness.press(Direction::Up, 1);

    harness.advance(4_500);
    assert_eq!(harness.session.phase(), Some(PlayPhase::AutoFinishPause));
    assert_eq!(harness.player_position(), Position::new(-192.0, 0.0));
    assert_eq!(harness.session.scoreboard().current(), 0, "no pickups while replaying");

    harness.advance(2_000);
    assert_eq!(harness.session.phase(), Some(PlayPhase::Interactive));
    assert_eq!(harness.player_position(), spawn);
    assert_eq!(harness.session.mode(), Mode::PlayLevel(LevelRef::BuiltIn(0)));
    assert!(harness.session.player().expect("level running").history().is_empty());
}

#[test]
fn unsolvable_level_offers_create_and_drops_its_enemy_ticks() {
    let mut harness = Harness::new();
    harness.click(MENU_SELECT.0, MENU_SELECT.1);
    assert_eq!(harness.session.mode(), Mode::Select);
    harness.click(0.0, 20.0);
    assert_eq!(harness.session.mode(), Mode::PlayLevel(LevelRef::BuiltIn(2)));
    harness.advance(600);

    harness.click(SIDE_SECONDARY.0, SIDE_SECONDARY.1);
    assert_eq!(harness.session.mode(), Mode::Create);
    assert!(harness.session.editor().is_some());
    let enemies_parked = harness.session.levels()[2]
        .enemies()
        .iter()
        .all(|(_, enemy)| !enemy.is_active());
    assert!(enemies_parked);

    harness.events.clear();
    harness.advance(2_000);
    assert!(harness.events.is_empty(), "stale ticks must not touch the session");
}

#[test]
fn editor_requires_start_and_end_before_playing() {
    let mut harness = Harness::new();
    harness.click(MENU_CREATE.0, MENU_CREATE.1);
    harness.click(PLAY_MAP.0, PLAY_MAP.1);

    assert_eq!(harness.session.mode(), Mode::Create);
    assert_eq!(
        harness.session.notice(),
        Some("ERROR: Level needs START (green) and END (red)!")
    );
    harness.advance(2_000);
    assert_eq!(harness.session.notice(), None);
}

#[test]
fn authored_level_is_playable_and_returns_to_the_menu() {
    let mut harness = Harness::new();
    harness.click(MENU_CREATE.0, MENU_CREATE.1);
    harness.click(-600.0, 0.0);
    harness.click(0.0, 0.0);
    harness.click(-600.0, -100.0);
    harness.click(48.0, 0.0);
    harness.click(PLAY_MAP.0, PLAY_MAP.1);

    assert_eq!(harness.session.mode(), Mode::PlayLevel(LevelRef::Custom));
    assert_eq!(harness.player_position(), Position::new(0.0, 0.0));
    let actions: Vec<ButtonAction> = harness
        .session
        .buttons()
        .iter()
        .map(|button| button.action)
        .collect();
    assert_eq!(actions, vec![ButtonAction::Menu, ButtonAction::CreateLevel]);

    harness.press(Direction::Right, 2);
    assert_eq!(harness.session.phase(), Some(PlayPhase::VictoryReplay));
    harness.advance(3_000);

    assert!(harness.saw(&Event::LevelCompleted {
        level: LevelRef::Custom
    }));
    assert_eq!(harness.session.mode(), Mode::Menu);
}

#[test]
fn create_from_a_custom_level_goes_back_to_the_menu() {
    let mut harness = Harness::new();
    harness.click(MENU_CREATE.0, MENU_CREATE.1);
    harness.click(-600.0, 0.0);
    harness.click(0.0, 0.0);
    harness.click(-600.0, -100.0);
    harness.click(96.0, 0.0);
    harness.click(PLAY_MAP.0, PLAY_MAP.1);

    harness.click(SIDE_SECONDARY.0, SIDE_SECONDARY.1);
    assert_eq!(harness.session.mode(), Mode::Menu);
}

#[test]
fn editor_rejections_show_short_notices() {
    let mut harness = Harness::new();
    harness.click(MENU_CREATE.0, MENU_CREATE.1);
    harness.click(-600.0, 0.0);
    harness.click(0.0, 0.0);
    harness.click(48.0, 48.0);

    assert_eq!(harness.session.notice(), Some("Only ONE start allowed!"));
    assert_eq!(harness.session.editor().expect("editor resident").placements().len(), 1);
    harness.advance(500);
    assert_eq!(harness.session.notice(), None);
}

#[test]
fn enemy_contact_ends_the_level_after_a_pause() {
    let mut harness = Harness::with_levels(&[&["XXXXXX", "XP.EFX", "XXXXXX"]]);
    harness.click(MENU_PLAY.0, MENU_PLAY.1);

    harness.press(Direction::Right, 2);

    assert!(harness
        .events
        .iter()
        .any(|event| matches!(event, Event::PlayerCaught { .. })));
    assert_eq!(harness.session.phase(), Some(PlayPhase::Defeated));
    harness.advance(999);
    assert_eq!(harness.session.phase(), Some(PlayPhase::Defeated));
    harness.advance(1);
    assert_eq!(harness.session.mode(), Mode::Menu);
}

#[test]
fn an_enemy_on_the_end_cell_catches_instead_of_finishing() {
    let mut harness = Harness::with_levels(&[&["XXXXXXX", "XP..FEX", "XXXXXXX"]]);
    harness.click(MENU_PLAY.0, MENU_PLAY.1);
    harness.press(Direction::Right, 2);

    harness.advance(250);
    let end = harness
        .session
        .active_level()
        .and_then(|level| level.end())
        .expect("level has an end");
    let enemy = harness
        .session
        .active_level()
        .and_then(|level| level.enemies().get(0))
        .map(|enemy| enemy.position())
        .expect("enemy spawned");
    assert_eq!(enemy, end, "the chasing enemy steps onto the end cell");

    harness.press(Direction::Right, 1);

    assert!(harness.saw(&Event::PlayerCaught {
        enemy: EnemyId::new(0)
    }));
    assert_eq!(harness.session.phase(), Some(PlayPhase::Defeated));
    assert!(!harness
        .events
        .iter()
        .any(|event| matches!(event, Event::LevelCompleted { .. })));
}

#[test]
fn a_pickup_is_scored_before_a_catch_in_the_same_frame() {
    let config = GameConfig {
        collision_distance: 30.0,
        ..GameConfig::default()
    };
    let mut harness =
        Harness::with_config_and_levels(config, &[&["XXXXXX", "XP.TFX", "XXEXXX"]]);
    harness.click(MENU_PLAY.0, MENU_PLAY.1);
    harness.events.clear();

    harness.press(Direction::Right, 1);

    let collected = harness
        .events
        .iter()
        .position(|event| matches!(event, Event::TreasureCollected { gold: 100, .. }))
        .expect("treasure collected");
    let caught = harness
        .events
        .iter()
        .position(|event| matches!(event, Event::PlayerCaught { .. }))
        .expect("player caught");
    assert!(collected < caught);
    assert_eq!(harness.session.scoreboard().current(), 100);
    assert_eq!(harness.session.phase(), Some(PlayPhase::Defeated));
}

#[test]
fn finishing_the_campaign_shows_a_guarded_victory_screen() {
    let mut harness = Harness::with_levels(&[&["XXX", "XPX", "XFX"]]);
    harness.click(MENU_PLAY.0, MENU_PLAY.1);
    harness.press(Direction::Down, 1);

    harness.advance(2_500);
    assert_eq!(harness.session.mode(), Mode::Victory);
    assert_eq!(harness.session.final_score(), 0);

    harness.click(0.0, -120.0);
    assert_eq!(harness.session.mode(), Mode::Victory, "clicks are ignored at first");

    harness.advance(3_000);
    assert!(harness.session.victory_armed());
    harness.click(0.0, -120.0);
    assert_eq!(harness.session.mode(), Mode::Menu);
}

#[test]
fn menu_button_abandons_the_level() {
    let mut harness = Harness::new();
    harness.click(MENU_PLAY.0, MENU_PLAY.1);
    harness.click(SIDE_MENU.0, SIDE_MENU.1);
    assert_eq!(harness.session.mode(), Mode::Menu);
    assert!(harness.session.player().is_none());
}

#[test]
fn back_button_leaves_the_level_list() {
    let mut harness = Harness::new();
    harness.click(MENU_SELECT.0, MENU_SELECT.1);
    harness.click(0.0, -60.0);
    assert_eq!(harness.session.mode(), Mode::Menu);
}

#[test]
fn quit_stops_the_session() {
    let mut harness = Harness::new();
    harness.click(MENU_QUIT.0, MENU_QUIT.1);

    assert!(harness.saw(&Event::ShutdownRequested));
    assert!(!harness.session.is_running());
    harness.click(MENU_PLAY.0, MENU_PLAY.1);
    assert_eq!(harness.session.mode(), Mode::Menu);
}

#[test]
fn closing_mid_level_parks_everything() {
    let mut harness = Harness::new();
    harness.click(MENU_SELECT.0, MENU_SELECT.1);
    harness.click(0.0, 20.0);
    harness.input(Input::Close);

    assert!(!harness.session.is_running());
    assert!(harness.session.levels()[2].active_enemy_ids().is_empty());
}

#[test]
fn missing_custom_file_falls_back_to_the_menu() {
    let mut harness = Harness::new();
    harness.session.open_custom(
        &CustomSource::Layout("no/such/layout.txt".into()),
        &mut harness.timer,
        &mut harness.events,
    );

    assert_eq!(harness.session.mode(), Mode::Menu);
    assert!(harness
        .session
        .notice()
        .is_some_and(|text| text.contains("not found")));
}
