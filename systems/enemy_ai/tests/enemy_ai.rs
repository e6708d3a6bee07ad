use labyrinth_core::{Direction, EnemyId, GameConfig, Position};
use labyrinth_system_enemy_ai::{EnemyAi, TickOutcome};
use labyrinth_world::{GameLevel, MazeLayout};

const ENEMY: EnemyId = EnemyId::new(0);

fn level_with(rows: &[&str], heading: Direction) -> GameLevel {
    let mut level = GameLevel::new(
        "arena",
        MazeLayout::from_rows(rows.iter().copied()),
        Vec::new(),
        &GameConfig::default(),
    )
    .expect("layout parses");
    let _ = level.enter(|| heading).expect("level enters");
    level
}

fn enemy_state(level: &GameLevel) -> (Position, Direction) {
    let enemy = level.enemies().get(ENEMY.get()).expect("enemy spawned");
    (enemy.position(), enemy.heading())
}

#[test]
fn nearby_player_on_the_left_turns_the_enemy_left() {
    let config = GameConfig::default();
    let mut level = level_with(&["XXXXXXX", "XP..E.X", "XF....X", "XXXXXXX"], Direction::Up);
    let (start, _) = enemy_state(&level);
    let player = Position::new(start.x - 50.0, start.y);

    let outcome = EnemyAi::new(1).tick(&mut level, player, ENEMY, &config);

    assert_eq!(outcome, TickOutcome::Reschedule);
    let (position, heading) = enemy_state(&level);
    assert_eq!(heading, Direction::Left, "enemy should chase toward the player");
    assert_eq!(position, Position::new(start.x - 24.0, start.y));
}

#[test]
fn distant_player_leaves_the_heading_alone() {
    let config = GameConfig::default();
    let mut level = level_with(&["XXXXXXX", "XPE...X", "XF....X", "XXXXXXX"], Direction::Right);
    let (start, _) = enemy_state(&level);
    let player = Position::new(start.x - 500.0, start.y);

    let _ = EnemyAi::new(1).tick(&mut level, player, ENEMY, &config);

    assert_eq!(
        enemy_state(&level),
        (Position::new(start.x + 24.0, start.y), Direction::Right)
    );
}

#[test]
fn walls_and_treasures_block_the_step() {
    let config = GameConfig::default();
    let far = Position::new(10_000.0, 10_000.0);

    let mut walled = level_with(&["XXXXX", "XPE.X", "XF..X", "XXXXX"], Direction::Up);
    let (start, _) = enemy_state(&walled);
    let mut ai = EnemyAi::new(3);
    assert_eq!(ai.tick(&mut walled, far, ENEMY, &config), TickOutcome::Reschedule);
    assert_eq!(enemy_state(&walled).0, start, "wall must stop the enemy");

    let mut guarded = level_with(&["XXXXXX", "XPET.X", "XF...X", "XXXXXX"], Direction::Right);
    let (start, _) = enemy_state(&guarded);
    let _ = ai.tick(&mut guarded, far, ENEMY, &config);
    assert_eq!(enemy_state(&guarded).0, start, "treasure cell must stop the enemy");
}

#[test]
fn parked_enemy_stops_ticking() {
    let config = GameConfig::default();
    let mut level = level_with(&["XXXXX", "XPE.X", "XF..X", "XXXXX"], Direction::Right);
    let (start, _) = enemy_state(&level);
    level.exit();

    let outcome = EnemyAi::new(1).tick(&mut level, Position::default(), ENEMY, &config);

    assert_eq!(outcome, TickOutcome::Stop);
    assert_eq!(enemy_state(&level).0, start);
}

#[test]
fn unknown_enemy_stops_ticking() {
    let config = GameConfig::default();
    let mut level = level_with(&["XXXX", "XP.X", "XF.X", "XXXX"], Direction::Up);
    let outcome = EnemyAi::new(1).tick(&mut level, Position::default(), EnemyId::new(4), &config);
    assert_eq!(outcome, TickOutcome::Stop);
}

proptest::proptest! {
    #[test]
    fn chasing_never_moves_away_from_the_player(
        dx in -8i32..=8,
        dy in -8i32..=8
    ) {
        let from = Position::new(0.0, 0.0);
        let target = Position::new(dx as f32 * 24.0, dy as f32 * 24.0);
        match labyrinth_system_enemy_ai::chase_heading(from, target) {
            Some(direction) => {
                let next = from.step(direction, 24.0);
                proptest::prop_assert!(next.distance_to(target) < from.distance_to(target));
            }
            None => proptest::prop_assert_eq!((dx, dy), (0, 0)),
        }
    }
}
