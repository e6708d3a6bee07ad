use std::collections::HashSet;

use labyrinth_core::{Direction, GameConfig, Position};
use labyrinth_system_replay::{Replay, ReplayKind, ReplayStep};
use labyrinth_world::{built_in_levels, Player};
use proptest::prelude::*;

const CELL: f32 = 24.0;
const TOUCH: f32 = 5.0;

fn run_to_end(replay: &mut Replay, player: &mut Player) -> usize {
    let mut steps = 0;
    while let ReplayStep::Moved(_) = replay.advance(player, CELL) {
        steps += 1;
    }
    steps
}

#[test]
fn built_in_solutions_reach_the_end_marker() {
    let mut levels = built_in_levels(&GameConfig::default()).expect("built-ins parse");
    for level in levels.iter_mut().filter(|level| level.has_auto_solution()) {
        let mut player = level.enter(|| Direction::Up).expect("level enters");
        let spawn = level.player_spawn().expect("spawn present");
        let tokens = level.auto_solution().to_vec();

        let mut replay = Replay::begin_auto_solve(&tokens, &mut player, spawn);
        assert_eq!(replay.kind(), ReplayKind::AutoSolve);
        let steps = run_to_end(&mut replay, &mut player);

        assert_eq!(steps, tokens.len());
        assert!(
            level.reached_end(player.position(), TOUCH),
            "{} solution should finish on the end marker",
            level.name()
        );
        assert!(player.history().is_empty(), "replays never record history");
    }
}

#[test]
fn keyboard_is_ignored_while_a_replay_steers() {
    let mut player = Player::spawn_at(Position::new(0.0, 0.0));
    let tokens = vec!["up".to_owned()];
    let _replay = Replay::begin_auto_solve(&tokens, &mut player, Position::new(0.0, 0.0));
    assert!(!player.try_move(Direction::Right, &HashSet::new(), CELL));
}

fn any_direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

proptest! {
    #[test]
    fn reverse_replay_returns_to_the_origin(
        moves in prop::collection::vec(any_direction(), 0..64)
    ) {
        let origin = Position::new(0.0, 0.0);
        let mut walls = HashSet::new();
        let _ = walls.insert(Position::new(24.0, 24.0));
        let _ = walls.insert(Position::new(-48.0, 0.0));
        let mut player = Player::spawn_at(origin);
        for direction in moves {
            let _ = player.try_move(direction, &walls, CELL);
        }
        let recorded = player.history().len();

        let mut replay = Replay::begin_reverse(&mut player);
        prop_assert_eq!(run_to_end(&mut replay, &mut player), recorded);
        prop_assert_eq!(player.position(), origin);
    }
}
