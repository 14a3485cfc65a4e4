use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use arcade_snake::config::{Difficulty, POINTS_PER_FOOD};
use arcade_snake::game::{GameOverCause, GameState, Status, StepOutcome};
use arcade_snake::input::Direction;
use arcade_snake::snake::{Position, Snake};

#[test]
fn wall_collision_on_easy_grid() {
    let mut state = GameState::from_layout(
        15,
        Difficulty::Easy,
        Snake::from_segments(
            vec![Position::new(14, 7), Position::new(13, 7), Position::new(12, 7)],
            Direction::Right,
        ),
        Position::new(0, 0),
        42,
    )
    .expect("valid layout");
    let before: Vec<Position> = state.snake().segments().copied().collect();

    let outcome = state.step();

    let StepOutcome::GameOver(event) = outcome else {
        panic!("expected wall collision, got {outcome:?}");
    };
    assert_eq!(event.cause, GameOverCause::Wall);
    assert_eq!(event.difficulty, Difficulty::Easy);
    assert_eq!(event.final_score, 0);
    assert_eq!(state.status(), Status::GameOver);
    assert_eq!(state.snake().segments().copied().collect::<Vec<_>>(), before);

    // The terminal event is produced once; later steps do nothing.
    assert_eq!(state.step(), StepOutcome::Skipped);
}

#[test]
fn food_consumption_grows_and_relocates_food() {
    let mut state = GameState::from_layout(
        10,
        Difficulty::Medium,
        Snake::from_segments(
            vec![Position::new(4, 4), Position::new(3, 4)],
            Direction::Right,
        ),
        Position::new(5, 4),
        7,
    )
    .expect("valid layout");

    assert_eq!(state.step(), StepOutcome::Moved { ate: true });

    assert_eq!(state.snake().len(), 3);
    assert_eq!(state.score(), POINTS_PER_FOOD);
    assert!(!state.snake().occupies(state.food()));
    assert!(state.food().is_within(state.grid()));
}

#[test]
fn self_collision_with_third_segment() {
    // Head at (2,2) turning down into (2,3), the third segment behind it.
    let mut state = GameState::from_layout(
        8,
        Difficulty::Medium,
        Snake::from_segments(
            vec![
                Position::new(2, 2),
                Position::new(3, 2),
                Position::new(3, 3),
                Position::new(2, 3),
                Position::new(1, 3),
            ],
            Direction::Down,
        ),
        Position::new(7, 7),
        3,
    )
    .expect("valid layout");

    let StepOutcome::GameOver(event) = state.step() else {
        panic!("moving into the body must end the game");
    };
    assert_eq!(event.cause, GameOverCause::Body);
    assert_eq!(state.status(), Status::GameOver);
}

#[test]
fn rapid_inputs_keep_last_accepted_direction() {
    let mut state = GameState::new_with_seed(Difficulty::Medium, 1).expect("valid preset");
    let start = state.snake().head();

    // Up is accepted; Left reverses the current Right and is dropped.
    assert!(state.request_direction(Direction::Up));
    assert!(!state.request_direction(Direction::Left));
    state.step();
    assert_eq!(state.snake().direction(), Direction::Up);
    assert_eq!(state.snake().head(), Position::new(start.x, start.y - 1));

    // Left then Up are accepted and Up, the later one, wins.
    assert!(state.request_direction(Direction::Left));
    assert!(!state.request_direction(Direction::Right));
    assert!(state.request_direction(Direction::Up));
    state.step();
    assert_eq!(state.snake().direction(), Direction::Up);
}

#[test]
fn reversal_guard_keeps_pending_direction() {
    let mut state = GameState::new_with_seed(Difficulty::Hard, 9).expect("valid preset");
    state.start();

    assert!(!state.request_direction(Direction::Left));
    assert_eq!(state.snake().pending_direction(), Direction::Right);
}

#[test]
fn long_seeded_run_upholds_invariants() {
    let mut state = GameState::new_with_seed(Difficulty::Easy, 2024).expect("valid preset");
    let grid = state.grid();
    let mut rng = StdRng::seed_from_u64(99);
    let turns = [Direction::Down, Direction::Left, Direction::Up, Direction::Right];
    let mut last_score = 0;
    let mut games = 0;

    for tick in 0..5_000_u32 {
        if tick % 3 == 0 {
            state.request_direction(turns[rng.gen_range(0..turns.len())]);
        }
        if state.status() == Status::Idle {
            state.start();
        }

        let len_before = state.snake().len();
        match state.step() {
            StepOutcome::Moved { ate } => {
                let expected = if ate { len_before + 1 } else { len_before };
                assert_eq!(state.snake().len(), expected);
                assert_eq!(
                    state.score(),
                    if ate { last_score + POINTS_PER_FOOD } else { last_score }
                );
            }
            StepOutcome::GameOver(event) => {
                assert_eq!(event.final_score, last_score);
                games += 1;
                state.restart().expect("preset grid is valid");
            }
            StepOutcome::Skipped => {}
        }
        last_score = state.score();

        let segments: Vec<Position> = state.snake().segments().copied().collect();
        let unique: HashSet<Position> = segments.iter().copied().collect();
        assert_eq!(unique.len(), segments.len(), "snake overlaps itself");
        assert!(segments.iter().all(|segment| segment.is_within(grid)));
        assert!(state.food().is_within(grid));
        assert!(!state.snake().occupies(state.food()));
    }

    assert!(games > 0);
}
