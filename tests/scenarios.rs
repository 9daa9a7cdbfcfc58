use rand::rngs::StdRng;
use rand::SeedableRng;

use sbp::search::{bfs, dfs, ids};
use sbp::{
    random_walk, solve, Direction, Goal, Move, Outcome, PuzzleError, SearchConfig, SearchLimits,
    State, Strategy,
};

const SMALL: &str = include_str!("../puzzles/small.txt");
const KLOTSKI: &str = include_str!("../puzzles/klotski.txt");
const SENTINEL: &str = include_str!("../puzzles/sentinel.txt");

fn state(text: &str) -> State {
    text.parse().unwrap()
}

// Every movable id covers exactly its bounding rectangle.
fn is_well_formed(s: &State) -> bool {
    s.labels().into_iter().filter(|&id| id >= 2).all(|id| {
        let Some(rect) = s.locate(id) else {
            return false;
        };
        let count = s.grid().iter().filter(|&&c| c == id).count();
        count == rect.width * rect.height
            && (rect.row..rect.row + rect.height)
                .all(|y| (rect.col..rect.col + rect.width).all(|x| s.get(y, x) == Some(id)))
    })
}

#[test]
fn single_piece_moves_everywhere() {
    let mut s = state("3,3,\n0,0,0,\n0,2,0,\n0,0,0,");
    assert_eq!(
        s.possible_moves(),
        vec![
            Move::new(Direction::Up, 2),
            Move::new(Direction::Down, 2),
            Move::new(Direction::Left, 2),
            Move::new(Direction::Right, 2),
        ]
    );
    s.apply_move(Move::new(Direction::Up, 2)).unwrap();
    assert_eq!(s.grid(), &[0, 2, 0, 0, 0, 0, 0, 0, 0]);
    // No -1 anywhere, so the board counts as complete under the sentinel rule.
    assert!(s.is_complete());
}

#[test]
fn empty_board_is_complete_with_no_moves() {
    let s = state("2,1,\n0,0,");
    assert!(s.is_complete());
    assert!(s.possible_moves().is_empty());
}

#[test]
fn fixtures_are_well_formed() {
    for text in [SMALL, KLOTSKI, SENTINEL] {
        assert!(is_well_formed(&state(text)));
    }
    assert!(!is_well_formed(&state("3,1,\n4,0,4,")));
}

#[test]
fn missing_piece_is_an_error_not_an_abort() {
    let s = state(SENTINEL);
    match s.moves_for(99) {
        Err(PuzzleError::PieceNotFound(99)) => {}
        other => panic!("expected PieceNotFound, got {other:?}"),
    }
    let err = s.apply_move_cloning(Move::new(Direction::Down, 99)).unwrap_err();
    assert_eq!(err.to_string(), "the piece '99' does not exist");
}

#[test]
fn loads_fixture_from_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/puzzles/klotski.txt");
    let s = State::from_file(path).unwrap();
    assert_eq!((s.width(), s.height()), (4, 5));
    assert_eq!(s, state(KLOTSKI));
    assert!(matches!(
        State::from_file("no/such/puzzle.txt"),
        Err(PuzzleError::Io(_))
    ));
}

#[test]
fn bfs_is_optimal_on_small_fixture() {
    let start = state(SMALL);
    let goal = Goal::Target { row: 2, col: 1 };

    let report = bfs(&start, &goal, SearchLimits::default()).unwrap();
    let solution = report.solution().unwrap();
    assert_eq!(solution.moves.len(), 6);
    assert_eq!(solution.replay(&start).unwrap(), solution.state);

    let shorter = SearchLimits {
        max_nodes: None,
        max_depth: Some(5),
    };
    assert_eq!(bfs(&start, &goal, shorter).unwrap().outcome, Outcome::Truncated);
    assert_eq!(ids(&start, &goal, shorter).unwrap().outcome, Outcome::Truncated);

    let deepening = ids(&start, &goal, SearchLimits::default()).unwrap();
    assert_eq!(deepening.solution().unwrap().moves.len(), 6);

    let depth_first = dfs(&start, &goal, SearchLimits::default()).unwrap();
    let path = &depth_first.solution().unwrap().moves;
    assert!(path.len() >= 6);
}

#[test]
fn klotski_is_solved_breadth_first() {
    let start = state(KLOTSKI);
    let config = SearchConfig {
        strategy: Strategy::BreadthFirst,
        limits: SearchLimits::default(),
        goal: Goal::Target { row: 3, col: 1 },
    };
    let report = solve(&start, &config).unwrap();
    let solution = report.solution().unwrap();
    assert_eq!(solution.moves.len(), 116);
    assert_eq!(solution.replay(&start).unwrap(), solution.state);
    assert_eq!(solution.state.get(4, 1), Some(2));
    assert_eq!(solution.state.get(4, 2), Some(2));
}

#[test]
fn sentinel_fixture_never_completes() {
    let start = state(SENTINEL);
    let report = bfs(&start, &Goal::Sentinel, SearchLimits::default()).unwrap();
    assert_eq!(report.outcome, Outcome::Exhausted);
    assert!(report.stats.expanded > 1);
}

#[test]
fn walked_board_solves_back_within_walk_length() {
    let start = state(SENTINEL);
    let home = start.locate(2).unwrap();
    let goal = Goal::Target {
        row: home.row,
        col: home.col,
    };

    let mut walked = start.clone();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut sink = Vec::new();
    let walk = random_walk(&mut walked, 40, &Goal::Sentinel, &mut rng, &mut sink).unwrap();
    assert!(!walk.completed);
    assert!(is_well_formed(&walked));

    let report = bfs(&walked, &goal, SearchLimits::default()).unwrap();
    let solution = report.solution().unwrap();
    assert!(solution.moves.len() <= walk.steps);
}
