use std::io::Write;

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::PuzzleError;
use crate::goal::Goal;
use crate::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkReport {
    /// Moves actually applied.
    pub steps: usize,
    pub completed: bool,
}

/// Apply up to `steps` uniformly random legal moves to `state`.
///
/// The starting state is printed first, then each move followed by the
/// resulting state. After every move the state is normalized, so the walk
/// runs over canonical labelings. It stops early once `goal` is reached or
/// when no piece can move.
pub fn random_walk<R, W>(
    state: &mut State,
    steps: usize,
    goal: &Goal,
    rng: &mut R,
    out: &mut W,
) -> Result<WalkReport, PuzzleError>
where
    R: Rng + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "{}", state)?;
    if goal.is_reached(state) {
        return Ok(WalkReport {
            steps: 0,
            completed: true,
        });
    }

    let mut taken = 0;
    let mut moves = state.possible_moves();
    while taken < steps {
        let Some(&mv) = moves.choose(rng) else {
            trace!("walk stuck after {taken} moves");
            break;
        };
        state.apply_move(mv)?;
        taken += 1;

        writeln!(out, "{}", mv)?;
        writeln!(out, "{}", state)?;
        trace!("walk step {taken}: {mv}");

        state.normalize();
        if goal.is_reached(state) {
            return Ok(WalkReport {
                steps: taken,
                completed: true,
            });
        }
        moves = state.possible_moves();
    }

    Ok(WalkReport {
        steps: taken,
        completed: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const OPEN: &str = "3,3,\n1,-1,1,\n0,4,0,\n3,0,0,";

    fn walk(seed: u64, steps: usize) -> (State, WalkReport, String) {
        let mut state: State = OPEN.parse().unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut out = Vec::new();
        let report =
            random_walk(&mut state, steps, &Goal::Sentinel, &mut rng, &mut out).unwrap();
        (state, report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn same_seed_same_walk() {
        let (a, report_a, out_a) = walk(7, 50);
        let (b, report_b, out_b) = walk(7, 50);
        assert_eq!(a, b);
        assert_eq!(report_a, report_b);
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn walk_respects_step_cap_and_keeps_normal_form() {
        let (state, report, out) = walk(3, 25);
        assert_eq!(report.steps, 25);
        assert!(!report.completed);
        assert_eq!(out.matches("Move {").count(), 25);

        let mut normalized = state.clone();
        normalized.normalize();
        assert_eq!(state, normalized);
    }

    #[test]
    fn complete_state_prints_once_and_stops() {
        let mut state: State = "2,1,\n2,0,".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Vec::new();
        let report =
            random_walk(&mut state, 10, &Goal::Sentinel, &mut rng, &mut out).unwrap();
        assert_eq!(
            report,
            WalkReport {
                steps: 0,
                completed: true
            }
        );
        assert_eq!(String::from_utf8(out).unwrap(), "2,1,\n2,0,\n");
    }

    #[test]
    fn walk_stops_on_target() {
        let mut state: State = "2,1,\n2,0,".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Vec::new();
        let goal = Goal::Target { row: 0, col: 1 };
        let report = random_walk(&mut state, 10, &goal, &mut rng, &mut out).unwrap();
        assert_eq!(
            report,
            WalkReport {
                steps: 1,
                completed: true
            }
        );
        assert_eq!(state.grid(), &[0, 2]);
    }

    #[test]
    fn stuck_board_ends_the_walk() {
        let mut state: State = "2,1,\n-1,1,".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Vec::new();
        let report =
            random_walk(&mut state, 10, &Goal::Sentinel, &mut rng, &mut out).unwrap();
        assert_eq!(report.steps, 0);
        assert!(!report.completed);
    }
}
