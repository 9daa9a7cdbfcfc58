//! Unweighted state-space search over [`State`]s.
//!
//! Every strategy expands states through `possible_moves` and
//! `apply_move_cloning`, tests successors against the [`Goal`] as they are
//! generated, and skips any successor whose [`CanonicalKey`] was already seen.
//! Running out of states is a normal [`Outcome`], not an error.

use std::collections::VecDeque;
use std::fmt;

use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::PuzzleError;
use crate::goal::Goal;
use crate::key::CanonicalKey;
use crate::moves::Move;
use crate::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    BreadthFirst,
    DepthFirst,
    IterativeDeepening,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Strategy::BreadthFirst => "breadth-first",
            Strategy::DepthFirst => "depth-first",
            Strategy::IterativeDeepening => "iterative-deepening",
        };
        write!(f, "{}", s)
    }
}

/// Optional caps for large puzzles. Hitting one yields [`Outcome::Truncated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchLimits {
    /// Maximum number of states expanded, across all deepening rounds.
    pub max_nodes: Option<usize>,
    /// Maximum solution length considered.
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub strategy: Strategy,
    pub limits: SearchLimits,
    pub goal: Goal,
}

/// A complete state together with the moves that reach it from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Labels are those of the start state, never normalized.
    pub state: State,
    pub moves: Vec<Move>,
}

impl Solution {
    /// Re-apply the moves to `start`.
    pub fn replay(&self, start: &State) -> Result<State, PuzzleError> {
        let mut state = start.clone();
        for &mv in &self.moves {
            state.apply_move(mv)?;
        }
        Ok(state)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Solution),
    /// Every reachable state was explored and none is complete.
    Exhausted,
    /// Nothing complete was found within the configured limits.
    Truncated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: usize,
    pub generated: usize,
    pub max_frontier: usize,
    /// Last depth bound tried by iterative deepening.
    pub depth_bound: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub outcome: Outcome,
    pub stats: SearchStats,
}

impl Report {
    pub fn solution(&self) -> Option<&Solution> {
        match &self.outcome {
            Outcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn into_solution(self) -> Option<Solution> {
        match self.outcome {
            Outcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }
}

pub fn solve(start: &State, config: &SearchConfig) -> Result<Report, PuzzleError> {
    info!(
        "{} search on a {}x{} grid, goal {:?}",
        config.strategy,
        start.width(),
        start.height(),
        config.goal
    );
    let report = match config.strategy {
        Strategy::BreadthFirst => bfs(start, &config.goal, config.limits),
        Strategy::DepthFirst => dfs(start, &config.goal, config.limits),
        Strategy::IterativeDeepening => ids(start, &config.goal, config.limits),
    }?;
    let stats = report.stats;
    match &report.outcome {
        Outcome::Solved(solution) => info!(
            "solved in {} moves ({} expanded, {} generated)",
            solution.moves.len(),
            stats.expanded,
            stats.generated
        ),
        Outcome::Exhausted => info!(
            "no solution: space exhausted after {} expansions",
            stats.expanded
        ),
        Outcome::Truncated => info!(
            "no solution within limits {:?} after {} expansions",
            config.limits, stats.expanded
        ),
    }
    Ok(report)
}

// Parent links for path reconstruction. States themselves are not kept.
#[derive(Default)]
struct Trail {
    links: Vec<(Option<usize>, Move)>,
}

impl Trail {
    fn push(&mut self, parent: Option<usize>, mv: Move) -> usize {
        self.links.push((parent, mv));
        self.links.len() - 1
    }

    fn path_to(&self, mut node: Option<usize>, last: Move) -> Vec<Move> {
        let mut moves = vec![last];
        while let Some(index) = node {
            let (parent, mv) = self.links[index];
            moves.push(mv);
            node = parent;
        }
        moves.reverse();
        moves
    }
}

fn successors(state: &State, stats: &mut SearchStats) -> Result<Vec<(Move, State)>, PuzzleError> {
    stats.expanded += 1;
    let next = state
        .possible_moves()
        .into_iter()
        .map(|mv| state.apply_move_cloning(mv).map(|next| (mv, next)))
        .collect::<Result<Vec<_>, PuzzleError>>()?;
    stats.generated += next.len();
    Ok(next)
}

fn out_of_nodes(limits: &SearchLimits, stats: &SearchStats) -> bool {
    limits.max_nodes.is_some_and(|max| stats.expanded >= max)
}

fn at_depth_limit(limits: &SearchLimits, depth: usize) -> bool {
    limits.max_depth.is_some_and(|max| depth >= max)
}

fn finished(outcome: Outcome, stats: SearchStats) -> Report {
    Report { outcome, stats }
}

fn solved(state: State, moves: Vec<Move>, stats: SearchStats) -> Report {
    finished(Outcome::Solved(Solution { state, moves }), stats)
}

/// Breadth-first search. The first solution found has the fewest moves.
pub fn bfs(start: &State, goal: &Goal, limits: SearchLimits) -> Result<Report, PuzzleError> {
    let mut stats = SearchStats::default();
    if goal.is_reached(start) {
        return Ok(solved(start.clone(), Vec::new(), stats));
    }

    let mut trail = Trail::default();
    let mut visited: FxHashSet<CanonicalKey> = FxHashSet::default();
    visited.insert(start.canonical_key());

    let mut frontier = VecDeque::new();
    frontier.push_back((start.clone(), None, 0));
    let mut truncated = false;

    while let Some((state, node, depth)) = frontier.pop_front() {
        if out_of_nodes(&limits, &stats) {
            truncated = true;
            break;
        }
        if at_depth_limit(&limits, depth) {
            truncated = true;
            continue;
        }

        for (mv, next) in successors(&state, &mut stats)? {
            if goal.is_reached(&next) {
                let moves = trail.path_to(node, mv);
                return Ok(solved(next, moves, stats));
            }
            if visited.insert(next.canonical_key()) {
                let child = trail.push(node, mv);
                frontier.push_back((next, Some(child), depth + 1));
            }
        }
        stats.max_frontier = stats.max_frontier.max(frontier.len());
    }

    let outcome = if truncated {
        Outcome::Truncated
    } else {
        Outcome::Exhausted
    };
    Ok(finished(outcome, stats))
}

/// Depth-first search. Terminates on any finite puzzle but the solution is
/// not necessarily the shortest.
pub fn dfs(start: &State, goal: &Goal, limits: SearchLimits) -> Result<Report, PuzzleError> {
    let mut stats = SearchStats::default();
    if goal.is_reached(start) {
        return Ok(solved(start.clone(), Vec::new(), stats));
    }

    let mut trail = Trail::default();
    let mut visited: FxHashSet<CanonicalKey> = FxHashSet::default();
    visited.insert(start.canonical_key());

    let mut stack = vec![(start.clone(), None, 0)];
    let mut truncated = false;

    while let Some((state, node, depth)) = stack.pop() {
        if out_of_nodes(&limits, &stats) {
            truncated = true;
            break;
        }
        if at_depth_limit(&limits, depth) {
            truncated = true;
            continue;
        }

        let mut children = Vec::new();
        for (mv, next) in successors(&state, &mut stats)? {
            if goal.is_reached(&next) {
                let moves = trail.path_to(node, mv);
                return Ok(solved(next, moves, stats));
            }
            if visited.insert(next.canonical_key()) {
                let child = trail.push(node, mv);
                children.push((next, Some(child), depth + 1));
            }
        }
        // Reversed so the first generated move is explored first.
        stack.extend(children.into_iter().rev());
        stats.max_frontier = stats.max_frontier.max(stack.len());
    }

    let outcome = if truncated {
        Outcome::Truncated
    } else {
        Outcome::Exhausted
    };
    Ok(finished(outcome, stats))
}

enum RoundEnd {
    Found(Solution),
    Cutoff,
    Exhausted,
    OutOfNodes,
}

/// Iterative deepening: depth-first rounds with a growing depth bound.
///
/// Finds a shortest solution like [`bfs`] while only keeping one round's
/// visited map alive.
pub fn ids(start: &State, goal: &Goal, limits: SearchLimits) -> Result<Report, PuzzleError> {
    let mut stats = SearchStats::default();
    if goal.is_reached(start) {
        return Ok(solved(start.clone(), Vec::new(), stats));
    }

    let mut bound = 0;
    loop {
        if limits.max_depth.is_some_and(|max| bound > max) {
            return Ok(finished(Outcome::Truncated, stats));
        }
        stats.depth_bound = Some(bound);
        debug!("deepening to bound {bound} ({} expanded so far)", stats.expanded);

        match depth_limited(start, goal, bound, &limits, &mut stats)? {
            RoundEnd::Found(solution) => return Ok(finished(Outcome::Solved(solution), stats)),
            RoundEnd::Exhausted => return Ok(finished(Outcome::Exhausted, stats)),
            RoundEnd::OutOfNodes => return Ok(finished(Outcome::Truncated, stats)),
            RoundEnd::Cutoff => bound += 1,
        }
    }
}

// One deepening round. A state is re-expanded only when reached at a
// shallower depth than before, so no path within the bound is lost.
fn depth_limited(
    start: &State,
    goal: &Goal,
    bound: usize,
    limits: &SearchLimits,
    stats: &mut SearchStats,
) -> Result<RoundEnd, PuzzleError> {
    let mut trail = Trail::default();
    let mut best_depth: FxHashMap<CanonicalKey, usize> = FxHashMap::default();
    best_depth.insert(start.canonical_key(), 0);

    let mut stack = vec![(start.clone(), None, 0)];
    let mut cutoff = false;

    while let Some((state, node, depth)) = stack.pop() {
        if depth >= bound {
            cutoff = true;
            continue;
        }
        if out_of_nodes(limits, stats) {
            return Ok(RoundEnd::OutOfNodes);
        }

        let mut children = Vec::new();
        for (mv, next) in successors(&state, stats)? {
            if goal.is_reached(&next) {
                let moves = trail.path_to(node, mv);
                return Ok(RoundEnd::Found(Solution { state: next, moves }));
            }
            let key = next.canonical_key();
            let shallower = best_depth.get(&key).map_or(true, |&d| depth + 1 < d);
            if shallower {
                best_depth.insert(key, depth + 1);
                let child = trail.push(node, mv);
                children.push((next, Some(child), depth + 1));
            }
        }
        stack.extend(children.into_iter().rev());
        stats.max_frontier = stats.max_frontier.max(stack.len());
    }

    Ok(if cutoff { RoundEnd::Cutoff } else { RoundEnd::Exhausted })
}
