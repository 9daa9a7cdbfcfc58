//! Sliding-block puzzle model and solver.
//!
//! A [`State`] is a grid of piece ids (`0` empty, `1` wall, `>= 2` movable).
//! [`search`] explores reachable states with breadth-first, depth-first or
//! iterative-deepening search, deduplicating by [`CanonicalKey`].

pub mod error;
pub mod goal;
pub mod key;
pub mod moves;
pub mod render;
pub mod search;
pub mod state;
pub mod walk;

pub use error::PuzzleError;
pub use goal::Goal;
pub use key::CanonicalKey;
pub use moves::{Direction, Move};
pub use search::{solve, Outcome, Report, SearchConfig, SearchLimits, Solution, Strategy};
pub use state::{Cell, PieceId, State};
pub use walk::{random_walk, WalkReport};
