use crate::state::{State, GOAL_PIECE};

/// What counts as a solved board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Goal {
    /// No cell holds the `-1` sentinel ([`State::is_complete`]).
    #[default]
    Sentinel,
    /// The goal piece has its top-left cell at `(row, col)`.
    Target { row: usize, col: usize },
}

impl Goal {
    pub fn is_reached(&self, state: &State) -> bool {
        match *self {
            Goal::Sentinel => state.is_complete(),
            Goal::Target { row, col } => state
                .locate(GOAL_PIECE)
                .is_some_and(|rect| rect.row == row && rect.col == col),
        }
    }
}
