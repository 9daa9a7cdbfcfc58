use std::fmt;

use crate::state::PieceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Generation order used by `State::possible_moves`.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row/column offset of a one-cell shift.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        };
        write!(f, "{}", s)
    }
}

/// Shift of one piece by one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    direction: Direction,
    piece: PieceId,
}

impl Move {
    pub fn new(direction: Direction, piece: PieceId) -> Self {
        Self { direction, piece }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn piece(&self) -> PieceId {
        self.piece
    }

    /// The move that undoes this one.
    pub fn reversed(&self) -> Self {
        Self::new(self.direction.opposite(), self.piece)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move {{direction: {}, piece: {}}}",
            self.direction, self.piece
        )
    }
}
