use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use rustc_hash::FxHashSet;

use crate::error::PuzzleError;
use crate::key::CanonicalKey;
use crate::moves::{Direction, Move};

/// Raw grid label.
pub type Cell = i32;
/// Label of a movable piece (`>= 2`).
pub type PieceId = Cell;

pub const EMPTY: Cell = 0;
pub const WALL: Cell = 1;
/// Never renumbered by [`State::normalize`].
pub const GOAL_PIECE: PieceId = 2;
/// A state holding this value anywhere is not complete.
pub const SENTINEL: Cell = -1;

/// Bounding rectangle of a piece, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
}

/// A board configuration: one contiguous row-major grid of labels.
///
/// Pieces are not stored separately. A piece is every cell carrying the same
/// id `>= 2`, and is assumed (not checked) to form a single rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl State {
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, PuzzleError> {
        if width == 0 || height == 0 {
            return Err(PuzzleError::malformed(
                1,
                format!("grid must not be empty, got {width}x{height}"),
            ));
        }
        let expected = cell_count(width, height)?;
        if cells.len() != expected {
            return Err(PuzzleError::malformed(
                1,
                format!(
                    "expected {expected} cells for a {width}x{height} grid, got {}",
                    cells.len()
                ),
            ));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, PuzzleError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(cell_count(width, height)?);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(PuzzleError::malformed(
                    y + 2,
                    format!("expected {width} values, found {}", row.len()),
                ));
            }
            cells.extend(row);
        }
        Self::new(width, height, cells)
    }

    /// Load a state from a `w,h,` grid file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PuzzleError> {
        fs::read_to_string(path)?.parse()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major view of the backing grid.
    pub fn grid(&self) -> &[Cell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.width + col]
    }

    fn set(&mut self, row: usize, col: usize, value: Cell) {
        self.cells[row * self.width + col] = value;
    }

    /// Distinct labels in row-major first-appearance order.
    pub fn labels(&self) -> Vec<Cell> {
        let mut seen = FxHashSet::default();
        self.cells
            .iter()
            .copied()
            .filter(|&id| seen.insert(id))
            .collect()
    }

    /// Bounding rectangle of `piece`, measured from its top-left cell.
    pub fn locate(&self, piece: PieceId) -> Option<Rect> {
        let start = self.cells.iter().position(|&c| c == piece)?;
        let (row, col) = (start / self.width, start % self.width);

        let height = (row..self.height)
            .take_while(|&y| self.cell(y, col) == piece)
            .count();
        let width = (col..self.width)
            .take_while(|&x| self.cell(row, x) == piece)
            .count();

        Some(Rect {
            row,
            col,
            width,
            height,
        })
    }

    // A piece may shift when it is not on that edge and every cell it
    // would enter is empty.
    fn can_shift(&self, rect: Rect, direction: Direction) -> bool {
        let Rect {
            row,
            col,
            width,
            height,
        } = rect;
        match direction {
            Direction::Up => row > 0 && (col..col + width).all(|x| self.cell(row - 1, x) == EMPTY),
            Direction::Down => {
                row + height < self.height
                    && (col..col + width).all(|x| self.cell(row + height, x) == EMPTY)
            }
            Direction::Left => {
                col > 0 && (row..row + height).all(|y| self.cell(y, col - 1) == EMPTY)
            }
            Direction::Right => {
                col + width < self.width
                    && (row..row + height).all(|y| self.cell(y, col + width) == EMPTY)
            }
        }
    }

    fn moves_in(&self, piece: PieceId, rect: Rect) -> impl Iterator<Item = Move> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |&dir| self.can_shift(rect, dir))
            .map(move |dir| Move::new(dir, piece))
    }

    /// Legal moves of a single piece, in `UP, DOWN, LEFT, RIGHT` order.
    ///
    /// Empty cells and walls never move. Any other id that does not occur in
    /// the grid is reported as [`PuzzleError::PieceNotFound`].
    pub fn moves_for(&self, piece: PieceId) -> Result<Vec<Move>, PuzzleError> {
        if piece < GOAL_PIECE {
            return Ok(Vec::new());
        }
        let rect = self
            .locate(piece)
            .ok_or(PuzzleError::PieceNotFound(piece))?;
        Ok(self.moves_in(piece, rect).collect())
    }

    /// Legal moves of every piece, pieces taken in first-appearance order.
    pub fn possible_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for piece in self.labels() {
            if piece < GOAL_PIECE {
                continue;
            }
            if let Some(rect) = self.locate(piece) {
                moves.extend(self.moves_in(piece, rect));
            }
        }
        moves
    }

    /// Shift the piece one cell in place. Vacated cells become empty.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), PuzzleError> {
        let piece = mv.piece();
        if piece < GOAL_PIECE {
            return Err(PuzzleError::IllegalMove(mv));
        }
        let rect = self
            .locate(piece)
            .ok_or(PuzzleError::PieceNotFound(piece))?;
        if !self.can_shift(rect, mv.direction()) {
            return Err(PuzzleError::IllegalMove(mv));
        }
        self.shift(piece, rect, mv.direction());
        Ok(())
    }

    fn shift(&mut self, piece: PieceId, rect: Rect, direction: Direction) {
        let Rect {
            row,
            col,
            width,
            height,
        } = rect;
        match direction {
            Direction::Up => {
                for x in col..col + width {
                    self.set(row - 1, x, piece);
                    self.set(row + height - 1, x, EMPTY);
                }
            }
            Direction::Down => {
                for x in col..col + width {
                    self.set(row + height, x, piece);
                    self.set(row, x, EMPTY);
                }
            }
            Direction::Left => {
                for y in row..row + height {
                    self.set(y, col - 1, piece);
                    self.set(y, col + width - 1, EMPTY);
                }
            }
            Direction::Right => {
                for y in row..row + height {
                    self.set(y, col + width, piece);
                    self.set(y, col, EMPTY);
                }
            }
        }
    }

    /// Apply `mv` to a copy, leaving `self` untouched.
    pub fn apply_move_cloning(&self, mv: Move) -> Result<State, PuzzleError> {
        let mut next = self.clone();
        next.apply_move(mv)?;
        Ok(next)
    }

    pub fn is_complete(&self) -> bool {
        !self.cells.contains(&SENTINEL)
    }

    /// Renumber pieces `>= 3` in row-major first-appearance order.
    pub fn normalize(&mut self) {
        let mut next = GOAL_PIECE + 1;
        for i in 0..self.cells.len() {
            let id = self.cells[i];
            if id == next {
                next += 1;
            } else if id > next {
                self.swap_ids(next, id);
                next += 1;
            }
        }
    }

    fn swap_ids(&mut self, a: PieceId, b: PieceId) {
        for cell in self.cells.iter_mut() {
            if *cell == a {
                *cell = b;
            } else if *cell == b {
                *cell = a;
            }
        }
    }

    pub fn canonical_key(&self) -> CanonicalKey {
        CanonicalKey::of(self)
    }
}

fn parse_values(line: usize, text: &str) -> Result<Vec<Cell>, PuzzleError> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<Cell>()
                .map_err(|e| PuzzleError::malformed(line, format!("invalid value '{token}': {e}")))
        })
        .collect()
}

fn cell_count(width: usize, height: usize) -> Result<usize, PuzzleError> {
    width.checked_mul(height).ok_or_else(|| {
        PuzzleError::malformed(1, format!("a {width}x{height} grid is too large"))
    })
}

fn parse_dimension(line: usize, value: Cell, what: &str) -> Result<usize, PuzzleError> {
    match usize::try_from(value) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(PuzzleError::malformed(
            line,
            format!("{what} must be positive, got {value}"),
        )),
    }
}

impl FromStr for State {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().enumerate().map(|(i, line)| (i + 1, line.trim()));

        let (_, header) = lines
            .next()
            .ok_or_else(|| PuzzleError::malformed(1, "missing dimensions line"))?;
        let dims = parse_values(1, header)?;
        let (width, height) = match dims[..] {
            [w, h] => (
                parse_dimension(1, w, "width")?,
                parse_dimension(1, h, "height")?,
            ),
            _ => {
                return Err(PuzzleError::malformed(
                    1,
                    format!("expected 'width,height,', found {} values", dims.len()),
                ))
            }
        };

        cell_count(width, height)?;
        // Allocation follows the rows actually read.
        let mut cells = Vec::new();
        for y in 0..height {
            let (line_no, line) = lines.next().ok_or_else(|| {
                PuzzleError::malformed(y + 2, format!("expected {height} rows, found {y}"))
            })?;
            let values = parse_values(line_no, line)?;
            if values.len() != width {
                return Err(PuzzleError::malformed(
                    line_no,
                    format!("expected {width} values, found {}", values.len()),
                ));
            }
            cells.reserve(width);
            cells.extend(values);
        }

        if let Some((line_no, _)) = lines.find(|(_, line)| !line.is_empty()) {
            return Err(PuzzleError::malformed(
                line_no,
                format!("unexpected row after {height} rows"),
            ));
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},", self.width, self.height)?;
        for row in self.rows() {
            writeln!(f)?;
            for value in row {
                write!(f, "{},", value)?;
            }
        }
        Ok(())
    }
}
