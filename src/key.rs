use crate::state::{Cell, State};

/// Label-independent fingerprint of a [`State`].
///
/// Built from a normalized clone, so two states that differ only in how their
/// pieces (other than the goal piece) are numbered share a key. The source
/// state is never modified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey {
    width: usize,
    cells: Box<[Cell]>,
}

impl CanonicalKey {
    pub fn of(state: &State) -> Self {
        let mut normalized = state.clone();
        normalized.normalize();
        Self {
            width: state.width(),
            cells: normalized.grid().into(),
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
