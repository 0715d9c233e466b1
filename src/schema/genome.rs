//! Move and genome types.

use serde::{Deserialize, Serialize};

/// A single step on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Every move, in sampling order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Unit offset `(dx, dy)` of this move.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Move::Up => (0, 1),
            Move::Down => (0, -1),
            Move::Left => (-1, 0),
            Move::Right => (1, 0),
        }
    }
}

/// An ordered sequence of moves describing one candidate path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome {
    moves: Vec<Move>,
}

impl Genome {
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn moves_mut(&mut self) -> &mut [Move] {
        &mut self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn into_moves(self) -> Vec<Move> {
        self.moves
    }
}

impl From<Vec<Move>> for Genome {
    fn from(moves: Vec<Move>) -> Self {
        Self::new(moves)
    }
}

impl FromIterator<Move> for Genome {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
