use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A cell of the 8x8 grid. Row 0 is Black's back rank, row 7 is White's;
/// column 0 is the a-file.
///
/// A `Square` can only be built in range, so indexing the board with one
/// never fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(i32, i32)", into = "(usize, usize)")]
pub struct Square {
    row: usize,
    col: usize,
}

impl Square {
    /// Validate raw coordinates coming from outside the engine.
    pub fn new(row: i32, col: i32) -> Result<Square, Error> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Ok(Square {
                row: row as usize,
                col: col as usize,
            })
        } else {
            Err(Error::OutOfRange { row, col })
        }
    }

    /// Internal constructor for coordinates already known to be on the board.
    pub(crate) const fn at(row: usize, col: usize) -> Square {
        debug_assert!(row < 8 && col < 8);
        Square { row, col }
    }

    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }

    /// The square `(dr, dc)` away, or `None` if that falls off the board.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Square> {
        Square::new(self.row as i32 + dr, self.col as i32 + dc).ok()
    }

    /// True if the two squares touch, including diagonally.
    pub fn is_adjacent(self, other: Square) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }

    /// All 64 squares, row by row.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8).flat_map(|row| (0..8).map(move |col| Square { row, col }))
    }
}

impl TryFrom<(i32, i32)> for Square {
    type Error = Error;

    fn try_from((row, col): (i32, i32)) -> Result<Self, Self::Error> {
        Square::new(row, col)
    }
}

impl From<Square> for (usize, usize) {
    fn from(sq: Square) -> Self {
        (sq.row, sq.col)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
