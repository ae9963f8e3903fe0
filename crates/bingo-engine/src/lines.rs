//! Win detection over the 12 fixed bingo lines

use serde::{Deserialize, Serialize};

use crate::board::{BOARD_SIZE, CellState};

/// Which kind of line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineKind {
    Row { row: u8 },
    Column { col: u8 },
    /// Top-left to bottom-right
    Diagonal,
    /// Top-right to bottom-left
    AntiDiagonal,
}

/// A winning line: five cell indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub kind: LineKind,
    pub cells: [usize; BOARD_SIZE],
}

impl Line {
    /// Row `r`: `r*5 .. r*5+4`
    pub const fn row(r: usize) -> Self {
        let s = r * BOARD_SIZE;
        Self {
            kind: LineKind::Row { row: r as u8 },
            cells: [s, s + 1, s + 2, s + 3, s + 4],
        }
    }

    /// Column `c`: `c, c+5, c+10, c+15, c+20`
    pub const fn column(c: usize) -> Self {
        Self {
            kind: LineKind::Column { col: c as u8 },
            cells: [c, c + 5, c + 10, c + 15, c + 20],
        }
    }

    /// Is every cell of this line marked
    pub fn is_complete(&self, marks: &CellState) -> bool {
        self.cells.iter().all(|&i| marks.is_marked(i))
    }

    /// Marked cells on this line
    pub fn marked_count(&self, marks: &CellState) -> usize {
        self.cells.iter().filter(|&&i| marks.is_marked(i)).count()
    }
}

/// All 12 lines: 5 rows, 5 columns, 2 diagonals
pub const LINES: [Line; 12] = [
    Line::row(0),
    Line::row(1),
    Line::row(2),
    Line::row(3),
    Line::row(4),
    Line::column(0),
    Line::column(1),
    Line::column(2),
    Line::column(3),
    Line::column(4),
    Line {
        kind: LineKind::Diagonal,
        cells: [0, 6, 12, 18, 24],
    },
    Line {
        kind: LineKind::AntiDiagonal,
        cells: [4, 8, 12, 16, 20],
    },
];

/// True iff at least one line is fully marked
pub fn has_win(marks: &CellState) -> bool {
    LINES.iter().any(|line| line.is_complete(marks))
}

/// Every complete line, in [`LINES`] order
pub fn winning_lines(marks: &CellState) -> Vec<Line> {
    LINES
        .iter()
        .filter(|line| line.is_complete(marks))
        .copied()
        .collect()
}

/// Fewest unmarked cells standing between the marks and a bingo
pub fn cells_to_win(marks: &CellState) -> usize {
    LINES
        .iter()
        .map(|line| BOARD_SIZE - line.marked_count(marks))
        .min()
        .unwrap_or(BOARD_SIZE)
}
