//! Win detection: three pieces of one color in a line.

use crate::board::Board;
use crate::piece::Piece;
use crate::types::{CellId, Color};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The 8 lines, in the order they are checked.
pub const LINES: [[CellId; 3]; 8] = [
    // Rows
    [CellId(0), CellId(1), CellId(2)],
    [CellId(3), CellId(4), CellId(5)],
    [CellId(6), CellId(7), CellId(8)],
    // Columns
    [CellId(0), CellId(3), CellId(6)],
    [CellId(1), CellId(4), CellId(7)],
    [CellId(2), CellId(5), CellId(8)],
    // Diagonals
    [CellId(0), CellId(4), CellId(8)],
    [CellId(2), CellId(4), CellId(6)],
];

/// A completed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningLine {
    /// Color holding all three cells.
    pub color: Color,
    /// The three cells.
    pub cells: [CellId; 3],
}

/// Finds the first completed line.
///
/// Rows are checked top to bottom, then columns left to right, then the two
/// diagonals; the first line whose three cells hold pieces of one color wins.
/// Occupants are looked up in `pieces` by id.
#[instrument(skip_all)]
pub fn check_lines(board: &Board, pieces: &[Piece]) -> Option<WinningLine> {
    let color_at = |cell: CellId| -> Option<Color> {
        let id = board.occupant_at(cell)?;
        pieces.get(id.0).map(Piece::color)
    };

    LINES.iter().find_map(|&[a, b, c]| {
        let color = color_at(a)?;
        (color_at(b)? == color && color_at(c)? == color).then_some(WinningLine {
            color,
            cells: [a, b, c],
        })
    })
}
