//! The 3x3 board: cell occupancy and transient reachability flags.
//!
//! Cells refer to their occupant by [`PieceId`] only. The engine's roster is
//! the lookup table that turns an id back into a piece.

use crate::action::EngineError;
use crate::types::{CellId, KindSet, PieceId, PieceKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// One cell of the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Piece standing on this cell, if any.
    occupant: Option<PieceId>,
    /// Kinds that may move here from the currently held piece's cell.
    reachable_by: KindSet,
}

impl Cell {
    /// Piece standing on this cell.
    pub fn occupant(&self) -> Option<PieceId> {
        self.occupant
    }

    /// Kinds currently flagged as able to reach this cell.
    pub fn reachable_by(&self) -> KindSet {
        self.reachable_by
    }

    /// Checks if a piece stands on this cell.
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// 3x3 board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; CellId::COUNT],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::default(); CellId::COUNT],
        }
    }

    /// Gets the cell with the given id.
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index())
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell; CellId::COUNT] {
        &self.cells
    }

    /// Checks if a piece stands on the cell. Unknown cells are never occupied.
    pub fn is_occupied(&self, id: CellId) -> bool {
        self.cell(id).is_some_and(Cell::is_occupied)
    }

    /// Returns the piece standing on the cell.
    pub fn occupant_at(&self, id: CellId) -> Option<PieceId> {
        self.cell(id).and_then(Cell::occupant)
    }

    /// Sets or clears the occupant of a cell.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownCellId` if `id` is outside 0-8.
    #[instrument(skip(self))]
    pub fn set_occupant(
        &mut self,
        id: CellId,
        occupant: Option<PieceId>,
    ) -> Result<(), EngineError> {
        let cell = self
            .cells
            .get_mut(id.index())
            .ok_or(EngineError::UnknownCellId { cell: id })?;
        cell.occupant = occupant;
        trace!(cell = %id, ?occupant, "Occupant set");
        Ok(())
    }

    /// Clears every reachability flag on every cell.
    pub fn reset_reachability(&mut self) {
        for cell in &mut self.cells {
            cell.reachable_by = KindSet::EMPTY;
        }
        debug!("All cell reachability flags reset");
    }

    /// Flags a cell as reachable by a kind. Flagging twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownCellId` if `id` is outside 0-8.
    pub fn mark_reachable(&mut self, id: CellId, kind: PieceKind) -> Result<(), EngineError> {
        let cell = self
            .cells
            .get_mut(id.index())
            .ok_or(EngineError::UnknownCellId { cell: id })?;
        cell.reachable_by.insert(kind);
        Ok(())
    }

    /// Checks the reachability flag of a cell for a kind.
    pub fn is_reachable(&self, id: CellId, kind: PieceKind) -> bool {
        self.cell(id).is_some_and(|c| c.reachable_by.contains(kind))
    }

    /// Cells currently flagged for a kind, in row-major order.
    pub fn reachable_cells(&self, kind: PieceKind) -> Vec<CellId> {
        CellId::all().filter(|&c| self.is_reachable(c, kind)).collect()
    }

    /// Checks whether any cell carries a reachability flag.
    pub fn has_reachability(&self) -> bool {
        self.cells.iter().any(|c| !c.reachable_by.is_empty())
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(CellId::all().all(|c| !board.is_occupied(c)));
        assert!(!board.has_reachability());
    }

    #[test]
    fn test_set_occupant_rejects_unknown_cell() {
        let mut board = Board::new();
        assert_eq!(
            board.set_occupant(CellId(9), Some(PieceId(0))),
            Err(EngineError::UnknownCellId { cell: CellId(9) })
        );
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_set_and_clear_occupant() {
        let mut board = Board::new();
        board.set_occupant(CellId(4), Some(PieceId(2))).unwrap();
        assert!(board.is_occupied(CellId(4)));
        assert_eq!(board.occupant_at(CellId(4)), Some(PieceId(2)));

        board.set_occupant(CellId(4), None).unwrap();
        assert!(!board.is_occupied(CellId(4)));
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_reset_reachability_twice_matches_once() {
        let mut board = Board::new();
        board.mark_reachable(CellId(1), PieceKind::Rock).unwrap();
        board.mark_reachable(CellId(8), PieceKind::Bishop).unwrap();

        board.reset_reachability();
        let once = board.clone();
        board.reset_reachability();

        assert_eq!(board, once);
        assert!(!board.has_reachability());
    }

    #[test]
    fn test_mark_reachable_is_per_kind() {
        let mut board = Board::new();
        board.mark_reachable(CellId(2), PieceKind::Horse).unwrap();
        board.mark_reachable(CellId(2), PieceKind::Horse).unwrap();

        assert!(board.is_reachable(CellId(2), PieceKind::Horse));
        assert!(!board.is_reachable(CellId(2), PieceKind::Rock));
        assert_eq!(board.reachable_cells(PieceKind::Horse), vec![CellId(2)]);
        assert!(board.mark_reachable(CellId(12), PieceKind::Horse).is_err());
    }
}
