//! Occupancy invariant: cells and pieces agree on who stands where.

use super::Invariant;
use crate::engine::GameEngine;
use crate::types::CellId;

/// Invariant: occupancy back-references agree.
///
/// Every placed piece's cell names that piece as its occupant, and every
/// occupied cell names a piece whose location is that cell. Together these
/// mean no cell holds two pieces and no piece stands on two cells.
pub struct OccupancyInvariant;

impl Invariant<GameEngine> for OccupancyInvariant {
    fn holds(engine: &GameEngine) -> bool {
        let board = engine.board();

        let pieces_agree = engine.pieces().iter().all(|piece| match piece.location() {
            Some(cell) => board.occupant_at(cell) == Some(piece.id()),
            None => true,
        });

        let cells_agree = CellId::all().all(|cell| match board.occupant_at(cell) {
            Some(id) => engine.piece(id).and_then(|p| p.location()) == Some(cell),
            None => true,
        });

        pieces_agree && cells_agree
    }

    fn description() -> &'static str {
        "Cell occupants and piece locations reference each other"
    }
}
