//! Serializable, read-only view of a game for the presentation layer.

use crate::engine::{GameEngine, Phase};
use crate::piece::Piece;
use crate::rules::WinningLine;
use crate::types::{CellId, KindSet, PieceId};
use serde::{Deserialize, Serialize};

/// State of one cell as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    /// The cell.
    pub cell: CellId,
    /// Piece standing here, if any.
    pub occupant: Option<PieceId>,
    /// Kinds flagged as able to reach this cell.
    pub reachable_by: KindSet,
}

/// Everything a renderer needs to draw the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Held piece, if any.
    pub selection: Option<PieceId>,
    /// Completed line, once the game is over.
    pub winning_line: Option<WinningLine>,
    /// All 9 cells in row-major order.
    pub cells: Vec<CellView>,
    /// The roster, indexed by piece id.
    pub pieces: Vec<Piece>,
}

impl From<&GameEngine> for GameSnapshot {
    fn from(engine: &GameEngine) -> Self {
        let cells = CellId::all()
            .zip(engine.board().cells())
            .map(|(cell, c)| CellView {
                cell,
                occupant: c.occupant(),
                reachable_by: c.reachable_by(),
            })
            .collect();

        Self {
            phase: engine.phase(),
            selection: engine.selection(),
            winning_line: engine.winning_line(),
            cells,
            pieces: engine.pieces().to_vec(),
        }
    }
}

impl GameSnapshot {
    /// Looks up the piece standing on a cell.
    pub fn occupant(&self, cell: CellId) -> Option<&Piece> {
        let id = self.cells.get(cell.index())?.occupant?;
        self.pieces.get(id.0)
    }

    /// Serializes the snapshot as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
