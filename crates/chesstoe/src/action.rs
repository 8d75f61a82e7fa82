//! First-class intents and their verdicts.
//!
//! The presentation layer never mutates the board directly. It resolves its
//! own input into an [`Intent`], hands it to the engine, and renders the
//! [`IntentReport`] it gets back.

use crate::engine::Phase;
use crate::types::{CellId, Color, PieceId, PieceKind};
use serde::{Deserialize, Serialize};

/// Something a player asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Pick up a piece.
    SelectPiece {
        /// The piece to hold.
        piece: PieceId,
    },
    /// Drop the held piece on a cell.
    TargetCell {
        /// The destination.
        cell: CellId,
    },
    /// Put the held piece back without moving it.
    CancelSelection,
    /// Start a new game with the same roster.
    Reset,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::SelectPiece { piece } => write!(f, "select piece {}", piece),
            Intent::TargetCell { cell } => write!(f, "target cell {}", cell),
            Intent::CancelSelection => write!(f, "cancel selection"),
            Intent::Reset => write!(f, "reset"),
        }
    }
}

/// Reason an intent was refused. The engine is unchanged after any of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EngineError {
    /// No piece with this id is in the roster.
    #[display("Unknown piece {}", piece)]
    UnknownPieceId {
        /// The id that was asked for.
        piece: PieceId,
    },

    /// The cell id is outside 0-8.
    #[display("Unknown cell {}", cell)]
    UnknownCellId {
        /// The id that was asked for.
        cell: CellId,
    },

    /// A cell was targeted while no piece is held.
    #[display("No piece is selected")]
    NoActiveSelection,

    /// Another piece already stands on the cell.
    #[display("Cell {} is occupied by piece {}", cell, occupant)]
    CellOccupied {
        /// The targeted cell.
        cell: CellId,
        /// The piece standing there.
        occupant: PieceId,
    },

    /// The held piece's rule does not reach the cell.
    #[display("A {} cannot move to cell {}", kind, cell)]
    MoveNotReachable {
        /// Kind of the held piece.
        kind: PieceKind,
        /// The targeted cell.
        cell: CellId,
    },

    /// A line has been completed; only a reset is accepted.
    #[display("Game is already over")]
    GameAlreadyOver,

    /// A piece is already held.
    #[display("Piece {} is already selected", held)]
    SelectionAlreadyActive {
        /// The piece currently held.
        held: PieceId,
    },

    /// During setup only pieces still in hand can be picked up.
    #[display("Piece {} is already on the board", piece)]
    PieceAlreadyPlaced {
        /// The piece that was asked for.
        piece: PieceId,
    },

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", message)]
    InvariantViolation {
        /// Which invariants failed.
        message: String,
    },
}

impl std::error::Error for EngineError {}

/// What an accepted intent changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum Transition {
    /// A piece is now held.
    Selected {
        /// The held piece.
        piece: PieceId,
        /// Cells the piece may move to; empty during setup, where any free cell is allowed.
        reachable: Vec<CellId>,
    },
    /// The held piece was dropped on a cell.
    Moved {
        /// The piece that moved.
        piece: PieceId,
        /// Where it stood before, or `None` if it came from hand.
        from: Option<CellId>,
        /// Where it stands now.
        to: CellId,
    },
    /// The held piece was put back.
    Cancelled {
        /// The piece that was held.
        piece: PieceId,
    },
    /// The board and roster were reset.
    Reset,
}

/// Verdict for one intent, shaped for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentReport {
    /// The intent that was handled.
    pub intent: Intent,
    /// Whether the engine accepted it.
    pub accepted: bool,
    /// Why it was refused, if it was.
    pub reason: Option<EngineError>,
    /// What changed, if it was accepted.
    pub transition: Option<Transition>,
    /// Phase after handling.
    pub phase: Phase,
    /// Whether the game is over after handling.
    pub game_over: bool,
    /// Winning color, once the game is over.
    pub winner: Option<Color>,
}

impl IntentReport {
    /// Returns true if this intent ended the game.
    pub fn ended_game(&self) -> bool {
        self.game_over && matches!(self.transition, Some(Transition::Moved { .. }))
    }
}

impl std::fmt::Display for IntentReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.reason, self.winner) {
            (Some(reason), _) => write!(f, "{}: rejected ({})", self.intent, reason),
            (None, Some(winner)) if self.game_over => {
                write!(f, "{}: accepted, {} wins", self.intent, winner)
            }
            (None, _) => write!(f, "{}: accepted [{}]", self.intent, self.phase),
        }
    }
}
