//! Contract-based validation for dropping a piece.
//!
//! Contracts define correctness through preconditions and postconditions:
//! `{P} target_cell {Q}`.

use crate::action::EngineError;
use crate::engine::{GameEngine, Phase};
use crate::invariants::{EngineInvariants, InvariantSet};
use crate::types::CellId;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
///
/// - Precondition: {P(state, action)} - must hold before applying action
/// - Postcondition: {Q(before, after)} - must hold after applying action
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), EngineError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), EngineError>;
}

// ─────────────────────────────────────────────────────────────
//  Target Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the game has not ended.
pub struct GameNotOver;

impl GameNotOver {
    /// Fails with `GameAlreadyOver` once a line is completed.
    pub fn check(engine: &GameEngine) -> Result<(), EngineError> {
        if engine.is_game_over() {
            Err(EngineError::GameAlreadyOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: a piece is held.
pub struct PieceIsHeld;

impl PieceIsHeld {
    /// Fails with `NoActiveSelection` if nothing is held.
    pub fn check(engine: &GameEngine) -> Result<(), EngineError> {
        engine
            .selection()
            .map(|_| ())
            .ok_or(EngineError::NoActiveSelection)
    }
}

/// Precondition: the cell exists.
pub struct CellExists;

impl CellExists {
    /// Fails with `UnknownCellId` outside 0-8.
    pub fn check(cell: CellId) -> Result<(), EngineError> {
        if cell.is_valid() {
            Ok(())
        } else {
            Err(EngineError::UnknownCellId { cell })
        }
    }
}

/// Precondition: no other piece stands on the cell.
pub struct CellIsFree;

impl CellIsFree {
    /// Fails with `CellOccupied` if a piece other than the held one is there.
    pub fn check(cell: CellId, engine: &GameEngine) -> Result<(), EngineError> {
        match engine.board().occupant_at(cell) {
            Some(occupant) if Some(occupant) != engine.selection() => {
                Err(EngineError::CellOccupied { cell, occupant })
            }
            _ => Ok(()),
        }
    }
}

/// Precondition: during play, the held piece's rule reaches the cell.
pub struct CellIsReachable;

impl CellIsReachable {
    /// Fails with `MoveNotReachable` if the cell is not flagged for the held kind.
    ///
    /// Setup places pieces freely, so this always passes outside play.
    pub fn check(cell: CellId, engine: &GameEngine) -> Result<(), EngineError> {
        if engine.phase() != Phase::Play {
            return Ok(());
        }
        match engine.selected_piece() {
            Some(piece) if !engine.is_reachable(cell, piece.kind()) => {
                Err(EngineError::MoveNotReachable {
                    kind: piece.kind(),
                    cell,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Composite precondition for dropping the held piece on a cell.
pub struct LegalTarget;

impl LegalTarget {
    /// Validates all preconditions, in the order rejections are reported.
    #[instrument(skip(engine))]
    pub fn check(cell: CellId, engine: &GameEngine) -> Result<(), EngineError> {
        GameNotOver::check(engine)?;
        PieceIsHeld::check(engine)?;
        CellExists::check(cell)?;
        CellIsFree::check(cell, engine)?;
        CellIsReachable::check(cell, engine)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Target Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for dropping the held piece.
///
/// Preconditions: see [`LegalTarget`].
///
/// Postconditions:
/// - All engine invariants hold
/// - Nothing is held afterwards
/// - At most one more piece is on the board, and none left it
pub struct TargetContract;

impl Contract<GameEngine, CellId> for TargetContract {
    fn pre(engine: &GameEngine, cell: &CellId) -> Result<(), EngineError> {
        LegalTarget::check(*cell, engine)
    }

    fn post(before: &GameEngine, after: &GameEngine) -> Result<(), EngineError> {
        EngineInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(%descriptions, "Postcondition failed");
            EngineError::InvariantViolation {
                message: format!("Postcondition failed: {}", descriptions),
            }
        })?;

        if after.selection().is_some() {
            return Err(EngineError::InvariantViolation {
                message: "Postcondition failed: a piece is still held".to_string(),
            });
        }

        let (was, now) = (before.placed_count(), after.placed_count());
        if now != was && now != was + 1 {
            warn!(was, now, "Placed count changed unexpectedly");
            return Err(EngineError::InvariantViolation {
                message: format!("Postcondition failed: placed count went from {} to {}", was, now),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceId;

    #[test]
    fn test_precondition_requires_selection() {
        let engine = GameEngine::standard();
        assert_eq!(
            TargetContract::pre(&engine, &CellId(4)),
            Err(EngineError::NoActiveSelection)
        );
    }

    #[test]
    fn test_precondition_free_cell() {
        let mut engine = GameEngine::standard();
        engine.select_piece(PieceId(0)).unwrap();
        assert!(TargetContract::pre(&engine, &CellId(4)).is_ok());
    }

    #[test]
    fn test_precondition_occupied_cell() {
        let mut engine = GameEngine::standard();
        engine.select_piece(PieceId(0)).unwrap();
        engine.target_cell(CellId(4)).unwrap();
        engine.select_piece(PieceId(1)).unwrap();

        assert_eq!(
            TargetContract::pre(&engine, &CellId(4)),
            Err(EngineError::CellOccupied {
                cell: CellId(4),
                occupant: PieceId(0),
            })
        );
    }

    #[test]
    fn test_precondition_unknown_cell() {
        let mut engine = GameEngine::standard();
        engine.select_piece(PieceId(0)).unwrap();
        assert_eq!(
            TargetContract::pre(&engine, &CellId(9)),
            Err(EngineError::UnknownCellId { cell: CellId(9) })
        );
    }

    #[test]
    fn test_postcondition_holds_after_drop() {
        let mut engine = GameEngine::standard();
        engine.select_piece(PieceId(0)).unwrap();
        let before = engine.clone();
        engine.target_cell(CellId(4)).unwrap();

        assert!(TargetContract::post(&before, &engine).is_ok());
    }

    #[test]
    fn test_postcondition_detects_corruption() {
        let mut engine = GameEngine::standard();
        engine.select_piece(PieceId(0)).unwrap();
        let before = engine.clone();
        engine.target_cell(CellId(4)).unwrap();

        // Cell forgets its occupant while the piece still points at it.
        engine.board.set_occupant(CellId(4), None).unwrap();
        assert!(matches!(
            TargetContract::post(&before, &engine),
            Err(EngineError::InvariantViolation { .. })
        ));
    }
}
