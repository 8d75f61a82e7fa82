//! Selection invariant: what may be held, and when flags may be set.

use super::Invariant;
use crate::engine::{GameEngine, Phase};

/// Invariant: the selection is well formed.
///
/// A held piece exists in the roster, nothing is held once the game is over,
/// a piece held during setup is still in hand, and reachability flags are
/// only present while a piece is held during play.
pub struct SelectionInvariant;

impl Invariant<GameEngine> for SelectionInvariant {
    fn holds(engine: &GameEngine) -> bool {
        let held_ok = match (engine.selection(), engine.phase()) {
            (None, _) => true,
            (Some(_), Phase::GameOver) => false,
            (Some(id), Phase::Setup) => engine.piece(id).is_some_and(|p| !p.is_placed()),
            (Some(id), Phase::Play) => engine.piece(id).is_some(),
        };

        let flags_ok = !engine.board().has_reachability()
            || (engine.phase() == Phase::Play && engine.selection().is_some());

        held_ok && flags_ok
    }

    fn description() -> &'static str {
        "Selection refers to a selectable piece and flags exist only while holding in play"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellId, PieceId, PieceKind};

    #[test]
    fn test_holding_in_hand_piece_holds() {
        let mut engine = GameEngine::standard();
        engine.select_piece(PieceId(4)).unwrap();
        assert!(SelectionInvariant::holds(&engine));
    }

    #[test]
    fn test_stale_flags_violate() {
        let mut engine = GameEngine::standard();
        engine.board.mark_reachable(CellId(1), PieceKind::Rock).unwrap();
        assert!(!SelectionInvariant::holds(&engine));
    }

    #[test]
    fn test_unknown_selection_violates() {
        let mut engine = GameEngine::standard();
        engine.selection = Some(PieceId(17));
        assert!(!SelectionInvariant::holds(&engine));
    }
}
