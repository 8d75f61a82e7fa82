//! Reachability rules for each piece kind.
//!
//! Rules are pure geometry over the 3x3 index space. Occupancy does not
//! block a rule; occupied destinations are refused separately when a piece
//! is dropped.

use crate::action::EngineError;
use crate::board::Board;
use crate::types::{CellId, PieceKind};
use tracing::{debug, instrument};

/// A movement rule: which cells a piece standing on `origin` may move to.
pub trait MovementRule {
    /// Checks whether `target` is a legal destination from `origin`.
    ///
    /// Implementations never accept `origin` itself.
    fn reaches(origin: CellId, target: CellId) -> bool;

    /// All legal destinations from `origin`, in row-major order.
    fn destinations(origin: CellId) -> Vec<CellId> {
        if !origin.is_valid() {
            return Vec::new();
        }
        CellId::all().filter(|&t| Self::reaches(origin, t)).collect()
    }
}

/// Row and column offsets from `origin` to `target`, as absolute values.
#[inline]
fn distance(origin: CellId, target: CellId) -> (u8, u8) {
    (
        origin.row().abs_diff(target.row()),
        origin.col().abs_diff(target.col()),
    )
}

/// Rook rule: any other cell in the same row or column.
pub struct RockRule;

impl MovementRule for RockRule {
    fn reaches(origin: CellId, target: CellId) -> bool {
        origin != target && (origin.row() == target.row() || origin.col() == target.col())
    }
}

/// Bishop rule: any other cell on a diagonal through the origin.
pub struct BishopRule;

impl MovementRule for BishopRule {
    fn reaches(origin: CellId, target: CellId) -> bool {
        let (dr, dc) = distance(origin, target);
        origin != target && dr == dc
    }
}

/// Horse rule for the 3x3 board.
///
/// The target must not touch the origin (Chebyshev distance at least 2) and
/// its 1-based cell number must have the opposite parity to the origin's.
/// This is not chess-knight geometry in general; on this board it is the
/// rule the game uses.
pub struct HorseRule;

impl MovementRule for HorseRule {
    fn reaches(origin: CellId, target: CellId) -> bool {
        let (dr, dc) = distance(origin, target);
        if dr <= 1 && dc <= 1 {
            return false;
        }
        let origin_even = (origin.0 + 1) % 2 == 0;
        let target_even = (target.0 + 1) % 2 == 0;
        origin_even != target_even
    }
}

/// Maps a piece kind to its movement rule.
pub struct ReachabilityCalculator;

impl ReachabilityCalculator {
    /// Legal destinations for `kind` standing on `origin`.
    ///
    /// An origin outside 0-8 has no destinations.
    pub fn destinations(origin: CellId, kind: PieceKind) -> Vec<CellId> {
        match kind {
            PieceKind::Rock => RockRule::destinations(origin),
            PieceKind::Bishop => BishopRule::destinations(origin),
            PieceKind::Horse => HorseRule::destinations(origin),
        }
    }

    /// Checks a single origin/target pair for `kind`.
    pub fn reaches(origin: CellId, target: CellId, kind: PieceKind) -> bool {
        if !origin.is_valid() || !target.is_valid() {
            return false;
        }
        match kind {
            PieceKind::Rock => RockRule::reaches(origin, target),
            PieceKind::Bishop => BishopRule::reaches(origin, target),
            PieceKind::Horse => HorseRule::reaches(origin, target),
        }
    }

    /// Clears the board's flags, then flags every destination of `kind` from `origin`.
    ///
    /// Returns the flagged cells.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownCellId` if `origin` is outside 0-8.
    #[instrument(skip(board))]
    pub fn mark(
        board: &mut Board,
        origin: CellId,
        kind: PieceKind,
    ) -> Result<Vec<CellId>, EngineError> {
        if !origin.is_valid() {
            return Err(EngineError::UnknownCellId { cell: origin });
        }
        board.reset_reachability();
        let cells = Self::destinations(origin, kind);
        for &cell in &cells {
            board.mark_reachable(cell, kind)?;
        }
        debug!(origin = %origin, %kind, count = cells.len(), "Reachability marked");
        Ok(cells)
    }
}
