//! The game engine: a select-then-target state machine over one board.
//!
//! A turn is two intents. `select_piece` picks a piece up, `target_cell`
//! drops it. Nothing on the board changes until a drop is accepted, so
//! cancelling a selection never has anything to undo.
//!
//! During [`Phase::Setup`] only pieces still in hand may be picked up, and
//! they may be dropped on any free cell. Once every piece has been placed
//! the engine moves to [`Phase::Play`], where any piece may be picked up
//! but can only be dropped on a cell its movement rule reaches. The first
//! completed line of one color ends the game.

use crate::action::{EngineError, Intent, IntentReport, Transition};
use crate::board::Board;
use crate::config::{ConfigError, EngineConfig, validate_roster};
use crate::contracts::{Contract, TargetContract};
use crate::piece::{Piece, PieceSpec};
use crate::reach::ReachabilityCalculator;
use crate::rules::{WinningLine, check_lines};
use crate::snapshot::GameSnapshot;
use crate::types::{CellId, Color, PieceId, PieceKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Pieces are still being put on the board.
    Setup,
    /// Every piece is on the board; moves follow the movement rules.
    Play,
    /// A line was completed. Only a reset is accepted.
    GameOver,
}

/// Rules engine for one game session.
///
/// Owns the board and the roster. The roster is the lookup table for
/// [`PieceId`]s: a piece's id is its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    pub(crate) board: Board,
    pub(crate) pieces: Vec<Piece>,
    pub(crate) phase: Phase,
    pub(crate) selection: Option<PieceId>,
    pub(crate) winning_line: Option<WinningLine>,
}

impl GameEngine {
    /// Creates a game in setup with one piece per roster entry, all in hand.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the roster is empty or has more pieces than
    /// the board has cells.
    #[instrument(skip(roster), fields(pieces = roster.len()))]
    pub fn new(roster: &[PieceSpec]) -> Result<Self, ConfigError> {
        validate_roster(roster).inspect_err(|e| warn!(error = %e, "Roster rejected"))?;
        Ok(Self::with_roster(roster))
    }

    /// Creates a game with one Horse, Bishop and Rock per color.
    pub fn standard() -> Self {
        Self::with_roster(&PieceSpec::standard_roster())
    }

    /// Creates a game with the configured roster.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured roster is not playable.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        Self::new(config.roster())
    }

    fn with_roster(roster: &[PieceSpec]) -> Self {
        let pieces = roster
            .iter()
            .enumerate()
            .map(|(i, &spec)| Piece::new(PieceId(i), spec))
            .collect();
        info!(pieces = roster.len(), "Starting new game");
        Self {
            board: Board::new(),
            pieces,
            phase: Phase::Setup,
            selection: None,
            winning_line: None,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the roster, indexed by piece id.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Looks up a piece by id.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }

    /// Pieces with the given color and kind, in roster order.
    pub fn pieces_matching(&self, spec: PieceSpec) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(move |p| p.spec() == spec)
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the held piece's id.
    pub fn selection(&self) -> Option<PieceId> {
        self.selection
    }

    /// Returns the held piece.
    pub fn selected_piece(&self) -> Option<&Piece> {
        self.selection.and_then(|id| self.piece(id))
    }

    /// Returns true once a line has been completed.
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Returns the winning color, once the game is over.
    pub fn winner(&self) -> Option<Color> {
        self.winning_line.map(|line| line.color)
    }

    /// Returns the completed line, once the game is over.
    pub fn winning_line(&self) -> Option<WinningLine> {
        self.winning_line
    }

    /// Checks if a piece stands on the cell.
    pub fn is_occupied(&self, cell: CellId) -> bool {
        self.board.is_occupied(cell)
    }

    /// Checks the reachability flag of a cell for a kind.
    ///
    /// Flags are only set while a piece is held during play.
    pub fn is_reachable(&self, cell: CellId, kind: PieceKind) -> bool {
        self.board.is_reachable(cell, kind)
    }

    /// Returns true if every piece has been put on the board.
    pub fn all_placed(&self) -> bool {
        self.pieces.iter().all(Piece::is_placed)
    }

    /// Number of pieces on the board.
    pub fn placed_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_placed()).count()
    }

    /// Serializable view of the current state.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from(self)
    }

    // ─────────────────────────────────────────────────────────────
    //  Intents
    // ─────────────────────────────────────────────────────────────

    /// Picks up a piece.
    ///
    /// During play this also recomputes the board's reachability flags from
    /// the piece's current cell.
    ///
    /// # Errors
    ///
    /// `GameAlreadyOver`, `UnknownPieceId`, `SelectionAlreadyActive`, or during
    /// setup `PieceAlreadyPlaced`.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn select_piece(&mut self, piece: PieceId) -> Result<Transition, EngineError> {
        self.try_select(piece)
            .inspect_err(|e| warn!(%piece, reason = %e, "Selection rejected"))
    }

    fn try_select(&mut self, piece: PieceId) -> Result<Transition, EngineError> {
        if self.is_game_over() {
            return Err(EngineError::GameAlreadyOver);
        }
        let candidate = *self
            .piece(piece)
            .ok_or(EngineError::UnknownPieceId { piece })?;
        if let Some(held) = self.selection {
            return Err(EngineError::SelectionAlreadyActive { held });
        }

        let reachable = match (self.phase, candidate.location()) {
            (Phase::Play, Some(origin)) => {
                ReachabilityCalculator::mark(&mut self.board, origin, candidate.kind())?
            }
            (Phase::Play, None) => {
                return Err(EngineError::InvariantViolation {
                    message: format!("piece {} is in hand during play", piece),
                });
            }
            (_, Some(_)) => return Err(EngineError::PieceAlreadyPlaced { piece }),
            (_, None) => Vec::new(),
        };

        self.selection = Some(piece);
        debug!(%piece, kind = %candidate.kind(), ?reachable, "Piece selected");
        Ok(Transition::Selected { piece, reachable })
    }

    /// Drops the held piece on a cell.
    ///
    /// On success the piece's old cell is cleared before the new one is
    /// set, the selection and reachability flags are cleared, and the board
    /// is checked for a completed line. If that was the last piece in hand,
    /// setup ends and play begins.
    ///
    /// # Errors
    ///
    /// `GameAlreadyOver`, `NoActiveSelection`, `UnknownCellId`, `CellOccupied`,
    /// or during play `MoveNotReachable`.
    #[instrument(skip(self), fields(phase = %self.phase, selection = ?self.selection))]
    pub fn target_cell(&mut self, cell: CellId) -> Result<Transition, EngineError> {
        self.try_target(cell)
            .inspect_err(|e| warn!(%cell, reason = %e, "Target rejected"))
    }

    fn try_target(&mut self, cell: CellId) -> Result<Transition, EngineError> {
        #[cfg(debug_assertions)]
        let before = self.clone();

        TargetContract::pre(self, &cell)?;
        let piece = self.selection.ok_or(EngineError::NoActiveSelection)?;
        let from = self
            .piece(piece)
            .ok_or(EngineError::UnknownPieceId { piece })?
            .location();

        if let Some(from) = from {
            self.board.set_occupant(from, None)?;
        }
        self.board.set_occupant(cell, Some(piece))?;
        if let Some(moved) = self.pieces.get_mut(piece.0) {
            moved.set_location(cell);
        }
        self.selection = None;
        self.board.reset_reachability();
        debug!(%piece, ?from, to = %cell, "Piece dropped");

        if let Some(line) = check_lines(&self.board, &self.pieces) {
            info!(winner = %line.color, cells = ?line.cells, "Line completed, game over");
            self.phase = Phase::GameOver;
            self.winning_line = Some(line);
        } else if self.phase == Phase::Setup && self.all_placed() {
            info!("All pieces are on the board, play begins");
            self.phase = Phase::Play;
        }

        #[cfg(debug_assertions)]
        if let Err(e) = TargetContract::post(&before, self) {
            *self = before;
            return Err(e);
        }

        Ok(Transition::Moved {
            piece,
            from,
            to: cell,
        })
    }

    /// Puts the held piece back. The board is left as it was.
    ///
    /// # Errors
    ///
    /// `NoActiveSelection` if nothing is held.
    #[instrument(skip(self))]
    pub fn cancel_selection(&mut self) -> Result<Transition, EngineError> {
        let Some(piece) = self.selection.take() else {
            warn!("Cancel rejected, nothing is held");
            return Err(EngineError::NoActiveSelection);
        };
        self.board.reset_reachability();
        debug!(%piece, "Selection cancelled");
        Ok(Transition::Cancelled { piece })
    }

    /// Empties the board and returns every piece to hand.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Transition {
        self.board = Board::new();
        for piece in &mut self.pieces {
            piece.return_to_hand();
        }
        self.phase = Phase::Setup;
        self.selection = None;
        self.winning_line = None;
        info!("Game reset");
        Transition::Reset
    }

    /// Handles any intent and reports the verdict.
    #[instrument(skip(self, intent), fields(%intent))]
    pub fn handle(&mut self, intent: Intent) -> IntentReport {
        let result = match intent {
            Intent::SelectPiece { piece } => self.select_piece(piece),
            Intent::TargetCell { cell } => self.target_cell(cell),
            Intent::CancelSelection => self.cancel_selection(),
            Intent::Reset => Ok(self.reset()),
        };

        let (transition, reason) = match result {
            Ok(transition) => (Some(transition), None),
            Err(reason) => (None, Some(reason)),
        };

        IntentReport {
            intent,
            accepted: reason.is_none(),
            reason,
            transition,
            phase: self.phase,
            game_over: self.is_game_over(),
            winner: self.winner(),
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::standard()
    }
}
