//! Pieces and roster entries.

use crate::types::{CellId, Color, PieceId, PieceKind};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Roster entry: what kind of piece to create, and for which side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceSpec {
    /// Side the piece plays for.
    pub color: Color,
    /// Movement rule of the piece.
    pub kind: PieceKind,
}

impl PieceSpec {
    /// Creates a roster entry.
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// One Horse, Bishop and Rock per color, white first.
    pub fn standard_roster() -> Vec<PieceSpec> {
        Color::iter()
            .flat_map(|color| PieceKind::iter().map(move |kind| PieceSpec::new(color, kind)))
            .collect()
    }

    /// Parses `<color>-<kind>`, e.g. `white-rock` or `b-knight`.
    pub fn parse(s: &str) -> Option<Self> {
        let (color, kind) = s.trim().split_once(['-', ' ', '_'])?;
        Some(Self::new(Color::parse(color)?, PieceKind::parse(kind)?))
    }
}

impl std::fmt::Display for PieceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.color, self.kind)
    }
}

/// A piece in play: on the board, or still in hand.
///
/// A piece that has been placed once stays on the board for the rest of the
/// game, so `location` doubles as the "placed" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    color: Color,
    kind: PieceKind,
    location: Option<CellId>,
}

impl Piece {
    /// Creates an unplaced piece.
    pub fn new(id: PieceId, spec: PieceSpec) -> Self {
        Self {
            id,
            color: spec.color,
            kind: spec.kind,
            location: None,
        }
    }

    /// The piece's id.
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// The piece's color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The piece's movement rule.
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Color and kind as a roster entry.
    pub fn spec(&self) -> PieceSpec {
        PieceSpec::new(self.color, self.kind)
    }

    /// Cell the piece stands on, or `None` while in hand.
    pub fn location(&self) -> Option<CellId> {
        self.location
    }

    /// Returns true once the piece has been put on the board.
    pub fn is_placed(&self) -> bool {
        self.location.is_some()
    }

    pub(crate) fn set_location(&mut self, cell: CellId) {
        self.location = Some(cell);
    }

    pub(crate) fn return_to_hand(&mut self) {
        self.location = None;
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.id, self.spec())
    }
}
