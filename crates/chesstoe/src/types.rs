//! Core domain types for chess-piece tic-tac-toe.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Color of a piece. Three in a row of one color wins.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    /// White pieces.
    White,
    /// Black pieces.
    Black,
}

/// Movement rule a piece follows once the board is in play.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum PieceKind {
    /// Knight-like piece: far cells of opposite parity.
    Horse = 0,
    /// Diagonal mover.
    Bishop = 1,
    /// Rook-like piece: same row or column.
    Rock = 2,
}

impl PieceKind {
    /// Single-bit mask for this kind, used by [`KindSet`].
    #[inline]
    pub(crate) const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Parses a kind name, accepting the chess names as aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "horse" | "knight" | "h" => Some(PieceKind::Horse),
            "bishop" | "b" => Some(PieceKind::Bishop),
            "rock" | "rook" | "r" => Some(PieceKind::Rock),
            _ => None,
        }
    }
}

impl Color {
    /// Parses a color name (`white`/`w`, `black`/`b`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "white" | "w" => Some(Color::White),
            "black" | "b" => Some(Color::Black),
            _ => None,
        }
    }
}

/// Small set of piece kinds, one bit per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KindSet(u8);

impl KindSet {
    /// The empty set.
    pub const EMPTY: KindSet = KindSet(0);

    /// Adds a kind. Inserting twice is a no-op.
    #[inline]
    pub fn insert(&mut self, kind: PieceKind) {
        self.0 |= kind.bit();
    }

    /// Returns true if the kind is in the set.
    #[inline]
    pub fn contains(self, kind: PieceKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Returns true if no kind is in the set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the kinds in the set in declaration order.
    pub fn iter(self) -> impl Iterator<Item = PieceKind> {
        <PieceKind as strum::IntoEnumIterator>::iter().filter(move |k| self.contains(*k))
    }
}

/// Identifier of a piece: its index in the engine's roster.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct PieceId(pub usize);

/// A cell on the 3x3 board (0-8).
///
/// Layout:
/// ```text
///   0 1 2
///   3 4 5
///   6 7 8
/// ```
///
/// The inner value is public so callers can name any index; board
/// operations reject values outside 0-8 with `UnknownCellId`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct CellId(pub u8);

impl CellId {
    /// Cells per side.
    pub const SIDE: u8 = 3;

    /// Number of cells on the board.
    pub const COUNT: usize = 9;

    /// Creates a cell from row and column, or `None` if either is off the board.
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Option<CellId> {
        (row < Self::SIDE && col < Self::SIDE).then(|| CellId(row * Self::SIDE + col))
    }

    /// Row (0-2).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / Self::SIDE
    }

    /// Column (0-2).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % Self::SIDE
    }

    /// Array index of this cell.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks this is a real cell (0-8).
    #[inline]
    pub fn is_valid(self) -> bool {
        (self.0 as usize) < Self::COUNT
    }

    /// Iterate over all 9 cells in row-major order.
    pub fn all() -> impl Iterator<Item = CellId> {
        (0..Self::COUNT as u8).map(CellId)
    }

    /// The cell a quarter turn clockwise about the center, or `None` off the board.
    pub fn rotated(self) -> Option<CellId> {
        if !self.is_valid() {
            return None;
        }
        Self::from_row_col(self.col(), Self::SIDE - 1 - self.row())
    }

    /// The cell mirrored left-to-right, or `None` off the board.
    pub fn mirrored(self) -> Option<CellId> {
        if !self.is_valid() {
            return None;
        }
        Self::from_row_col(self.row(), Self::SIDE - 1 - self.col())
    }

    /// Get label for this cell (for display).
    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "Top-left",
            1 => "Top-center",
            2 => "Top-right",
            3 => "Middle-left",
            4 => "Center",
            5 => "Middle-right",
            6 => "Bottom-left",
            7 => "Bottom-center",
            8 => "Bottom-right",
            _ => "Off-board",
        }
    }

    /// Parse from label or number (0-8).
    ///
    /// Labels are matched case-insensitively, with spaces or underscores
    /// accepted in place of the hyphen.
    #[instrument]
    pub fn from_label_or_number(s: &str) -> Option<CellId> {
        let s = s.trim();
        if let Ok(num) = s.parse::<u8>() {
            let cell = CellId(num);
            return cell.is_valid().then_some(cell);
        }

        let wanted = s.to_lowercase().replace([' ', '_'], "-");
        if wanted == "middle" || wanted == "middle-center" {
            return Some(CellId(4));
        }
        Self::all().find(|cell| cell.label().to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_col_round_trip() {
        for cell in CellId::all() {
            assert_eq!(CellId::from_row_col(cell.row(), cell.col()), Some(cell));
        }
        assert_eq!(CellId::from_row_col(3, 0), None);
    }

    #[test]
    fn test_rotation_has_order_four() {
        for cell in CellId::all() {
            let turned = cell
                .rotated()
                .and_then(CellId::rotated)
                .and_then(CellId::rotated)
                .and_then(CellId::rotated);
            assert_eq!(turned, Some(cell));
        }
        assert_eq!(CellId(0).rotated(), Some(CellId(2)));
        assert_eq!(CellId(4).rotated(), Some(CellId(4)));
    }

    #[test]
    fn test_off_board_cells_have_no_image() {
        for cell in [CellId(9), CellId(255)] {
            assert_eq!(cell.rotated(), None);
            assert_eq!(cell.mirrored(), None);
        }
        assert_eq!(CellId(3).mirrored(), Some(CellId(5)));
    }

    #[test]
    fn test_labels_parse() {
        assert_eq!(CellId::from_label_or_number("4"), Some(CellId(4)));
        assert_eq!(CellId::from_label_or_number("center"), Some(CellId(4)));
        assert_eq!(CellId::from_label_or_number("Top left"), Some(CellId(0)));
        assert_eq!(CellId::from_label_or_number("bottom_right"), Some(CellId(8)));
        assert_eq!(CellId::from_label_or_number("9"), None);
        assert_eq!(CellId::from_label_or_number("left"), None);
    }

    #[test]
    fn test_kind_set_insert_is_idempotent() {
        let mut set = KindSet::EMPTY;
        set.insert(PieceKind::Rock);
        set.insert(PieceKind::Rock);
        assert!(set.contains(PieceKind::Rock));
        assert!(!set.contains(PieceKind::Horse));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![PieceKind::Rock]);
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!(PieceKind::parse("rook"), Some(PieceKind::Rock));
        assert_eq!(PieceKind::parse("Knight"), Some(PieceKind::Horse));
        assert_eq!(Color::parse("B"), Some(Color::Black));
        assert_eq!(PieceKind::Bishop.to_string(), "bishop");
    }
}
