//! Game rules for chess-piece tic-tac-toe.
//!
//! Pure functions over board state. Movement rules live in
//! [`crate::reach`]; this module holds the end-of-game rules.

pub mod win;

pub use win::{LINES, WinningLine, check_lines};
