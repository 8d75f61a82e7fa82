//! Chesstoe - rules engine for chess-piece tic-tac-toe
//!
//! Two colors place Horses, Bishops and Rocks on a 3x3 board, then move
//! them by chess-like rules until one color holds a full line.
//!
//! # Architecture
//!
//! - **Board**: 9 cells with occupancy and per-kind reachability flags
//! - **Reachability**: pure movement rules per piece kind
//! - **Engine**: select/target/cancel state machine with setup and play phases
//! - **Contracts**: preconditions for drops, invariants checked after them
//!
//! # Example
//!
//! ```
//! use chesstoe::{CellId, GameEngine, Intent, PieceId};
//!
//! let mut engine = GameEngine::standard();
//! engine.handle(Intent::SelectPiece { piece: PieceId(0) });
//! let report = engine.handle(Intent::TargetCell { cell: CellId(4) });
//! assert!(report.accepted);
//! assert!(engine.is_occupied(CellId(4)));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod config;
mod contracts;
mod engine;
mod piece;
mod reach;
mod snapshot;
mod types;

pub mod invariants;
pub mod rules;

// Crate-level exports - Intents and verdicts
pub use action::{EngineError, Intent, IntentReport, Transition};

// Crate-level exports - Board and pieces
pub use board::{Board, Cell};
pub use piece::{Piece, PieceSpec};
pub use types::{CellId, Color, KindSet, PieceId, PieceKind};

// Crate-level exports - Movement rules
pub use reach::{BishopRule, HorseRule, MovementRule, ReachabilityCalculator, RockRule};

// Crate-level exports - Engine
pub use contracts::{Contract, LegalTarget, TargetContract};
pub use engine::{GameEngine, Phase};
pub use rules::{WinningLine, check_lines};

// Crate-level exports - Configuration and views
pub use config::{ConfigError, EngineConfig};
pub use snapshot::{CellView, GameSnapshot};
