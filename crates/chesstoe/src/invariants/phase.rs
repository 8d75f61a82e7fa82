//! Phase invariant: the phase matches the roster and the board.

use super::Invariant;
use crate::engine::{GameEngine, Phase};
use crate::rules::check_lines;

/// Invariant: the phase is consistent with the position.
///
/// - Setup and Play have no completed line
/// - Play only starts once every piece is on the board
/// - GameOver records exactly the first completed line on the board
pub struct PhaseInvariant;

impl Invariant<GameEngine> for PhaseInvariant {
    fn holds(engine: &GameEngine) -> bool {
        let line = check_lines(engine.board(), engine.pieces());
        match engine.phase() {
            Phase::Setup => engine.winning_line().is_none() && line.is_none(),
            Phase::Play => engine.all_placed() && engine.winning_line().is_none() && line.is_none(),
            Phase::GameOver => engine.winning_line().is_some() && engine.winning_line() == line,
        }
    }

    fn description() -> &'static str {
        "Phase matches roster placement and completed lines"
    }
}
