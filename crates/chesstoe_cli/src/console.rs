//! Line-oriented console: parses commands, forwards intents, renders the board.

use anyhow::Result;
use chesstoe::{
    CellId, Color, ConfigError, EngineConfig, GameEngine, Intent, IntentReport, Phase, Piece,
    PieceId, PieceKind, PieceSpec,
};
use derive_more::Display;
use std::io::{BufRead, Write};
use tracing::{debug, info, instrument};

const HELP: &str = "\
Commands:
  select <piece>   pick up a piece by id (0, 1, ...) or name (white-rock)
  target <cell>    drop the held piece on a cell (0-8 or top-left ... bottom-right)
  cancel           put the held piece back
  reset            start a new game
  board            show the board
  reach            show where the held piece may go
  pieces           list the roster
  help             show this message
  quit             leave";

/// A piece as typed by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceRef {
    /// Roster index.
    Id(PieceId),
    /// Color and kind; resolved against the roster.
    Named(PieceSpec),
}

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick up a piece.
    Select(PieceRef),
    /// Drop the held piece.
    Target(CellId),
    /// Put the held piece back.
    Cancel,
    /// New game.
    Reset,
    /// Print the board.
    Board,
    /// Print reachable cells for the held piece.
    Reach,
    /// Print the roster.
    Pieces,
    /// Print usage.
    Help,
    /// Stop reading input.
    Quit,
}

/// A line the console could not understand.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum CommandError {
    /// First word is not a command.
    #[display("Unknown command '{}', try 'help'", _0)]
    UnknownCommand(String),
    /// Command needs an argument.
    #[display("'{}' needs an argument", _0)]
    MissingArgument(&'static str),
    /// Argument is not a piece.
    #[display("'{}' is not a piece id or name like white-rock", _0)]
    BadPiece(String),
    /// Argument is not a cell.
    #[display("'{}' is not a cell (0-8 or a label like top-left)", _0)]
    BadCell(String),
}

impl std::error::Error for CommandError {}

impl Command {
    /// Parses one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));

        let command = match word.to_lowercase().as_str() {
            "select" | "s" => Command::Select(parse_piece(rest, "select")?),
            "target" | "t" => Command::Target(parse_cell(rest, "target")?),
            "cancel" | "c" => Command::Cancel,
            "reset" => Command::Reset,
            "board" | "b" => Command::Board,
            "reach" | "r" => Command::Reach,
            "pieces" | "p" => Command::Pieces,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => return Err(CommandError::UnknownCommand(word.to_string())),
        };
        Ok(Some(command))
    }
}

fn parse_piece(arg: &str, command: &'static str) -> Result<PieceRef, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    if let Ok(id) = arg.parse::<usize>() {
        return Ok(PieceRef::Id(PieceId(id)));
    }
    PieceSpec::parse(arg)
        .map(PieceRef::Named)
        .ok_or_else(|| CommandError::BadPiece(arg.to_string()))
}

fn parse_cell(arg: &str, command: &'static str) -> Result<CellId, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    CellId::from_label_or_number(arg).ok_or_else(|| CommandError::BadCell(arg.to_string()))
}

/// Whether the console keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop.
    Quit,
}

/// Console session over one engine.
#[derive(Debug)]
pub struct Console {
    engine: GameEngine,
    restart_on_win: bool,
    json: bool,
}

impl Console {
    /// Creates a console for a fresh game.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured roster is not playable.
    pub fn new(config: &EngineConfig, json: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: GameEngine::from_config(config)?,
            restart_on_win: *config.restart_on_win(),
            json,
        })
    }

    /// Returns the engine.
    #[cfg(test)]
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Reads commands until `quit` or end of input.
    ///
    /// Unparseable lines are reported and skipped.
    #[instrument(skip(self, input, out))]
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
        interactive: bool,
    ) -> Result<()> {
        if interactive && !self.json {
            writeln!(out, "{}\n", HELP)?;
            writeln!(out, "{}", render_board(&self.engine))?;
        }

        let mut lines = input.lines();
        loop {
            if interactive {
                write!(out, "> ")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;

            match Command::parse(&line) {
                Ok(Some(command)) => {
                    if self.execute(command, out)? == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => writeln!(out, "{}", e)?,
            }
        }
        info!("Console closed");
        Ok(())
    }

    /// Executes one command, writing its output.
    #[instrument(skip(self, out))]
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::Select(piece) => match self.resolve(piece) {
                Some(id) => self.submit(Intent::SelectPiece { piece: id }, out)?,
                None => writeln!(out, "No piece matches {}", describe(piece))?,
            },
            Command::Target(cell) => self.submit(Intent::TargetCell { cell }, out)?,
            Command::Cancel => self.submit(Intent::CancelSelection, out)?,
            Command::Reset => self.submit(Intent::Reset, out)?,
            Command::Board => writeln!(out, "{}", render_board(&self.engine))?,
            Command::Reach => writeln!(out, "{}", render_reach(&self.engine))?,
            Command::Pieces => writeln!(out, "{}", render_pieces(&self.engine))?,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Resolves a typed piece to a roster id.
    ///
    /// Named pieces pick the first match in roster order; during setup,
    /// pieces still in hand are preferred. Numeric ids pass through so the
    /// engine can reject unknown ones.
    fn resolve(&self, piece: PieceRef) -> Option<PieceId> {
        match piece {
            PieceRef::Id(id) => Some(id),
            PieceRef::Named(spec) => {
                let mut matching = self.engine.pieces_matching(spec).peekable();
                let first = matching.peek().map(|p| p.id());
                let preferred = if self.engine.phase() == Phase::Setup {
                    matching.find(|p| !p.is_placed()).map(Piece::id)
                } else {
                    None
                };
                preferred.or(first)
            }
        }
    }

    fn submit<W: Write>(&mut self, intent: Intent, out: &mut W) -> Result<()> {
        let report = self.engine.handle(intent);
        debug!(accepted = report.accepted, "Intent handled");
        self.print_report(&report, out)?;

        if report.ended_game() && self.restart_on_win {
            info!("Restarting after win");
            let report = self.engine.handle(Intent::Reset);
            self.print_report(&report, out)?;
        }
        Ok(())
    }

    fn print_report<W: Write>(&self, report: &IntentReport, out: &mut W) -> Result<()> {
        if self.json {
            writeln!(out, "{}", serde_json::to_string(report)?)?;
            return Ok(());
        }

        writeln!(out, "{}", report)?;
        if report.accepted {
            writeln!(out, "{}", render_board(&self.engine))?;
        }
        Ok(())
    }
}

fn describe(piece: PieceRef) -> String {
    match piece {
        PieceRef::Id(id) => id.to_string(),
        PieceRef::Named(spec) => spec.to_string(),
    }
}

/// Two-letter symbol such as `wR` or `bH`.
fn symbol(piece: &Piece) -> String {
    let color = match piece.color() {
        Color::White => 'w',
        Color::Black => 'b',
    };
    let kind = match piece.kind() {
        PieceKind::Horse => 'H',
        PieceKind::Bishop => 'B',
        PieceKind::Rock => 'R',
    };
    format!("{}{}", color, kind)
}

/// Renders the grid.
///
/// Empty cells show their number, `+` marks cells the held piece may
/// reach, and `*` marks the held piece.
pub fn render_board(engine: &GameEngine) -> String {
    let held = engine.selected_piece();
    let mut result = String::new();
    for row in 0..CellId::SIDE {
        for col in 0..CellId::SIDE {
            let Some(cell) = CellId::from_row_col(row, col) else {
                continue;
            };
            let occupant = engine
                .board()
                .occupant_at(cell)
                .and_then(|id| engine.piece(id));
            let text = match occupant {
                Some(piece) if Some(piece.id()) == held.map(Piece::id) => {
                    format!("*{}", symbol(piece))
                }
                Some(piece) => format!(" {}", symbol(piece)),
                None if held.is_some_and(|p| engine.is_reachable(cell, p.kind())) => {
                    format!(" +{}", cell)
                }
                None => format!("  {}", cell),
            };
            result.push_str(&text);
            if col < CellId::SIDE - 1 {
                result.push_str(" |");
            }
        }
        if row < CellId::SIDE - 1 {
            result.push_str("\n----+----+----\n");
        }
    }

    result.push_str(&format!("\nphase: {}", engine.phase()));
    if let Some(piece) = held {
        result.push_str(&format!(", holding {}", piece));
    }
    if let Some(winner) = engine.winner() {
        result.push_str(&format!(", {} wins", winner));
    }
    result
}

fn render_reach(engine: &GameEngine) -> String {
    let Some(piece) = engine.selected_piece() else {
        return "No piece is selected".to_string();
    };
    if engine.phase() != Phase::Play {
        return format!("{} may go to any free cell", piece);
    }
    let cells = engine.board().reachable_cells(piece.kind());
    if cells.is_empty() {
        return format!("{} cannot move", piece);
    }
    let names = cells
        .iter()
        .map(|c| format!("{} ({})", c, c.label()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} may go to {}", piece, names)
}

fn render_pieces(engine: &GameEngine) -> String {
    engine
        .pieces()
        .iter()
        .map(|p| match p.location() {
            Some(cell) => format!("{} on {} ({})", p, cell, cell.label()),
            None => format!("{} in hand", p),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(console: &mut Console, script: &str) -> String {
        let mut out = Vec::new();
        console
            .run(Cursor::new(script.to_string()), &mut out, false)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("select 2"),
            Ok(Some(Command::Select(PieceRef::Id(PieceId(2)))))
        );
        assert_eq!(
            Command::parse("  select White-Rock "),
            Ok(Some(Command::Select(PieceRef::Named(PieceSpec::new(
                Color::White,
                PieceKind::Rock
            )))))
        );
        assert_eq!(
            Command::parse("target center"),
            Ok(Some(Command::Target(CellId(4))))
        );
        assert_eq!(Command::parse("t 8"), Ok(Some(Command::Target(CellId(8)))));
        assert_eq!(Command::parse("cancel"), Ok(Some(Command::Cancel)));
        assert_eq!(Command::parse("QUIT"), Ok(Some(Command::Quit)));
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("# opening"), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("castle"),
            Err(CommandError::UnknownCommand("castle".to_string()))
        );
        assert_eq!(
            Command::parse("select"),
            Err(CommandError::MissingArgument("select"))
        );
        assert_eq!(
            Command::parse("target middle-top"),
            Err(CommandError::BadCell("middle-top".to_string()))
        );
        assert_eq!(
            Command::parse("select white-queen"),
            Err(CommandError::BadPiece("white-queen".to_string()))
        );
    }

    #[test]
    fn test_named_piece_prefers_one_in_hand() {
        let roster = vec![PieceSpec::new(Color::Black, PieceKind::Horse); 2];
        let config = EngineConfig::new(roster, false).unwrap();
        let mut console = Console::new(&config, false).unwrap();
        run_script(&mut console, "select black-horse\ntarget 0\nselect black-horse\n");

        assert_eq!(console.engine().selection(), Some(PieceId(1)));
    }

    #[test]
    fn test_script_plays_to_a_win() {
        let mut console = Console::new(&EngineConfig::default(), false).unwrap();
        let output = run_script(
            &mut console,
            "select white-horse\ntarget 0\n\
             select white-bishop\ntarget center\n\
             select white-rock\ntarget bottom-right\n",
        );

        assert!(output.contains("target cell 8: accepted, white wins"));
        assert!(console.engine().is_game_over());
    }

    #[test]
    fn test_restart_on_win() {
        let config = EngineConfig::new(PieceSpec::standard_roster(), true).unwrap();
        let mut console = Console::new(&config, false).unwrap();
        let output = run_script(
            &mut console,
            "select 0\ntarget 0\nselect 1\ntarget 4\nselect 2\ntarget 8\n",
        );

        assert!(output.contains("white wins"));
        assert!(output.contains("reset: accepted"));
        assert_eq!(console.engine().phase(), Phase::Setup);
        assert_eq!(console.engine().placed_count(), 0);
    }

    #[test]
    fn test_rejection_is_printed() {
        let mut console = Console::new(&EngineConfig::default(), false).unwrap();
        let output = run_script(&mut console, "target 3\n");
        assert!(output.contains("rejected (No piece is selected)"));
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut console = Console::new(&EngineConfig::default(), false).unwrap();
        run_script(&mut console, "quit\nselect 0\n");
        assert_eq!(console.engine().selection(), None);
    }

    #[test]
    fn test_json_output() {
        let mut console = Console::new(&EngineConfig::default(), true).unwrap();
        let output = run_script(&mut console, "select 0\n");
        let value: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(value["accepted"], true);
        assert_eq!(value["transition"]["transition"], "selected");
    }

    #[test]
    fn test_render_board_marks_reach() {
        let roster = vec![
            PieceSpec::new(Color::White, PieceKind::Rock),
            PieceSpec::new(Color::Black, PieceKind::Bishop),
        ];
        let mut engine = GameEngine::new(&roster).unwrap();
        for (piece, cell) in [(0, 0), (1, 4)] {
            engine.select_piece(PieceId(piece)).unwrap();
            engine.target_cell(CellId(cell)).unwrap();
        }
        engine.select_piece(PieceId(0)).unwrap();

        let board = render_board(&engine);
        assert!(board.starts_with("*wR | +1 | +2"));
        assert!(board.contains(" bB"));
        assert!(board.contains("  5"));
        assert!(board.contains("phase: play, holding 0 white-rock"));
    }

    #[test]
    fn test_render_reach_in_setup() {
        let mut engine = GameEngine::standard();
        engine.select_piece(PieceId(0)).unwrap();
        assert_eq!(render_reach(&engine), "0 white-horse may go to any free cell");
    }
}
