//! The game-state engine: turns, selection, placement, captures, wins and undo.
//!
//! # Lifecycle
//!
//! ```text
//! Active(black) --place, no win--> Active(white) --place, no win--> Active(black) ...
//! Active(p)     --place, line of c-->  Ended(c)
//! Active(p)     --undo-->              Active(other(p))
//! any           --reset-->             Active(black)
//! ```
//!
//! Undo restores the board only. Spent pieces stay spent and captured pieces
//! stay destroyed, and an ended game can only be left through `reset`.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{Board, Color, GameConfig, Inventory, Piece, Pos, Size};

/// Whether placements are still accepted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Ended { winner: Color },
}

impl GameStatus {
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, GameStatus::Active)
    }

    #[inline]
    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Active => None,
            GameStatus::Ended { winner } => Some(winner),
        }
    }
}

/// What a cell held before a placement overwrote it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
pub struct HistoryEntry {
    pub pos: Pos,
    pub previous: Option<Piece>,
}

/// Rejected operations. None of them change engine state.
///
/// The `Display` text is the status line shown to the players.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum EngineError {
    #[error("The game is over, reset to play again.")]
    GameInactive,
    #[error("It is not {color}'s turn.")]
    WrongTurn { color: Color, current: Color },
    #[error("No {piece} pieces left.")]
    PieceExhausted { piece: Piece },
    #[error("Select a piece first.")]
    NoPieceSelected,
    #[error("A {piece} piece cannot capture a {occupant} piece.")]
    IllegalCapture {
        piece: Piece,
        occupant: Piece,
        pos: Pos,
    },
    #[error("Nothing to undo.")]
    NothingToUndo,
}

/// Outcome of a successful operation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Event {
    /// A piece was chosen and waits for a cell.
    Selected { piece: Piece },
    /// A piece was placed and the turn passed to `next`.
    Placed {
        piece: Piece,
        pos: Pos,
        captured: Option<Piece>,
        next: Color,
    },
    /// A piece was placed and completed `line`.
    Won {
        piece: Piece,
        pos: Pos,
        captured: Option<Piece>,
        winner: Color,
        line: [Pos; 3],
    },
    /// The last placement was taken back; `restored` is back in the cell.
    Undone {
        pos: Pos,
        restored: Option<Piece>,
        next: Color,
    },
    Reset { first: Color },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Selected { piece } => write!(f, "Selected {piece}."),
            Event::Placed { next, .. } => write!(f, "{} to move.", capitalized(*next)),
            Event::Won { winner, .. } => {
                write!(f, "{} wins! Reset to play again.", capitalized(*winner))
            }
            Event::Undone { next, .. } => write!(f, "Move undone, {next} to move."),
            Event::Reset { first } => write!(f, "Game reset, {first} moves first."),
        }
    }
}

fn capitalized(color: Color) -> &'static str {
    match color {
        Color::Black => "Black",
        Color::White => "White",
    }
}

/// Everything the presentation layer needs to redraw after a call.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Snapshot {
    pub board: Board,
    pub status: GameStatus,
    pub current_player: Color,
    pub inventory: Inventory,
    pub selected: Option<Piece>,
    pub history_len: usize,
    pub winning_line: Option<[Pos; 3]>,
}

/// A single game session.
#[derive(Clone, Debug)]
pub struct GameEngine {
    config: GameConfig,
    board: Board,
    inventory: Inventory,
    current: Color,
    selected: Option<Piece>,
    history: Vec<HistoryEntry>,
    status: GameStatus,
}

impl GameEngine {
    /// Create a standard game with black to move.
    pub fn new() -> GameEngine {
        GameEngine::with_config(GameConfig::default())
    }

    /// Create a game whose reserves (and every reset) follow `config`.
    pub fn with_config(config: GameConfig) -> GameEngine {
        GameEngine {
            config,
            board: Board::new(),
            inventory: Inventory::new(config.starting_reserve),
            current: Color::Black,
            selected: None,
            history: Vec::new(),
            status: GameStatus::Active,
        }
    }

    // ========== Queries ==========

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Occupant of a cell. Panics if `pos` is off the board.
    #[inline]
    pub fn cell(&self, pos: Pos) -> Option<Piece> {
        self.board.cell(pos)
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.current
    }

    #[inline]
    pub fn selected(&self) -> Option<Piece> {
        self.selected
    }

    #[inline]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    #[inline]
    pub fn remaining(&self, color: Color, size: Size) -> u8 {
        self.inventory.remaining(Piece::new(color, size))
    }

    /// Placements since the last reset that have not been undone, oldest first.
    #[inline]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The line that ended the game, if it has ended.
    pub fn winning_line(&self) -> Option<[Pos; 3]> {
        if self.status.is_active() {
            return None;
        }
        self.board.winning_line().map(|(_, line)| line)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            status: self.status,
            current_player: self.current,
            inventory: self.inventory,
            selected: self.selected,
            history_len: self.history.len(),
            winning_line: self.winning_line(),
        }
    }

    // ========== Operations ==========

    /// Choose the piece the current player will place next.
    ///
    /// Replaces any earlier selection. Nothing is spent until the piece lands.
    #[instrument(level = "debug", skip(self), fields(current = %self.current))]
    pub fn select_piece(&mut self, color: Color, size: Size) -> Result<Event, EngineError> {
        self.ensure_active()?;

        if color != self.current {
            debug!("selection out of turn");
            return Err(EngineError::WrongTurn {
                color,
                current: self.current,
            });
        }

        let piece = Piece::new(color, size);
        if self.inventory.remaining(piece) == 0 {
            debug!("selection of an exhausted size");
            return Err(EngineError::PieceExhausted { piece });
        }

        self.selected = Some(piece);
        Ok(Event::Selected { piece })
    }

    /// Place the selected piece at `pos`, capturing a strictly smaller occupant.
    ///
    /// A rejected capture keeps the selection so another cell can be tried.
    /// Panics if `pos` is off the board.
    #[instrument(level = "debug", skip(self), fields(current = %self.current))]
    pub fn place_piece(&mut self, pos: Pos) -> Result<Event, EngineError> {
        self.ensure_active()?;

        let Some(piece) = self.selected else {
            debug!("placement without a selection");
            return Err(EngineError::NoPieceSelected);
        };

        let previous = self.board.cell(pos);
        if let Some(occupant) = previous {
            if !piece.size.can_capture(occupant.size) {
                debug!(%piece, %occupant, "capture refused");
                return Err(EngineError::IllegalCapture {
                    piece,
                    occupant,
                    pos,
                });
            }
        }

        self.history.push(HistoryEntry { pos, previous });
        self.board.set_cell(pos, Some(piece));
        self.inventory.take(piece);
        self.selected = None;

        if let Some((winner, line)) = self.board.winning_line() {
            self.status = GameStatus::Ended { winner };
            info!(%winner, ?line, moves = self.history.len(), "game won");
            return Ok(Event::Won {
                piece,
                pos,
                captured: previous,
                winner,
                line,
            });
        }

        self.current = self.current.other();
        debug!(%piece, captured = ?previous, next = %self.current, "piece placed");
        Ok(Event::Placed {
            piece,
            pos,
            captured: previous,
            next: self.current,
        })
    }

    /// Take back the most recent placement.
    ///
    /// Puts the previous occupant back and hands the turn back. The spent
    /// piece is not refunded and the selection is left as it is.
    #[instrument(level = "debug", skip(self), fields(current = %self.current))]
    pub fn undo_last(&mut self) -> Result<Event, EngineError> {
        self.ensure_active()?;

        let Some(entry) = self.history.pop() else {
            debug!("undo with empty history");
            return Err(EngineError::NothingToUndo);
        };

        self.board.set_cell(entry.pos, entry.previous);
        self.current = self.current.other();
        debug!(pos = entry.pos.0, next = %self.current, "placement undone");
        Ok(Event::Undone {
            pos: entry.pos,
            restored: entry.previous,
            next: self.current,
        })
    }

    /// Start over from the configured reserves with black to move.
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) -> Event {
        *self = GameEngine::with_config(self.config);
        info!("game reset");
        Event::Reset {
            first: self.current,
        }
    }

    fn ensure_active(&self) -> Result<(), EngineError> {
        if self.status.is_active() {
            Ok(())
        } else {
            debug!(status = ?self.status, "game already ended");
            Err(EngineError::GameInactive)
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}
