//! Gobblet Gobblers rules engine.
//!
//! Two players, black and white, take turns placing pieces from a limited
//! inventory onto a 3x3 board. A piece may land on an empty cell or on top of
//! a strictly smaller piece of either color, which is captured and leaves
//! play for good. Three same-colored occupants in a row win.
//!
//! # Board Layout
//!
//! ```text
//! Cell indices (row-major order):
//!   (0,0)=0  (0,1)=1  (0,2)=2
//!   (1,0)=3  (1,1)=4  (1,2)=5
//!   (2,0)=6  (2,1)=7  (2,2)=8
//!
//! Each cell holds at most one piece: Option<Piece>.
//! ```
//!
//! # Starting Reserve (per color)
//!
//! ```text
//! small: 3   medium: 3   large: 2
//! ```
//!
//! The state machine lives in [`GameEngine`]; everything in this module is
//! plain value types it is built from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod engine;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use engine::{EngineError, Event, GameEngine, GameStatus, HistoryEntry, Snapshot};

/// Piece color. Black moves first.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Get the other color.
    #[inline]
    pub fn other(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Both colors, black first.
    pub fn all() -> impl Iterator<Item = Color> {
        [Color::Black, Color::White].into_iter()
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Piece size, ordered small < medium < large.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    /// Capture rank: small=1, medium=2, large=3.
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            Size::Small => 1,
            Size::Medium => 2,
            Size::Large => 3,
        }
    }

    /// Check if this size can capture (cover) another size.
    #[inline]
    pub fn can_capture(self, other: Size) -> bool {
        self.rank() > other.rank()
    }

    /// Get all sizes as an iterator, smallest first.
    pub fn all() -> impl Iterator<Item = Size> {
        [Size::Small, Size::Medium, Size::Large].into_iter()
    }

    pub fn name(self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure to read a color or size name coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown color: {0:?}")]
    UnknownColor(String),
    #[error("Unknown size: {0:?}")]
    UnknownSize(String),
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" => Ok(Color::Black),
            "white" => Ok(Color::White),
            _ => Err(ParseError::UnknownColor(s.to_string())),
        }
    }
}

impl FromStr for Size {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Size::Small),
            "medium" => Ok(Size::Medium),
            "large" => Ok(Size::Large),
            _ => Err(ParseError::UnknownSize(s.to_string())),
        }
    }
}

/// A single piece. Pieces are values; the board copies them around.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub size: Size,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, size: Size) -> Piece {
        Piece { color, size }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.size)
    }
}

/// Position on the 3x3 board (0-8).
///
/// Layout:
/// ```text
///   0 1 2
///   3 4 5
///   6 7 8
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pos(pub u8);

impl Pos {
    /// Create a position from row and column (0-2 each).
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Pos {
        debug_assert!(row < 3 && col < 3);
        Pos(row * 3 + col)
    }

    /// Get the row (0-2).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    /// Get the column (0-2).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % 3
    }

    /// Check if this is a valid position (0-8).
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 < 9
    }

    /// Iterate over all 9 positions.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..9).map(Pos)
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The 3x3 board. Each cell holds its single current occupant, if any.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Board([Option<Piece>; 9]);

impl Board {
    /// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
    /// Scanned in this order; the first complete line decides the winner.
    pub const WIN_LINES: [[Pos; 3]; 8] = [
        [Pos(0), Pos(1), Pos(2)], // Row 0
        [Pos(3), Pos(4), Pos(5)], // Row 1
        [Pos(6), Pos(7), Pos(8)], // Row 2
        [Pos(0), Pos(3), Pos(6)], // Col 0
        [Pos(1), Pos(4), Pos(7)], // Col 1
        [Pos(2), Pos(5), Pos(8)], // Col 2
        [Pos(0), Pos(4), Pos(8)], // Main diagonal
        [Pos(2), Pos(4), Pos(6)], // Anti-diagonal
    ];

    /// Create an empty board.
    #[inline]
    pub fn new() -> Board {
        Board([None; 9])
    }

    /// Get the occupant of a cell.
    ///
    /// Panics if `pos` is off the board.
    #[inline]
    pub fn cell(&self, pos: Pos) -> Option<Piece> {
        self.0[pos.index()]
    }

    /// Overwrite a cell, returning what was there before.
    /// Does NOT validate - caller must ensure the placement is legal.
    #[inline]
    pub fn set_cell(&mut self, pos: Pos, occupant: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.0[pos.index()], occupant)
    }

    /// Check if a cell is empty.
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.cell(pos).is_none()
    }

    /// All cells in index order.
    #[inline]
    pub fn cells(&self) -> &[Option<Piece>; 9] {
        &self.0
    }

    /// Check if a piece of the given size can be placed at this position.
    /// A piece can be placed if the cell is empty or its occupant is smaller.
    #[inline]
    pub fn can_place(&self, size: Size, pos: Pos) -> bool {
        match self.cell(pos) {
            None => true,
            Some(occupant) => size.can_capture(occupant.size),
        }
    }

    /// Count pieces of each size on the board for a color.
    /// Returns [small_count, medium_count, large_count].
    pub fn pieces_on_board(&self, color: Color) -> [u8; 3] {
        let mut counts = [0u8; 3];
        for piece in self.0.iter().flatten() {
            if piece.color == color {
                counts[piece.size as usize] += 1;
            }
        }
        counts
    }

    /// Find the first complete line in `WIN_LINES` order.
    /// Returns the line's color and its positions. Size plays no part.
    pub fn winning_line(&self) -> Option<(Color, [Pos; 3])> {
        Self::WIN_LINES.iter().find_map(|line| {
            let [a, b, c] = line.map(|pos| self.cell(pos).map(|piece| piece.color));
            match (a, b, c) {
                (Some(a), Some(b), Some(c)) if a == b && b == c => Some((a, *line)),
                _ => None,
            }
        })
    }

    /// Check whether any line is complete and return its color.
    #[inline]
    pub fn check_winner(&self) -> Option<Color> {
        self.winning_line().map(|(color, _)| color)
    }
}

/// Renders the board as three rows of two-letter glyphs, `..` for empty.
///
/// ```text
/// BL .. WS
/// .. BM ..
/// .. .. ..
/// ```
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                if col > 0 {
                    f.write_str(" ")?;
                }
                match self.cell(Pos::from_row_col(row, col)) {
                    None => f.write_str("..")?,
                    Some(piece) => {
                        let color = match piece.color {
                            Color::Black => 'B',
                            Color::White => 'W',
                        };
                        let size = match piece.size {
                            Size::Small => 'S',
                            Size::Medium => 'M',
                            Size::Large => 'L',
                        };
                        write!(f, "{color}{size}")?;
                    }
                }
            }
            if row < 2 {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

/// Remaining pieces of one color, per size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Reserve {
    pub small: u8,
    pub medium: u8,
    pub large: u8,
}

impl Reserve {
    /// The reserve each color starts a standard game with.
    pub const STANDARD: Reserve = Reserve {
        small: 3,
        medium: 3,
        large: 2,
    };

    #[inline]
    pub fn get(&self, size: Size) -> u8 {
        match size {
            Size::Small => self.small,
            Size::Medium => self.medium,
            Size::Large => self.large,
        }
    }

    #[inline]
    fn get_mut(&mut self, size: Size) -> &mut u8 {
        match size {
            Size::Small => &mut self.small,
            Size::Medium => &mut self.medium,
            Size::Large => &mut self.large,
        }
    }

    /// Counts as [small, medium, large].
    pub fn to_array(self) -> [u8; 3] {
        [self.small, self.medium, self.large]
    }
}

impl Default for Reserve {
    fn default() -> Self {
        Reserve::STANDARD
    }
}

/// Remaining pieces for both colors.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Inventory {
    pub black: Reserve,
    pub white: Reserve,
}

impl Inventory {
    /// Both colors start from the same reserve.
    pub fn new(start: Reserve) -> Inventory {
        Inventory {
            black: start,
            white: start,
        }
    }

    #[inline]
    pub fn reserve(&self, color: Color) -> &Reserve {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    #[inline]
    pub fn remaining(&self, piece: Piece) -> u8 {
        self.reserve(piece.color).get(piece.size)
    }

    /// Spend one piece. The caller must have checked `remaining(piece) > 0`.
    pub(crate) fn take(&mut self, piece: Piece) {
        let reserve = match piece.color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        };
        let count = reserve.get_mut(piece.size);
        debug_assert!(*count > 0, "spending exhausted {piece}");
        *count = count.saturating_sub(1);
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Inventory::new(Reserve::STANDARD)
    }
}

/// Engine configuration.
///
/// Deserializes from partial input; missing fields fall back to the
/// standard reserve.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Pieces each color holds after construction and after every reset.
    pub starting_reserve: Reserve,
}
