//! Error types for board-text and move-text parsing.

use std::fmt;

use super::types::Color;

/// Failure while parsing board text (the FEN-like format).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// Unexpected character.
    Syntax { col: usize },
    /// A rank describes more than 8 squares.
    TooManySquaresInRank { col: usize },
    /// A rank ended before 8 squares were described.
    TooFewSquaresInRank { col: usize },
    /// More than 8 ranks.
    TooManyRanks { col: usize },
    /// The board description ended early.
    TooFewSquares { col: usize },
    /// A side has no monarch.
    NoMonarch { color: Color },
    /// A side has more than two monarchs.
    TooManyMonarchs { color: Color, col: usize },
    /// Missing or malformed side-to-move letter.
    BadSideToMove { col: usize },
    /// Malformed optional last-move tail.
    BadLastMove { col: usize },
}

impl FenError {
    /// Column of the offending character, when one exists.
    #[must_use]
    pub fn column(&self) -> Option<usize> {
        match self {
            FenError::Syntax { col }
            | FenError::TooManySquaresInRank { col }
            | FenError::TooFewSquaresInRank { col }
            | FenError::TooManyRanks { col }
            | FenError::TooFewSquares { col }
            | FenError::TooManyMonarchs { col, .. }
            | FenError::BadSideToMove { col }
            | FenError::BadLastMove { col } => Some(*col),
            FenError::NoMonarch { .. } => None,
        }
    }

    /// One-line diagnostic with a caret under the offending column.
    #[must_use]
    pub fn diagnostic(&self, fen: &str) -> String {
        match self.column() {
            Some(col) => format!("{fen}\n{}^ {self}", " ".repeat(col)),
            None => format!("{fen}\n{self}"),
        }
    }
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::Syntax { col } => write!(f, "syntax error at column {col}"),
            FenError::TooManySquaresInRank { col } => {
                write!(f, "too many squares in rank at column {col}")
            }
            FenError::TooFewSquaresInRank { col } => {
                write!(f, "too few squares in rank at column {col}")
            }
            FenError::TooManyRanks { col } => write!(f, "too many ranks at column {col}"),
            FenError::TooFewSquares { col } => {
                write!(f, "too few squares specified (at column {col})")
            }
            FenError::NoMonarch { color } => write!(f, "no {color} monarchs"),
            FenError::TooManyMonarchs { color, col } => {
                write!(f, "too many {color} monarchs at column {col}")
            }
            FenError::BadSideToMove { col } => {
                write!(f, "must specify White (W) or Black (B) to move at column {col}")
            }
            FenError::BadLastMove { col } => {
                write!(f, "illegal specification of last move at column {col}")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// A move string that matched no legal move in the position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveParseError {
    pub notation: String,
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no legal move matches '{}'", self.notation)
    }
}

impl std::error::Error for MoveParseError {}

/// Malformed square notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareParseError {
    pub notation: String,
}

impl fmt::Display for SquareParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid square notation '{}'", self.notation)
    }
}

impl std::error::Error for SquareParseError {}
