//! Error taxonomy shared by the whole crate.

use thiserror::Error;

use crate::board::Color;

/// Rule a rejected move broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Point is not empty
    #[error("point not empty")]
    Occupied,
    /// Move retakes a ko immediately
    #[error("retakes ko")]
    Ko,
    /// Move would leave its own group without liberties and captures nothing
    #[error("suicide")]
    Suicide,
    /// Point is outside the playable area
    #[error("point off board")]
    OffBoard,
}

/// Errors surfaced to the host.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction parameter: board size, strategy name or option,
    /// or time specification.
    #[error("{0}")]
    Config(String),

    /// A move violates the rules of the game.
    #[error("Illegal move by {color} at {coord} ({reason}). Current board:\n{board}")]
    IllegalMove {
        color: Color,
        coord: String,
        reason: MoveError,
        board: String,
    },

    /// Coordinate text that does not name a point on the board.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// A search strategy failed. The engine should be discarded.
    #[error("engine error: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_move_message() {
        let err = Error::IllegalMove {
            color: Color::White,
            coord: "C3".into(),
            reason: MoveError::Suicide,
            board: ". X\nX .".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Illegal move by white at C3 (suicide)"));
        assert!(msg.ends_with(". X\nX ."));
    }
}
