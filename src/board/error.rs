//! Error types for board, parameter and book operations.

use std::fmt;

/// Error type for FEN / X-FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few parts (needs at least 4)
    TooFewParts { found: usize },
    /// Placement field does not have exactly 8 ranks
    InvalidRankCount { found: usize },
    /// Invalid piece character in position string
    InvalidPiece { char: char },
    /// Too many files in a rank
    TooManyFiles { rank: usize, files: usize },
    /// A rank that does not add up to 8 files
    TooFewFiles { rank: usize, files: usize },
    /// Invalid castling character
    InvalidCastling { char: char },
    /// Castling right without a matching rook, or with the king outside the rooks
    InvalidCastlingRook { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid en passant square
    InvalidEnPassant { found: String },
    /// Half-move clock or full-move number is not a number
    InvalidClock { found: String },
    /// A color does not have exactly one king
    MissingKing { color: char, found: u32 },
    /// At game start, two same-colored bishops of one side on the same square color
    DuplicateBishopColor { color: char },
    /// A pawn on the first or last rank
    PawnOnBackRank { square: String },
    /// The side not to move is in check
    OpponentInCheck,
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 parts, found {found}")
            }
            FenError::InvalidRankCount { found } => {
                write!(f, "FEN placement must have 8 ranks, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::TooManyFiles { rank, files } => {
                write!(f, "Too many files ({files}) in rank {rank}")
            }
            FenError::TooFewFiles { rank, files } => {
                write!(f, "Rank {rank} covers only {files} files, expected 8")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidCastlingRook { char } => {
                write!(f, "Castling right '{char}' has no usable rook")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::InvalidClock { found } => {
                write!(f, "Invalid move counter '{found}'")
            }
            FenError::MissingKing { color, found } => {
                write!(f, "Side '{color}' must have exactly one king, found {found}")
            }
            FenError::DuplicateBishopColor { color } => {
                write!(
                    f,
                    "Side '{color}' has two bishops on the same square color at game start"
                )
            }
            FenError::PawnOnBackRank { square } => {
                write!(f, "Pawn on back rank at {square}")
            }
            FenError::OpponentInCheck => {
                write!(f, "Side not to move is in check")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for move parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters)
    InvalidLength { len: usize },
    /// Invalid square notation in move
    InvalidSquare { notation: String },
    /// Invalid promotion piece
    InvalidPromotion { char: char },
    /// Move is not legal in the current position
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "Move must be 4-5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-7)
    RankOutOfBounds { rank: usize },
    /// File out of bounds (must be 0-7)
    FileOutOfBounds { file: usize },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 0-7)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "File {file} out of bounds (must be 0-7)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Error type for named evaluation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// No parameter with this name exists
    UnknownParameter { name: String },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::UnknownParameter { name } => {
                write!(f, "Unknown evaluation parameter '{name}'")
            }
        }
    }
}

impl std::error::Error for ParamError {}

/// Error type for opening book loading
#[derive(Debug)]
pub enum BookError {
    /// The book file could not be read
    Io { path: String, source: std::io::Error },
    /// A line could not be parsed
    Parse { line: usize, reason: String },
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::Io { path, source } => {
                write!(f, "Cannot read book '{path}': {source}")
            }
            BookError::Parse { line, reason } => {
                write!(f, "Book line {line}: {reason}")
            }
        }
    }
}

impl std::error::Error for BookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BookError::Io { source, .. } => Some(source),
            BookError::Parse { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_error_too_few_parts() {
        let err = FenError::TooFewParts { found: 2 };
        assert!(err.to_string().contains('2'));
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn test_fen_error_invalid_piece() {
        let err = FenError::InvalidPiece { char: 'z' };
        assert!(err.to_string().contains("'z'"));
    }

    #[test]
    fn test_fen_error_rank_count() {
        let err = FenError::InvalidRankCount { found: 7 };
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_fen_error_invalid_side() {
        let err = FenError::InvalidSideToMove {
            found: "X".to_string(),
        };
        assert!(err.to_string().contains("'X'"));
    }

    #[test]
    fn test_fen_error_duplicate_bishop() {
        let err = FenError::DuplicateBishopColor { color: 'w' };
        assert!(err.to_string().contains("bishops"));
    }

    #[test]
    fn test_move_error_illegal_move() {
        let err = MoveParseError::IllegalMove {
            notation: "e2e5".to_string(),
        };
        assert!(err.to_string().contains("e2e5"));
    }

    #[test]
    fn test_square_error_invalid_notation() {
        let err = SquareError::InvalidNotation {
            notation: "xyz".to_string(),
        };
        assert!(err.to_string().contains("xyz"));
    }

    #[test]
    fn test_param_error_names_parameter() {
        let err = ParamError::UnknownParameter {
            name: "FooBonus".to_string(),
        };
        assert!(err.to_string().contains("FooBonus"));
    }

    #[test]
    fn test_book_error_source() {
        use std::error::Error;
        let err = BookError::Io {
            path: "book.txt".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("book.txt"));
        assert!(err.source().is_some());
        let parse = BookError::Parse {
            line: 3,
            reason: "bad move".to_string(),
        };
        assert!(parse.source().is_none());
    }
}
