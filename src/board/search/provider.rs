//! Move sources consulted before the search proper: opening books and
//! similar lookups.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;

use crate::board::{Board, BookError, Move};

/// Anything that can answer a position with a move without searching.
///
/// Returned moves are re-validated against the legal-move list by the
/// caller, so a provider may be stale or keyed loosely.
pub trait MoveProvider: Send {
    fn lookup(&self, board: &Board) -> Option<Move>;
}

/// Opening book read from a plain text file.
///
/// One position per line: `<fen> ; <uci move> [<uci move> ...]`. Blank
/// lines and lines starting with `#` are ignored. A lookup picks one of the
/// listed moves at random.
#[derive(Debug, Default, Clone)]
pub struct TextBook {
    entries: HashMap<u64, Vec<Move>>,
}

impl TextBook {
    #[must_use]
    pub fn new() -> Self {
        TextBook::default()
    }

    /// Parse book text.
    ///
    /// # Errors
    /// Returns [`BookError::Parse`] with the 1-based line number of the
    /// first line with a bad FEN, a missing separator or an illegal move.
    pub fn parse(text: &str) -> Result<Self, BookError> {
        let mut book = TextBook::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parse_err = |reason: String| BookError::Parse {
                line: idx + 1,
                reason,
            };
            let (fen, moves) = line
                .split_once(';')
                .ok_or_else(|| parse_err("missing ';' separator".to_string()))?;
            let mut board =
                Board::try_from_fen(fen.trim()).map_err(|e| parse_err(e.to_string()))?;
            let entry = book.entries.entry(board.hash()).or_default();
            for uci in moves.split_whitespace() {
                let mv = board
                    .parse_move(uci)
                    .map_err(|e| parse_err(format!("{uci}: {e}")))?;
                if !entry.contains(&mv) {
                    entry.push(mv);
                }
            }
        }
        book.entries.retain(|_, moves| !moves.is_empty());
        Ok(book)
    }

    /// Read and parse a book file.
    ///
    /// # Errors
    /// [`BookError::Io`] when the file cannot be read, otherwise as
    /// [`TextBook::parse`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BookError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Like [`TextBook::load`], but a missing or broken book only disables
    /// the book.
    #[must_use]
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(book) => book,
            Err(_err) => {
                #[cfg(feature = "logging")]
                log::warn!("opening book disabled: {_err}");
                TextBook::new()
            }
        }
    }

    /// Number of positions in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All book moves for this position.
    #[must_use]
    pub fn moves(&self, board: &Board) -> &[Move] {
        self.entries.get(&board.hash()).map_or(&[], Vec::as_slice)
    }
}

impl MoveProvider for TextBook {
    fn lookup(&self, board: &Board) -> Option<Move> {
        self.moves(board).choose(&mut rand::thread_rng()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;

    const BOOK: &str = "\
# tiny book
rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 ; e2e4 d2d4
rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1 ; c7c5

";

    #[test]
    fn test_parse_and_lookup() {
        let book = TextBook::parse(BOOK).unwrap();
        assert_eq!(book.len(), 2);

        let mut board = Board::from_fen(START_FEN);
        assert_eq!(book.moves(&board).len(), 2);
        let mv = book.lookup(&board).unwrap();
        assert!(board.is_legal(mv));

        board.make_move_uci("e2e4").unwrap();
        assert_eq!(book.lookup(&board).map(|m| m.to_string()), Some("c7c5".to_string()));

        board.make_move_uci("c7c5").unwrap();
        assert_eq!(book.lookup(&board), None);
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let err = TextBook::parse("\n8/8/8/8 w - - 0 1 ; e2e4").unwrap_err();
        assert!(matches!(err, BookError::Parse { line: 2, .. }));

        let err = TextBook::parse(&format!("{START_FEN} e2e4")).unwrap_err();
        assert!(matches!(err, BookError::Parse { line: 1, .. }));

        let err = TextBook::parse(&format!("{START_FEN} ; e2e5")).unwrap_err();
        assert!(matches!(err, BookError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_missing_file_is_soft_failure() {
        let path = std::env::temp_dir().join("lazy_chess_no_such_book.txt");
        assert!(matches!(TextBook::load(&path), Err(BookError::Io { .. })));
        assert!(TextBook::load_or_empty(&path).is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("lazy_chess_book_{}.txt", std::process::id()));
        fs::write(&path, BOOK).unwrap();
        let book = TextBook::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(book.len(), 2);
    }
}
