use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{Bitboard, Board, CastleSide, Color, Move, Piece, Square};

/// Standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parse a board position from FEN or X-FEN notation.
    ///
    /// Castling letters `KQkq` refer to the outermost rook on that wing;
    /// file letters (`A`-`H`, `a`-`h`) name the rook file directly and mark
    /// the position as Chess960. Missing clocks default to `0 1`.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRankCount { found: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as usize;
                } else {
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::TooManyFiles {
                            rank: rank_idx,
                            files: file + 1,
                        });
                    }
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let sq = Square::at(7 - rank_idx, file);
                    if piece == Piece::Pawn && (rank_idx == 0 || rank_idx == 7) {
                        return Err(FenError::PawnOnBackRank {
                            square: sq.to_string(),
                        });
                    }
                    board.set_piece(sq, color, piece);
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::TooManyFiles {
                        rank: rank_idx,
                        files: file,
                    });
                }
            }
            if file < 8 {
                return Err(FenError::TooFewFiles {
                    rank: rank_idx,
                    files: file,
                });
            }
        }

        board.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        for color in Color::BOTH {
            let kings = board.pieces(color, Piece::King).popcount();
            if kings != 1 {
                return Err(FenError::MissingKing {
                    color: if color == Color::White { 'w' } else { 'b' },
                    found: kings,
                });
            }
        }

        if board.is_in_check(board.side_to_move.opponent()) {
            return Err(FenError::OpponentInCheck);
        }

        board.parse_castling(parts[2])?;

        board.en_passant_target = match parts[3] {
            "-" => None,
            field => {
                let sq: Square = field.parse().map_err(|_| FenError::InvalidEnPassant {
                    found: field.to_string(),
                })?;
                if sq.rank() != 2 && sq.rank() != 5 {
                    return Err(FenError::InvalidEnPassant {
                        found: field.to_string(),
                    });
                }
                Some(sq)
            }
        };

        let parse_clock = |field: &str| {
            field.parse::<u32>().map_err(|_| FenError::InvalidClock {
                found: field.to_string(),
            })
        };
        if let Some(field) = parts.get(4) {
            board.halfmove_clock = parse_clock(*field)?;
        }
        if let Some(field) = parts.get(5) {
            board.fullmove_number = parse_clock(*field)?.max(1);
        }

        if board.fullmove_number == 1 && board.halfmove_clock == 0 {
            board.check_bishop_colors()?;
        }

        board.refresh_hashes();
        Ok(board)
    }

    fn parse_castling(&mut self, field: &str) -> Result<(), FenError> {
        if field == "-" {
            return Ok(());
        }
        for c in field.chars() {
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let rank = color.back_rank();
            let rooks = self.pieces(color, Piece::Rook) & Bitboard::rank_mask(rank);
            let king = self
                .king_square(color)
                .filter(|k| k.rank() == rank)
                .ok_or(FenError::InvalidCastlingRook { char: c })?;

            let (side, rook_file) = match c.to_ascii_lowercase() {
                'k' => {
                    let file = (king.file() + 1..8)
                        .rev()
                        .find(|&f| rooks.contains(Square::at(rank, f)));
                    (CastleSide::King, file)
                }
                'q' => {
                    let file = (0..king.file()).find(|&f| rooks.contains(Square::at(rank, f)));
                    (CastleSide::Queen, file)
                }
                'a'..='h' => {
                    let file = (c.to_ascii_lowercase() as u8 - b'a') as usize;
                    self.castling_rights.set_chess960(true);
                    let side = if file > king.file() {
                        CastleSide::King
                    } else {
                        CastleSide::Queen
                    };
                    (side, Some(file).filter(|&f| rooks.contains(Square::at(rank, f))))
                }
                _ => return Err(FenError::InvalidCastling { char: c }),
            };
            let rook_file = rook_file.ok_or(FenError::InvalidCastlingRook { char: c })?;
            self.castling_rights.set(color, side, rook_file);
        }
        Ok(())
    }

    /// At the initial position a side cannot have two bishops on one square color.
    fn check_bishop_colors(&self) -> Result<(), FenError> {
        for color in Color::BOTH {
            let bishops = self.pieces(color, Piece::Bishop);
            if (bishops & Bitboard::LIGHT_SQUARES).popcount() > 1
                || (bishops & Bitboard::DARK_SQUARES).popcount() > 1
            {
                return Err(FenError::DuplicateBishopColor {
                    color: if color == Color::White { 'w' } else { 'b' },
                });
            }
        }
        Ok(())
    }

    /// Parse a board position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use `try_from_fen` for fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("Invalid FEN string")
    }

    /// Convert the board position to FEN notation (all six fields).
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                if let Some((color, piece)) = self.piece_at(Square::at(rank, file)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let ep = self
            .en_passant_target
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            self.side_to_move,
            self.castling_rights.to_fen_field(),
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Parse a move in UCI long algebraic notation (e.g., "e2e4", "e7e8q").
    ///
    /// Castling is accepted both as the king's two-square move (`e1g1`) and
    /// as king-takes-own-rook (`e1h1`), the usual Chess960 form.
    pub fn parse_move(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        if !(4..=5).contains(&uci.len()) || !uci.is_ascii() {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }

        let invalid_square = || MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        };
        let from: Square = uci[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = uci[2..4].parse().map_err(|_| invalid_square())?;

        let promotion = match uci[4..].chars().next() {
            Some(c) => match Piece::from_char(c) {
                Some(p) if !matches!(p, Piece::Pawn | Piece::King) => Some(p),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
            None => None,
        };

        let legal_moves = self.generate_moves();
        let plain = legal_moves
            .iter()
            .find(|m| m.from() == from && m.to() == to && m.promotion() == promotion);
        let rook_capture = || {
            legal_moves
                .iter()
                .find(|m| m.from() == from && m.castling_rook() == Some(to) && promotion.is_none())
        };

        plain
            .or_else(rook_capture)
            .copied()
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: uci.to_string(),
            })
    }

    /// Parse a UCI move and make it on the board in one call.
    ///
    /// # Example
    /// ```
    /// use lazy_chess::board::Board;
    ///
    /// let mut board = Board::new();
    /// board.make_move_uci("e2e4").unwrap();
    /// board.make_move_uci("e7e5").unwrap();
    /// ```
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(uci)?;
        self.make_move(mv);
        Ok(mv)
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}
