//! Playing strength limitation by Elo.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Move};

/// Elo at and above which no node budget applies
pub const MAX_LIMITED_ELO: u32 = 3000;

/// Elo below which the engine may substitute a random move
pub const BLUNDER_ELO: u32 = 2500;

const MIN_ELO: u32 = 100;

/// Node budget for a target Elo: `10^((elo - 1200) / 600 + 3)`, so 1200
/// searches a thousand nodes and every 600 Elo multiplies that by ten.
#[must_use]
pub fn elo_to_nodes(elo: u32) -> Option<u64> {
    if elo >= MAX_LIMITED_ELO {
        return None;
    }
    let elo = f64::from(elo.max(MIN_ELO));
    let exponent = (elo - 1200.0) / 600.0 + 3.0;
    Some((10f64.powf(exponent).round() as u64).max(1))
}

/// Chance of replacing the best move by a random one.
#[must_use]
pub fn blunder_probability(elo: u32) -> f64 {
    if elo >= BLUNDER_ELO {
        0.0
    } else {
        f64::from(BLUNDER_ELO - elo) / 5000.0
    }
}

/// With [`blunder_probability`], swap `best` for a uniformly chosen
/// different legal move.
pub fn maybe_blunder<R: Rng + ?Sized>(board: &mut Board, best: Move, elo: u32, rng: &mut R) -> Move {
    let p = blunder_probability(elo);
    if p <= 0.0 || !rng.gen_bool(p.min(1.0)) {
        return best;
    }
    let others: Vec<Move> = board
        .generate_moves()
        .iter()
        .copied()
        .filter(|m| *m != best)
        .collect();
    others.choose(rng).copied().unwrap_or(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_elo_to_nodes() {
        assert_eq!(elo_to_nodes(1200), Some(1000));
        assert_eq!(elo_to_nodes(1800), Some(10_000));
        assert_eq!(elo_to_nodes(2400), Some(100_000));
        assert_eq!(elo_to_nodes(3000), None);
        // Clamped to 100 Elo: 10^(3 - 11/6)
        assert_eq!(elo_to_nodes(0), elo_to_nodes(100));
        assert_eq!(elo_to_nodes(100), Some(15));
    }

    #[test]
    fn test_blunder_probability() {
        assert_eq!(blunder_probability(2500), 0.0);
        assert!((blunder_probability(1500) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_maybe_blunder_picks_other_legal_move() {
        let mut board = Board::new();
        let best = board.parse_move("e2e4").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let mut changed = 0;
        for _ in 0..200 {
            // Elo 0 blunders half the time
            let chosen = maybe_blunder(&mut board, best, 0, &mut rng);
            assert!(board.is_legal(chosen));
            if chosen != best {
                changed += 1;
            }
        }
        assert!(changed > 50 && changed < 150, "changed {changed}");

        let strong = maybe_blunder(&mut board, best, 2600, &mut rng);
        assert_eq!(strong, best);
    }

    #[test]
    fn test_single_legal_move_is_kept() {
        // Kxb2 is the only legal move
        let mut board = Board::from_fen("k7/8/8/8/8/8/1r6/K7 w - - 0 1");
        let moves = board.generate_moves();
        assert_eq!(moves.len(), 1);
        let only = moves.iter().next().copied().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(maybe_blunder(&mut board, only, 0, &mut rng), only);
        }
    }
}
