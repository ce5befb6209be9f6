//! Static evaluation.
//!
//! The search talks to evaluation only through [`Evaluator`], so the
//! classical scorer here and any incremental scorer are interchangeable.

use std::sync::Arc;

use crate::pawn_hash::PawnHashTable;

use super::error::ParamError;
use super::eval_terms::params::EvalParams;
use super::eval_terms::tables::pst_value;
use super::{Board, Color, Move, Piece};

/// Position scorer used by the search.
///
/// `push` is called right after every real move is made and `pop` right
/// after it is unmade, so an implementation can keep an accumulator stack
/// in step with the board. `refresh` rebuilds that state from scratch; the
/// search calls it once at the root. Null moves are not reported.
pub trait Evaluator: Send {
    /// Score in centipawns from the side to move's perspective.
    fn evaluate(&mut self, board: &Board) -> i32;

    fn push(&mut self, _board: &Board, _m: Move) {}

    fn pop(&mut self) {}

    fn refresh(&mut self, _board: &Board) {}

    /// Independent copy for another search thread. Shared caches may be
    /// shared; accumulator stacks must not be.
    fn fork(&self) -> Box<dyn Evaluator>;
}

/// Material and piece-square score from white's perspective.
pub(crate) fn material_and_pst(board: &Board, params: &EvalParams) -> i32 {
    let mut score = 0;
    for color in Color::BOTH {
        for piece in Piece::ALL {
            for sq in board.pieces(color, piece) {
                score += color.sign() * (params.piece_value(piece) + pst_value(piece, color, sq));
            }
        }
    }
    score
}

/// Hand-written evaluator: material, piece-square tables, pawn structure,
/// mobility, outposts and king safety.
///
/// The pawn structure term is cached by pawn hash. The cache is shared by
/// forks and cleared whenever a parameter changes.
pub struct ClassicalEvaluator {
    params: EvalParams,
    pawn_table: Arc<PawnHashTable>,
}

impl ClassicalEvaluator {
    #[must_use]
    pub fn new(params: EvalParams) -> Self {
        ClassicalEvaluator {
            params,
            pawn_table: Arc::new(PawnHashTable::default()),
        }
    }

    #[must_use]
    pub fn params(&self) -> &EvalParams {
        &self.params
    }

    /// Change one weight by name. Must not run while a search is using a
    /// fork of this evaluator.
    pub fn set_param(&mut self, name: &str, value: i32) -> Result<(), ParamError> {
        self.params.set(name, value)?;
        self.pawn_table.clear();
        Ok(())
    }

    /// Replace every weight at once.
    pub fn set_params(&mut self, params: EvalParams) {
        self.params = params;
        self.pawn_table.clear();
    }

    fn pawn_structure(&self, board: &Board) -> i32 {
        let key = board.pawn_hash();
        if let Some(score) = self.pawn_table.probe(key) {
            return score;
        }
        let score = board.eval_pawn_structure(&self.params);
        self.pawn_table.store(key, score);
        score
    }

    /// Full evaluation from white's perspective.
    #[must_use]
    pub fn score_white(&self, board: &Board) -> i32 {
        let ctx = board.compute_attack_context();
        material_and_pst(board, &self.params)
            + self.pawn_structure(board)
            + board.eval_mobility_with_context(&ctx, &self.params)
            + board.eval_outposts(&self.params)
            + board.eval_king_safety(&self.params)
    }
}

impl Default for ClassicalEvaluator {
    fn default() -> Self {
        ClassicalEvaluator::new(EvalParams::default())
    }
}

impl Evaluator for ClassicalEvaluator {
    fn evaluate(&mut self, board: &Board) -> i32 {
        board.side_to_move().sign() * self.score_white(board)
    }

    fn fork(&self) -> Box<dyn Evaluator> {
        Box::new(ClassicalEvaluator {
            params: self.params.clone(),
            pawn_table: Arc::clone(&self.pawn_table),
        })
    }
}
