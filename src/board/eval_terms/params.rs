//! Named evaluation weights.
//!
//! Every weight the classical evaluator uses lives here as a plain field
//! that can also be read and written by name, so an external tuner can
//! walk the parameter space without knowing the struct layout.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::ParamError;
use crate::board::types::Piece;

macro_rules! eval_params {
    ($($field:ident => $name:literal = $default:expr),* $(,)?) => {
        /// Runtime-tunable evaluation weights.
        #[derive(Clone, Debug, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct EvalParams {
            $(pub $field: i32,)*
        }

        impl Default for EvalParams {
            fn default() -> Self {
                EvalParams {
                    $($field: $default,)*
                }
            }
        }

        impl EvalParams {
            /// Every parameter name, in declaration order.
            pub const NAMES: &'static [&'static str] = &[$($name),*];

            fn slot_mut(&mut self, name: &str) -> Option<&mut i32> {
                match name {
                    $($name => Some(&mut self.$field),)*
                    _ => None,
                }
            }

            /// Current value of the parameter called `name`.
            pub fn get(&self, name: &str) -> Result<i32, ParamError> {
                match name {
                    $($name => Ok(self.$field),)*
                    _ => Err(ParamError::UnknownParameter { name: name.to_string() }),
                }
            }
        }
    };
}

eval_params! {
    pawn_value => "PawnValue" = 100,
    knight_value => "KnightValue" = 320,
    bishop_value => "BishopValue" = 330,
    rook_value => "RookValue" = 500,
    queen_value => "QueenValue" = 900,
    doubled_pawn_penalty => "DoubledPawnPenalty" = 10,
    isolated_pawn_penalty => "IsolatedPawnPenalty" = 20,
    backward_pawn_penalty => "BackwardPawnPenalty" = 8,
    knight_mobility_bonus => "KnightMobilityBonus" = 4,
    bishop_mobility_bonus => "BishopMobilityBonus" = 5,
    rook_mobility_bonus => "RookMobilityBonus" = 2,
    queen_mobility_bonus => "QueenMobilityBonus" = 1,
    knight_outpost_bonus => "KnightOutpostBonus" = 20,
    bishop_outpost_bonus => "BishopOutpostBonus" = 10,
    shield_bonus => "ShieldBonus" = 10,
    pawn_storm_penalty => "PawnStormPenalty" = 60,
}

impl EvalParams {
    /// Set the parameter called `name`.
    pub fn set(&mut self, name: &str, value: i32) -> Result<(), ParamError> {
        let slot = self
            .slot_mut(name)
            .ok_or_else(|| ParamError::UnknownParameter {
                name: name.to_string(),
            })?;
        *slot = value;
        Ok(())
    }

    /// `(name, value)` for every parameter.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        Self::NAMES.iter().filter_map(|&name| self.get(name).ok().map(|v| (name, v)))
    }

    /// Material value of `piece`. The king carries none since both sides
    /// always have one.
    #[inline]
    #[must_use]
    pub fn piece_value(&self, piece: Piece) -> i32 {
        match piece {
            Piece::Pawn => self.pawn_value,
            Piece::Knight => self.knight_value,
            Piece::Bishop => self.bishop_value,
            Piece::Rook => self.rook_value,
            Piece::Queen => self.queen_value,
            Piece::King => 0,
        }
    }

    /// Mobility weight per safe square; zero for pawns and kings.
    #[inline]
    #[must_use]
    pub fn mobility_bonus(&self, piece: Piece) -> i32 {
        match piece {
            Piece::Knight => self.knight_mobility_bonus,
            Piece::Bishop => self.bishop_mobility_bonus,
            Piece::Rook => self.rook_mobility_bonus,
            Piece::Queen => self.queen_mobility_bonus,
            Piece::Pawn | Piece::King => 0,
        }
    }
}
