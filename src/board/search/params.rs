#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pruning and extension knobs for the alpha-beta search.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchParams {
    pub null_reduction: u32,
    pub null_min_depth: u32,
    /// Razoring applies up to this depth with `razor_base + razor_per_depth * depth`
    pub razor_max_depth: u32,
    pub razor_base: i32,
    pub razor_per_depth: i32,
    /// Futility applies up to this depth with `futility_per_depth * depth`
    pub futility_max_depth: u32,
    pub futility_per_depth: i32,
    pub probcut_min_depth: u32,
    pub probcut_margin: i32,
    pub probcut_reduction: u32,
    /// IID runs when depth is strictly greater than this and no TT move exists
    pub iid_min_depth: u32,
    pub iid_reduction: u32,
    pub singular_min_depth: u32,
    /// Singular beta is `tt_score - singular_margin * depth`
    pub singular_margin: i32,
    pub lmr_min_depth: u32,
    /// Moves searched before LMR may apply (strictly more than this)
    pub lmr_min_move: usize,
    /// Late move pruning skips quiets once `lmp_base + depth^2` moves were searched
    pub lmp_max_depth: u32,
    pub lmp_base: usize,
    /// Quiet moves within LMP depth are also skipped when their history is
    /// below `-lmp_history_margin * depth`
    pub lmp_history_margin: i32,
    pub delta_margin: i32,
    /// History entries are halved once any exceeds this magnitude
    pub history_cap: i32,
    /// Score drop between iterations that doubles the soft limit
    pub instability_margin: i32,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            null_reduction: 2,
            null_min_depth: 3,
            razor_max_depth: 3,
            razor_base: 300,
            razor_per_depth: 100,
            futility_max_depth: 3,
            futility_per_depth: 100,
            probcut_min_depth: 5,
            probcut_margin: 200,
            probcut_reduction: 4,
            iid_min_depth: 3,
            iid_reduction: 2,
            singular_min_depth: 8,
            singular_margin: 2,
            lmr_min_depth: 3,
            lmr_min_move: 1,
            lmp_max_depth: 3,
            lmp_base: 3,
            lmp_history_margin: 4000,
            delta_margin: 975,
            history_cap: 1_000_000,
            instability_margin: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_update_keeps_defaults() {
        let params = SearchParams {
            null_reduction: 3,
            ..SearchParams::default()
        };
        assert_eq!(params.null_reduction, 3);
        assert_eq!(params.lmp_base, SearchParams::default().lmp_base);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let params = SearchParams {
            futility_per_depth: 120,
            ..SearchParams::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: SearchParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
