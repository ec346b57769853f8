//! Target selection on a friendly board.
//!
//! Shared by the recruit resolver and by combat deathrattles. Indices
//! are returned ascending and refer to the board as it was passed in.

use smallvec::SmallVec;

use super::effect::EffectTarget;
use crate::cards::matches_filter;
use crate::core::GameRng;
use crate::zones::Board;

/// Board indices an effect lands on.
pub type Targets = SmallVec<[usize; 7]>;

pub struct TargetSelector;

impl TargetSelector {
    /// Resolve `target` against `board`.
    ///
    /// `source` is the owning minion's index (absent for spells and for
    /// minions that already left the board). `chosen` is the index picked
    /// by the player; without one, a chosen effect has no target. Dead
    /// minions are never targeted.
    pub fn select(
        board: &Board,
        target: EffectTarget,
        source: Option<usize>,
        chosen: Option<usize>,
        rng: &mut GameRng,
    ) -> Targets {
        let alive = |i: &usize| board.get(*i).is_some_and(|m| m.is_alive());

        match target {
            EffectTarget::SelfMinion => source.into_iter().filter(alive).collect(),
            EffectTarget::Chosen => chosen.into_iter().filter(alive).collect(),
            EffectTarget::AllFriendly => (0..board.len()).filter(alive).collect(),
            EffectTarget::RandomFriendly => Self::random(board, rng),
            EffectTarget::FriendlyTribe(tribe) => board
                .iter()
                .enumerate()
                .filter(|(_, m)| m.is_alive() && matches_filter(m.tribes(), &[tribe]))
                .map(|(i, _)| i)
                .collect(),
        }
    }

    fn random(board: &Board, rng: &mut GameRng) -> Targets {
        let living: Targets = (0..board.len())
            .filter(|&i| board.get(i).is_some_and(|m| m.is_alive()))
            .collect();
        rng.pick_index(living.len())
            .map(|i| living[i])
            .into_iter()
            .collect()
    }
}
