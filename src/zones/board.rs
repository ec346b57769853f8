//! A player's board: ordered, gap-free, capacity-bounded.
//!
//! Order matters: combat attacks left to right, and reordering is only
//! possible through a full permutation of the current indices. The board
//! does not enforce its own capacity on insertion; callers check
//! `is_full` first.

use serde::{Deserialize, Serialize};

use crate::cards::{calc_majority_tribe, Keyword, Minion, Tribe, TribeSummary};
use crate::core::error::check_permutation;
use crate::core::{CombatId, GameResult, GameRng};

/// Default board capacity.
pub const BOARD_CAPACITY: usize = 7;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    minions: Vec<Minion>,
    capacity: usize,
}

impl Board {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            minions: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Board holding `minions` in order, with the default capacity.
    #[must_use]
    pub fn from_minions(minions: Vec<Minion>) -> Self {
        Self {
            capacity: BOARD_CAPACITY.max(minions.len()),
            minions,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.minions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.minions.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.minions.len() >= self.capacity
    }

    #[must_use]
    pub fn minions(&self) -> &[Minion] {
        &self.minions
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Minion> {
        self.minions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Minion> {
        self.minions.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Minion> {
        self.minions.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Minion> {
        self.minions.iter_mut()
    }

    /// Insert at `position` clamped to `0..=len`, shifting later minions
    /// right. Returns the index actually used.
    pub fn place_minion(&mut self, minion: Minion, position: usize) -> usize {
        let index = position.min(self.minions.len());
        self.minions.insert(index, minion);
        index
    }

    /// Remove and return the minion at `index`; `None` if out of range.
    pub fn remove_minion(&mut self, index: usize) -> Option<Minion> {
        if index < self.minions.len() {
            Some(self.minions.remove(index))
        } else {
            None
        }
    }

    /// Reorder so that new slot `i` holds the minion previously at
    /// `permutation[i]`. Anything but a bijection over the current
    /// indices is rejected without touching the board.
    pub fn reorder(&mut self, permutation: &[usize]) -> GameResult<()> {
        check_permutation(permutation, self.minions.len())?;
        let mut slots: Vec<Option<Minion>> = self.minions.drain(..).map(Some).collect();
        self.minions = permutation
            .iter()
            .filter_map(|&from| slots[from].take())
            .collect();
        Ok(())
    }

    /// Index of the minion carrying `id` in the current battle.
    #[must_use]
    pub fn position_of(&self, id: CombatId) -> Option<usize> {
        self.minions.iter().position(|m| m.combat_id == id)
    }

    #[must_use]
    pub fn living_count(&self) -> usize {
        self.minions.iter().filter(|m| m.is_alive()).count()
    }

    #[must_use]
    pub fn any_can_attack(&self) -> bool {
        self.minions.iter().any(Minion::can_attack)
    }

    /// Sum of the tiers of living minions.
    #[must_use]
    pub fn living_tier_total(&self) -> u32 {
        self.minions
            .iter()
            .filter(|m| m.is_alive())
            .map(|m| u32::from(m.tier()))
            .sum()
    }

    /// Pick a combat target.
    ///
    /// Living Taunt minions first; otherwise any living minion without
    /// Stealth. `None` means nothing can be attacked.
    pub fn pick_defender(&self, rng: &mut GameRng) -> Option<usize> {
        let taunts: Vec<usize> = self
            .minions
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_alive() && m.has(Keyword::Taunt))
            .map(|(i, _)| i)
            .collect();
        if !taunts.is_empty() {
            return rng.pick_index(taunts.len()).map(|i| taunts[i]);
        }

        let visible: Vec<usize> = self
            .minions
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_alive() && !m.has(Keyword::Stealth))
            .map(|(i, _)| i)
            .collect();
        rng.pick_index(visible.len()).map(|i| visible[i])
    }

    /// Every tribe tag on the board, one entry per minion per tribe.
    #[must_use]
    pub fn tribes(&self) -> Vec<Tribe> {
        self.minions
            .iter()
            .flat_map(|m| m.tribes().iter().copied())
            .collect()
    }

    #[must_use]
    pub fn majority_tribe(&self) -> TribeSummary {
        calc_majority_tribe(&self.tribes())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardTemplate, MajorityTribe, TemplateId};
    use crate::core::GameError;
    use std::sync::Arc;

    fn minion(id: u32, attack: i32, health: i32) -> Minion {
        Minion::new(Arc::new(CardTemplate::minion(
            TemplateId::new(id),
            format!("M{id}"),
            1,
            attack,
            health,
        )))
    }

    fn ids(board: &Board) -> Vec<u32> {
        board.iter().map(|m| m.template_id().raw()).collect()
    }

    #[test]
    fn test_place_clamps_and_shifts() {
        let mut board = Board::default();
        assert_eq!(board.place_minion(minion(1, 1, 1), 5), 0);
        assert_eq!(board.place_minion(minion(2, 1, 1), 0), 0);
        assert_eq!(board.place_minion(minion(3, 1, 1), 1), 1);
        assert_eq!(ids(&board), vec![2, 3, 1]);
    }

    #[test]
    fn test_remove_compacts() {
        let mut board = Board::default();
        for id in 1..=3 {
            board.place_minion(minion(id, 1, 1), usize::MAX);
        }
        let removed = board.remove_minion(1).unwrap();
        assert_eq!(removed.template_id(), TemplateId::new(2));
        assert_eq!(ids(&board), vec![1, 3]);
        assert!(board.remove_minion(2).is_none());
    }

    #[test]
    fn test_board_does_not_enforce_capacity() {
        let mut board = Board::new(1);
        board.place_minion(minion(1, 1, 1), 0);
        assert!(board.is_full());
        board.place_minion(minion(2, 1, 1), 0);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_reorder() {
        let mut board = Board::default();
        for id in 1..=3 {
            board.place_minion(minion(id, 1, 1), usize::MAX);
        }
        board.reorder(&[2, 0, 1]).unwrap();
        assert_eq!(ids(&board), vec![3, 1, 2]);

        assert_eq!(board.reorder(&[0, 0, 1]), Err(GameError::InvalidPermutation));
        assert_eq!(board.reorder(&[0, 1]), Err(GameError::InvalidPermutation));
        assert_eq!(board.reorder(&[0, 1, 9]), Err(GameError::InvalidPermutation));
        assert_eq!(ids(&board), vec![3, 1, 2]);
    }

    #[test]
    fn test_pick_defender_prefers_taunt() {
        let mut board = Board::default();
        board.place_minion(minion(1, 1, 1), usize::MAX);
        let mut taunt = minion(2, 1, 1);
        taunt.abilities.keywords.insert(Keyword::Taunt);
        board.place_minion(taunt, usize::MAX);
        board.place_minion(minion(3, 1, 1), usize::MAX);

        let mut rng = GameRng::new(1);
        for _ in 0..20 {
            assert_eq!(board.pick_defender(&mut rng), Some(1));
        }
    }

    #[test]
    fn test_pick_defender_skips_stealth() {
        let mut board = Board::default();
        let mut hidden = minion(1, 1, 1);
        hidden.abilities.keywords.insert(Keyword::Stealth);
        board.place_minion(hidden.clone(), usize::MAX);

        let mut rng = GameRng::new(1);
        assert_eq!(board.pick_defender(&mut rng), None);

        board.place_minion(minion(2, 1, 1), usize::MAX);
        for _ in 0..20 {
            assert_eq!(board.pick_defender(&mut rng), Some(1));
        }
    }

    #[test]
    fn test_majority_tribe() {
        let beast = Arc::new(
            CardTemplate::minion(TemplateId::new(1), "Cat", 1, 1, 1).with_tribe(Tribe::Beast),
        );
        let mut board = Board::default();
        assert_eq!(board.majority_tribe().majority, MajorityTribe::Neutral);
        board.place_minion(Minion::new(beast.clone()), 0);
        board.place_minion(Minion::new(beast), 0);
        board.place_minion(minion(9, 1, 1), 0);
        let summary = board.majority_tribe();
        assert_eq!(summary.majority, MajorityTribe::Tribe(Tribe::Beast));
        assert_eq!(summary.count, 2);
    }
}
