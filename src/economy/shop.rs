//! Per-player shop.
//!
//! The shop is a view into the shared pool: whatever it offers was
//! drawn from the pool and goes back to it on the next reroll. Gold is
//! the player's concern; the shop only tracks tier, offer, freeze, and
//! the upgrade discount.

use log::debug;
use serde::{Deserialize, Serialize};

use super::pool::CardPool;
use crate::cards::Minion;
use crate::core::error::check_permutation;
use crate::core::{EconomyConfig, GameError, GameResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    tier: u8,
    cards: Vec<Minion>,
    frozen: bool,
    /// Turns since the last upgrade; subtracted from the upgrade cost.
    discount: u32,
}

impl Shop {
    /// Empty tier-1 shop.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tier: 1,
            cards: Vec::new(),
            frozen: false,
            discount: 0,
        }
    }

    #[must_use]
    pub fn tier(&self) -> u8 {
        self.tier
    }

    #[must_use]
    pub fn cards(&self) -> &[Minion] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub fn discount(&self) -> u32 {
        self.discount
    }

    /// New recruit turn: grow the discount, then keep a frozen offer
    /// (thawing it) or reroll.
    pub fn start_turn(&mut self, pool: &mut CardPool, economy: &EconomyConfig) {
        self.discount += 1;
        if self.frozen {
            self.frozen = false;
            debug!("shop thawed, keeping {} cards", self.cards.len());
        } else {
            self.reroll(pool, economy);
        }
    }

    /// Explicit reroll. Always unfreezes.
    pub fn refresh(&mut self, pool: &mut CardPool, economy: &EconomyConfig) {
        self.frozen = false;
        self.reroll(pool, economy);
    }

    fn reroll(&mut self, pool: &mut CardPool, economy: &EconomyConfig) {
        self.return_to_pool(pool);
        self.cards = pool.roll(self.tier, &[], economy.shop_size(self.tier));
    }

    /// Hand every offered card back to the pool.
    pub fn return_to_pool(&mut self, pool: &mut CardPool) {
        pool.return_minions(self.cards.drain(..));
    }

    /// Discounted cost of the next tier, floored at 0. `None` at max tier.
    #[must_use]
    pub fn upgrade_cost(&self, economy: &EconomyConfig) -> Option<u32> {
        economy
            .base_upgrade_cost(self.tier)
            .map(|cost| cost.saturating_sub(self.discount))
    }

    /// Raise the tier by one and reset the discount.
    pub fn upgrade(&mut self, economy: &EconomyConfig) -> GameResult<()> {
        if self.tier >= economy.max_tier {
            return Err(GameError::AlreadyMaxTier);
        }
        self.tier += 1;
        self.discount = 0;
        Ok(())
    }

    /// Take the offered card at `index`.
    pub fn buy_card(&mut self, index: usize) -> GameResult<Minion> {
        self.check_index(index)?;
        Ok(self.cards.remove(index))
    }

    pub fn check_index(&self, index: usize) -> GameResult<()> {
        if index < self.cards.len() {
            Ok(())
        } else {
            Err(GameError::InvalidIndex {
                index,
                len: self.cards.len(),
            })
        }
    }

    /// New slot `i` holds the card previously at `permutation[i]`.
    pub fn reorder(&mut self, permutation: &[usize]) -> GameResult<()> {
        check_permutation(permutation, self.cards.len())?;
        let mut slots: Vec<Option<Minion>> = self.cards.drain(..).map(Some).collect();
        self.cards = permutation
            .iter()
            .filter_map(|&from| slots[from].take())
            .collect();
        Ok(())
    }

    /// Flip the freeze flag; returns the new state.
    pub fn toggle_freeze(&mut self) -> bool {
        self.frozen = !self.frozen;
        self.frozen
    }
}

impl Default for Shop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardRegistry, CardTemplate, TemplateId};
    use crate::core::{GameRng, PoolConfig};
    use std::sync::Arc;

    fn pool() -> CardPool {
        let mut registry = CardRegistry::new();
        for id in 1..=4 {
            registry
                .register(CardTemplate::minion(TemplateId::new(id), format!("T1-{id}"), 1, 1, 1))
                .unwrap();
        }
        for id in 5..=8 {
            registry
                .register(CardTemplate::minion(TemplateId::new(id), format!("T2-{id}"), 2, 2, 2))
                .unwrap();
        }
        CardPool::new(Arc::new(registry), &PoolConfig::default(), GameRng::new(3))
    }

    #[test]
    fn test_start_turn_rolls_tier_sized_offer() {
        let mut pool = pool();
        let before = pool.total();
        let economy = EconomyConfig::default();
        let mut shop = Shop::new();

        shop.start_turn(&mut pool, &economy);
        assert_eq!(shop.len(), 3);
        assert_eq!(shop.discount(), 1);
        assert_eq!(pool.total() + shop.len() as u64, before);

        shop.start_turn(&mut pool, &economy);
        assert_eq!(shop.len(), 3);
        assert_eq!(pool.total() + 3, before);
    }

    #[test]
    fn test_frozen_shop_survives_one_turn() {
        let mut pool = pool();
        let economy = EconomyConfig::default();
        let mut shop = Shop::new();
        shop.start_turn(&mut pool, &economy);
        let offer = shop.cards().to_vec();

        assert!(shop.toggle_freeze());
        shop.start_turn(&mut pool, &economy);
        assert_eq!(shop.cards(), offer.as_slice());
        assert!(!shop.is_frozen());
        assert_eq!(shop.discount(), 2);
    }

    #[test]
    fn test_refresh_unfreezes() {
        let mut pool = pool();
        let economy = EconomyConfig::default();
        let mut shop = Shop::new();
        assert!(shop.toggle_freeze());
        shop.refresh(&mut pool, &economy);
        assert!(!shop.is_frozen());
        assert_eq!(shop.len(), 3);
    }

    #[test]
    fn test_upgrade_cost_and_discount() {
        let mut pool = pool();
        let economy = EconomyConfig::default();
        let mut shop = Shop::new();
        assert_eq!(shop.upgrade_cost(&economy), Some(5));
        for _ in 0..7 {
            shop.start_turn(&mut pool, &economy);
        }
        assert_eq!(shop.upgrade_cost(&economy), Some(0));

        shop.upgrade(&economy).unwrap();
        assert_eq!(shop.tier(), 2);
        assert_eq!(shop.discount(), 0);
        assert_eq!(shop.upgrade_cost(&economy), Some(7));

        for _ in 2..6 {
            shop.upgrade(&economy).unwrap();
        }
        assert_eq!(shop.upgrade_cost(&economy), None);
        assert_eq!(shop.upgrade(&economy), Err(GameError::AlreadyMaxTier));
    }

    #[test]
    fn test_buy_and_reorder_check_bounds() {
        let mut pool = pool();
        let economy = EconomyConfig::default();
        let mut shop = Shop::new();
        shop.start_turn(&mut pool, &economy);
        let ids: Vec<_> = shop.cards().iter().map(Minion::template_id).collect();

        assert_eq!(shop.reorder(&[0, 1]), Err(GameError::InvalidPermutation));
        shop.reorder(&[2, 1, 0]).unwrap();
        assert_eq!(shop.cards()[0].template_id(), ids[2]);

        assert!(matches!(shop.buy_card(3), Err(GameError::InvalidIndex { index: 3, len: 3 })));
        assert_eq!(shop.buy_card(0).unwrap().template_id(), ids[2]);
        assert_eq!(shop.len(), 2);
    }
}
