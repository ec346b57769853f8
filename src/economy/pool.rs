//! The shared card pool.
//!
//! One pool per match holds the remaining copies of every purchasable
//! minion template. Draws decrement quantities immediately, returns
//! increment them, and nothing else touches the counts. Golden minions,
//! tokens, and spells live outside this economy: returning one is a
//! silent no-op.

use std::sync::Arc;

use im::OrdMap;
use log::{debug, trace};

use crate::cards::{Card, CardTemplate, Catalog, Minion, TemplateId, Tribe};
use crate::core::{GameRng, PoolConfig, MAX_TIER};

/// Finite, shared inventory of minion copies keyed by template.
///
/// ```
/// use std::sync::Arc;
/// use tavern_core::cards::{CardRegistry, CardTemplate, TemplateId};
/// use tavern_core::core::{GameRng, PoolConfig};
/// use tavern_core::economy::CardPool;
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardTemplate::minion(TemplateId::new(1), "Alleycat", 1, 1, 1)).unwrap();
///
/// let mut pool = CardPool::new(Arc::new(registry), &PoolConfig::default(), GameRng::new(1));
/// assert_eq!(pool.quantity(TemplateId::new(1)), 16);
///
/// let drawn = pool.roll(1, &[], 3);
/// assert_eq!(drawn.len(), 3);
/// assert_eq!(pool.quantity(TemplateId::new(1)), 13);
///
/// pool.return_minions(drawn);
/// assert_eq!(pool.total(), 16);
/// ```
#[derive(Clone)]
pub struct CardPool {
    catalog: Arc<dyn Catalog>,
    quantities: OrdMap<TemplateId, u32>,
    discover_count: usize,
    rng: GameRng,
}

impl CardPool {
    /// Stock every non-token minion in the catalog with its tier's copy count.
    pub fn new(catalog: Arc<dyn Catalog>, config: &PoolConfig, rng: GameRng) -> Self {
        let quantities = catalog
            .by_max_tier_and_tribes(MAX_TIER, &[])
            .iter()
            .map(|t| (t.id, config.copies_for_tier(t.tier)))
            .filter(|&(_, copies)| copies > 0)
            .collect();
        Self::with_quantities(catalog, quantities, config.discover_count, rng)
    }

    /// Pool with explicit quantities, e.g. restored from a snapshot.
    pub fn with_quantities(
        catalog: Arc<dyn Catalog>,
        quantities: OrdMap<TemplateId, u32>,
        discover_count: usize,
        rng: GameRng,
    ) -> Self {
        Self {
            catalog,
            quantities,
            discover_count,
            rng,
        }
    }

    /// Remaining copies of a template; 0 if it is not stocked.
    #[must_use]
    pub fn quantity(&self, template: TemplateId) -> u32 {
        self.quantities.get(&template).copied().unwrap_or(0)
    }

    /// Copies remaining across all templates.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.quantities.values().map(|&q| u64::from(q)).sum()
    }

    /// Cheap copy of the current quantities.
    #[must_use]
    pub fn snapshot(&self) -> OrdMap<TemplateId, u32> {
        self.quantities.clone()
    }

    /// Copies handed out per discover.
    #[must_use]
    pub fn discover_count(&self) -> usize {
        self.discover_count
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// The pool's random source, shared with recruit-phase effects.
    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// Draw up to `count` minions at or below `max_tier`.
    ///
    /// Every remaining copy is equally likely. A short (possibly empty)
    /// list comes back when the pool runs dry.
    pub fn roll(&mut self, max_tier: u8, tribes: &[Tribe], count: usize) -> Vec<Minion> {
        let candidates = self.catalog.by_max_tier_and_tribes(max_tier, tribes);
        let drawn = self.draw(candidates, count);
        debug!("pool roll: tier<={max_tier} asked {count} got {}", drawn.len());
        drawn
    }

    /// Draw a discover offer from exactly `tier`.
    pub fn roll_exact_tier(&mut self, tier: u8, tribes: &[Tribe]) -> Vec<Minion> {
        let candidates = self.catalog.by_tier_and_tribe(tier, tribes);
        let drawn = self.draw(candidates, self.discover_count);
        debug!("pool discover roll: tier={tier} got {}", drawn.len());
        drawn
    }

    fn draw(&mut self, mut candidates: Vec<Arc<CardTemplate>>, count: usize) -> Vec<Minion> {
        candidates.retain(|t| self.quantity(t.id) > 0);

        let mut drawn = Vec::with_capacity(count);
        while drawn.len() < count {
            let weights: Vec<u32> = candidates.iter().map(|t| self.quantity(t.id)).collect();
            let Some(pick) = self.rng.pick_weighted(&weights) else {
                break;
            };
            let template = &candidates[pick];
            let left = weights[pick] - 1;
            self.quantities.insert(template.id, left);
            drawn.push(Minion::new(Arc::clone(template)));
            if left == 0 {
                candidates.remove(pick);
            }
        }
        drawn
    }

    /// Put a minion back. Golden, token and summoned minions are dropped.
    pub fn return_minion(&mut self, minion: Minion) {
        if !minion.returns_to_pool() {
            trace!("pool drops {} (golden, token or summoned)", minion.template_id());
            return;
        }
        match self.quantities.get_mut(&minion.template_id()) {
            Some(quantity) => *quantity += 1,
            None => trace!("pool drops unstocked {}", minion.template_id()),
        }
    }

    pub fn return_minions(&mut self, minions: impl IntoIterator<Item = Minion>) {
        for minion in minions {
            self.return_minion(minion);
        }
    }

    /// Put a card back. Spells never re-enter the pool.
    pub fn return_card(&mut self, card: Card) {
        if let Card::Minion(minion) = card {
            self.return_minion(minion);
        }
    }

    pub fn return_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        for card in cards {
            self.return_card(card);
        }
    }
}

impl std::fmt::Debug for CardPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardPool")
            .field("quantities", &self.quantities)
            .field("discover_count", &self.discover_count)
            .finish_non_exhaustive()
    }
}
