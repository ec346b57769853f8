//! Player state and the recruit-phase actions.
//!
//! Every action validates first and mutates second, so an `Err` leaves
//! the player (and the pool) untouched. Actions that can bring a third
//! copy together run the triple check until nothing merges.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::cards::{Card, Catalog, Minion, Spell, TemplateId};
use crate::combat::Combatant;
use crate::core::{EconomyConfig, GameError, GameResult, PlayerId};
use crate::economy::{CardPool, Shop};
use crate::effects::{Effect, EffectResolver, ResolveResult, ResolverContext, Trigger};
use crate::zones::{Board, Hand};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    health: i32,
    gold: u32,
    max_gold: u32,
    shop: Shop,
    board: Board,
    hand: Hand,
    /// Offer awaiting a pick. At most one at a time.
    discover: Option<Vec<Card>>,
    economy: EconomyConfig,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, economy: &EconomyConfig) -> Self {
        Self {
            id,
            health: economy.starting_health,
            gold: economy.starting_gold,
            max_gold: economy.starting_gold,
            shop: Shop::new(),
            board: Board::new(economy.board_capacity),
            hand: Hand::new(economy.hand_capacity),
            discover: None,
            economy: economy.clone(),
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub fn gold(&self) -> u32 {
        self.gold
    }

    #[must_use]
    pub fn max_gold(&self) -> u32 {
        self.max_gold
    }

    #[must_use]
    pub fn tier(&self) -> u8 {
        self.shop.tier()
    }

    #[must_use]
    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    /// The open discover offer, if any.
    #[must_use]
    pub fn pending_discover(&self) -> Option<&[Card]> {
        self.discover.as_deref()
    }

    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.health <= 0
    }

    /// This player's side of a battle.
    #[must_use]
    pub fn combatant(&self) -> Combatant<'_> {
        Combatant {
            player: self.id,
            tier: self.tier(),
            board: &self.board,
        }
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.health = self
            .health
            .saturating_sub(i32::try_from(amount).unwrap_or(i32::MAX));
        debug!("{} takes {amount} damage, {} left", self.id, self.health);
    }

    /// Begin recruit turn `turn` (1-based): grow max gold past the first
    /// turn, refill gold, and roll the shop.
    pub fn start_turn(&mut self, turn: u32, pool: &mut CardPool) {
        if turn > 1 {
            self.max_gold = (self.max_gold + 1).min(self.economy.max_gold_cap);
        }
        self.gold = self.max_gold;
        self.shop.start_turn(pool, &self.economy);
        debug!("{} starts turn {turn} with {} gold", self.id, self.gold);
    }

    /// Close the recruit phase. An unpicked discover is forced.
    pub fn end_turn(&mut self, pool: &mut CardPool) {
        self.resolve_discover(pool);
    }

    fn spend(&mut self, cost: u32) -> GameResult<()> {
        if self.gold < cost {
            return Err(GameError::InsufficientGold {
                have: self.gold,
                need: cost,
            });
        }
        self.gold -= cost;
        Ok(())
    }

    fn check_board_index(&self, index: usize) -> GameResult<()> {
        if index < self.board.len() {
            Ok(())
        } else {
            Err(GameError::InvalidIndex {
                index,
                len: self.board.len(),
            })
        }
    }

    /// Buy the shop card at `index` into the hand.
    pub fn buy_card(&mut self, index: usize, pool: &mut CardPool) -> GameResult<()> {
        self.shop.check_index(index)?;
        if self.hand.is_full() {
            return Err(GameError::HandFull);
        }
        self.spend(self.economy.buy_cost)?;

        let minion = self.shop.buy_card(index)?;
        debug!("{} buys {}", self.id, minion.template.name);
        self.hand.push(minion.into())?;
        self.merge_triples(pool.catalog().as_ref());
        Ok(())
    }

    /// Sell the board minion at `index`, returning it to the pool.
    pub fn sell_minion(&mut self, index: usize, pool: &mut CardPool) -> GameResult<()> {
        self.check_board_index(index)?;
        let minion = self
            .board
            .remove_minion(index)
            .ok_or(GameError::InvalidIndex {
                index,
                len: self.board.len(),
            })?;
        self.gold = (self.gold + self.economy.sell_refund).min(self.max_gold);
        debug!("{} sells {}", self.id, minion.template.name);
        pool.return_minion(minion);
        Ok(())
    }

    /// Play the minion at `hand_index` onto the board at `position`.
    ///
    /// `target` is a board index (before placement) for a battlecry that
    /// needs one.
    pub fn place_minion(
        &mut self,
        hand_index: usize,
        position: usize,
        target: Option<usize>,
        pool: &mut CardPool,
    ) -> GameResult<()> {
        let card = self.hand.get(hand_index).ok_or(GameError::InvalidIndex {
            index: hand_index,
            len: self.hand.len(),
        })?;
        let minion = card.as_minion().ok_or(GameError::NotAMinion)?;
        if self.board.is_full() {
            return Err(GameError::BoardFull);
        }
        let battlecries: Vec<Effect> = minion.abilities.effects_for(Trigger::Battlecry).cloned().collect();
        self.check_effect_preconditions(&battlecries, target)?;

        let Card::Minion(minion) = self.hand.remove(hand_index)? else {
            return Err(GameError::NotAMinion);
        };
        debug!("{} places {} at {position}", self.id, minion.template.name);
        let placed = self.board.place_minion(minion, position);
        let chosen = target.map(|t| if t >= placed { t + 1 } else { t });
        let context = ResolverContext {
            source: Some(placed),
            chosen,
        };
        self.run_effects(&battlecries, context, pool);
        self.merge_triples(pool.catalog().as_ref());
        Ok(())
    }

    /// Move the board minion at `index` back to the hand.
    pub fn remove_minion(&mut self, index: usize) -> GameResult<()> {
        self.check_board_index(index)?;
        if self.hand.is_full() {
            return Err(GameError::HandFull);
        }
        if let Some(minion) = self.board.remove_minion(index) {
            self.hand.push(minion.into())?;
        }
        Ok(())
    }

    /// Cast the spell at `hand_index`.
    pub fn play_spell(&mut self, hand_index: usize, target: Option<usize>, pool: &mut CardPool) -> GameResult<()> {
        let card = self.hand.get(hand_index).ok_or(GameError::InvalidIndex {
            index: hand_index,
            len: self.hand.len(),
        })?;
        let Card::Spell(spell) = card else {
            return Err(GameError::NotASpell);
        };
        let name = spell.template.name.clone();
        let effects: Vec<Effect> = spell.template.abilities.effects_for(Trigger::OnPlay).cloned().collect();
        self.check_effect_preconditions(&effects, target)?;

        self.hand.remove(hand_index)?;
        debug!("{} casts {name}", self.id);
        let context = ResolverContext {
            source: None,
            chosen: target,
        };
        self.run_effects(&effects, context, pool);
        self.merge_triples(pool.catalog().as_ref());
        Ok(())
    }

    /// Reject before mutating: a second discover, or a chosen target
    /// that is missing or out of range.
    fn check_effect_preconditions(&self, effects: &[Effect], target: Option<usize>) -> GameResult<()> {
        if self.discover.is_some() && effects.iter().any(|e| matches!(e, Effect::Discover)) {
            return Err(GameError::DiscoverPending);
        }
        if effects.iter().any(Effect::needs_chosen_target) {
            match target {
                Some(index) => self.check_board_index(index)?,
                None if !self.board.is_empty() => return Err(GameError::MissingTarget),
                None => {}
            }
        }
        Ok(())
    }

    fn run_effects(&mut self, effects: &[Effect], context: ResolverContext, pool: &mut CardPool) {
        let catalog = Arc::clone(pool.catalog());
        let results = EffectResolver::new(catalog.as_ref(), pool.rng_mut()).resolve_all(
            &mut self.board,
            effects,
            context,
        );
        if results.contains(&ResolveResult::Discover) {
            self.open_discover(pool);
        }
    }

    /// Roll an offer from one tier above the shop.
    fn open_discover(&mut self, pool: &mut CardPool) {
        let tier = (self.tier() + 1).min(self.economy.max_tier);
        let offer: Vec<Card> = pool.roll_exact_tier(tier, &[]).into_iter().map(Card::from).collect();
        if offer.is_empty() {
            debug!("{} discover at tier {tier} found nothing", self.id);
            return;
        }
        debug!("{} discovers {} cards at tier {tier}", self.id, offer.len());
        self.discover = Some(offer);
    }

    /// Take offer card `index`; the rest go back to the pool.
    pub fn discover_pick(&mut self, index: usize, pool: &mut CardPool) -> GameResult<()> {
        let offer = self.discover.as_ref().ok_or(GameError::NoDiscoverPending)?;
        if index >= offer.len() {
            return Err(GameError::InvalidIndex {
                index,
                len: offer.len(),
            });
        }
        if self.hand.is_full() {
            return Err(GameError::HandFull);
        }

        let mut offer = self.discover.take().unwrap_or_default();
        let picked = offer.remove(index);
        pool.return_cards(offer);
        self.hand.push(picked)?;
        self.merge_triples(pool.catalog().as_ref());
        Ok(())
    }

    /// Force an unpicked discover: a random card if the hand has room,
    /// otherwise everything returns to the pool. Returns whether a card
    /// was taken.
    pub fn resolve_discover(&mut self, pool: &mut CardPool) -> bool {
        let Some(mut offer) = self.discover.take() else {
            return false;
        };
        if self.hand.is_full() {
            pool.return_cards(offer);
            return false;
        }
        let Some(pick) = pool.rng_mut().pick_index(offer.len()) else {
            return false;
        };
        let picked = offer.remove(pick);
        pool.return_cards(offer);
        let taken = self.hand.push(picked).is_ok();
        self.merge_triples(pool.catalog().as_ref());
        taken
    }

    /// Pay for and raise the shop tier.
    pub fn upgrade(&mut self) -> GameResult<()> {
        let cost = self.shop.upgrade_cost(&self.economy).ok_or(GameError::AlreadyMaxTier)?;
        self.spend(cost)?;
        self.shop.upgrade(&self.economy)?;
        debug!("{} upgrades to tier {} for {cost}", self.id, self.tier());
        Ok(())
    }

    /// Pay for a fresh shop offer.
    pub fn refresh(&mut self, pool: &mut CardPool) -> GameResult<()> {
        self.spend(self.economy.refresh_cost)?;
        self.shop.refresh(pool, &self.economy);
        Ok(())
    }

    pub fn toggle_freeze(&mut self) -> bool {
        self.shop.toggle_freeze()
    }

    pub fn reorder_board(&mut self, permutation: &[usize]) -> GameResult<()> {
        self.board.reorder(permutation)
    }

    pub fn reorder_shop(&mut self, permutation: &[usize]) -> GameResult<()> {
        self.shop.reorder(permutation)
    }

    fn merge_triples(&mut self, catalog: &dyn Catalog) {
        while self.check_triples(catalog) {}
    }

    /// Merge one set of three plain copies into a golden minion.
    ///
    /// The hand is scanned before the board. The first two copies
    /// removed (board before hand, highest index first) give the golden
    /// minion their summed attack and health; the third only counts.
    /// Returns whether a merge happened.
    pub fn check_triples(&mut self, catalog: &dyn Catalog) -> bool {
        let Some(template_id) = self.find_triple() else {
            return false;
        };

        let is_copy = |m: &Minion| !m.golden && m.template_id() == template_id;
        let mut hand_slots: Vec<usize> = self
            .hand
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_minion().is_some_and(is_copy))
            .map(|(i, _)| i)
            .collect();
        hand_slots.truncate(3);
        let mut board_slots: Vec<usize> = self
            .board
            .iter()
            .enumerate()
            .filter(|(_, m)| is_copy(m))
            .map(|(i, _)| i)
            .collect();
        board_slots.truncate(3 - hand_slots.len());

        let mut removed: Vec<Minion> = Vec::with_capacity(3);
        for &i in board_slots.iter().rev() {
            removed.extend(self.board.remove_minion(i));
        }
        for &i in hand_slots.iter().rev() {
            if let Ok(Card::Minion(minion)) = self.hand.remove(i) {
                removed.push(minion);
            }
        }

        let Some(first) = removed.first() else {
            return false;
        };
        let mut golden = Minion::new_golden(Arc::clone(&first.template));
        golden.attack = removed.iter().take(2).map(|m| m.attack).sum();
        golden.health = removed.iter().take(2).map(|m| m.health).sum();
        info!(
            "{} merges {} into a golden {}/{}",
            self.id, golden.template.name, golden.attack, golden.health
        );

        if self.hand.is_full() {
            let slot = board_slots.first().copied().unwrap_or(self.board.len());
            self.board.place_minion(golden, slot);
        } else if let Err(err) = self.hand.push(golden.into()) {
            warn!("{} loses golden minion: {err}", self.id);
        }

        self.grant_triple_reward(catalog);
        true
    }

    fn find_triple(&self) -> Option<TemplateId> {
        let hand = self.hand.iter().filter_map(Card::as_minion);
        hand.chain(self.board.iter())
            .filter(|m| !m.golden)
            .map(Minion::template_id)
            .find(|&id| {
                let on_board = self.board.iter().filter(|m| !m.golden && m.template_id() == id).count();
                self.hand.count_plain_copies(id) + on_board >= 3
            })
    }

    fn grant_triple_reward(&mut self, catalog: &dyn Catalog) {
        let Some(reward) = self.economy.triple_reward else {
            return;
        };
        if self.hand.is_full() {
            return;
        }
        match catalog.by_template_id(reward) {
            Some(template) if template.is_spell() => {
                if let Err(err) = self.hand.push(Spell::new(template).into()) {
                    warn!("{} misses triple reward: {err}", self.id);
                }
            }
            _ => debug!("triple reward {reward} is not a known spell"),
        }
    }

    /// Hand every card this player holds back to the pool, e.g. on
    /// elimination.
    pub fn release_cards(&mut self, pool: &mut CardPool) {
        self.shop.return_to_pool(pool);
        if let Some(offer) = self.discover.take() {
            pool.return_cards(offer);
        }
        while let Some(minion) = self.board.remove_minion(0) {
            pool.return_minion(minion);
        }
        while let Ok(card) = self.hand.remove(0) {
            pool.return_card(card);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardRegistry, CardTemplate};
    use crate::core::{GameRng, PoolConfig};
    use crate::effects::EffectTarget;

    const PIRATE: TemplateId = TemplateId::new(1);
    const WEAVER: TemplateId = TemplateId::new(2);
    const CAT: TemplateId = TemplateId::new(3);
    const PUP: TemplateId = TemplateId::new(4);
    const KNIGHT: TemplateId = TemplateId::new(10);
    const REWARD: TemplateId = TemplateId::new(90);
    const BANANA: TemplateId = TemplateId::new(91);

    fn registry() -> Arc<CardRegistry> {
        let mut registry = CardRegistry::new();
        for template in [
            CardTemplate::minion(PIRATE, "Pirate", 1, 2, 1),
            CardTemplate::minion(WEAVER, "Weaver", 1, 1, 3)
                .with_ability(Trigger::Battlecry, Effect::buff(1, 1, EffectTarget::Chosen)),
            CardTemplate::minion(CAT, "Cat", 1, 1, 1).with_ability(Trigger::Battlecry, Effect::summon(PUP)),
            CardTemplate::minion(PUP, "Pup", 1, 1, 1).as_token(),
            CardTemplate::minion(KNIGHT, "Knight", 2, 4, 4),
            CardTemplate::spell(REWARD, "Reward", 1, 0).with_ability(Trigger::OnPlay, Effect::Discover),
            CardTemplate::spell(BANANA, "Banana", 1, 1)
                .with_ability(Trigger::OnPlay, Effect::buff(2, 2, EffectTarget::Chosen)),
        ] {
            registry.register(template).unwrap();
        }
        Arc::new(registry)
    }

    fn setup(economy: EconomyConfig) -> (Player, CardPool) {
        let pool = CardPool::new(registry(), &PoolConfig::default(), GameRng::new(8));
        (Player::new(PlayerId::new(0), &economy), pool)
    }

    fn card(pool: &CardPool, id: TemplateId) -> Card {
        Card::from_template(pool.catalog().by_template_id(id).unwrap())
    }

    fn minion(pool: &CardPool, id: TemplateId) -> Minion {
        Minion::new(pool.catalog().by_template_id(id).unwrap())
    }

    #[test]
    fn test_merge_sums_first_two_removed() {
        let (mut player, pool) = setup(EconomyConfig::default());
        let mut buffed = minion(&pool, PIRATE);
        buffed.buff(3, 4);
        player.hand.push(buffed.into()).unwrap();
        player.hand.push(card(&pool, PIRATE)).unwrap();
        let mut on_board = minion(&pool, PIRATE);
        on_board.buff(1, 2);
        player.board.place_minion(on_board, 0);

        assert!(player.check_triples(pool.catalog().as_ref()));
        // Board 3/3 and hand[1] 2/1 are removed first; hand[0] only counts.
        let golden = player.hand.get(0).and_then(Card::as_minion).unwrap();
        assert!(golden.golden);
        assert_eq!((golden.attack, golden.health), (5, 4));
        assert_eq!(player.hand.len(), 1);
        assert!(player.board.is_empty());
        assert!(!player.check_triples(pool.catalog().as_ref()));
    }

    #[test]
    fn test_merge_lands_on_board_when_hand_full() {
        let economy = EconomyConfig {
            hand_capacity: 2,
            triple_reward: Some(REWARD),
            ..EconomyConfig::default()
        };
        let (mut player, pool) = setup(economy);
        player.hand.push(card(&pool, WEAVER)).unwrap();
        player.hand.push(card(&pool, WEAVER)).unwrap();
        player.board.place_minion(minion(&pool, KNIGHT), 0);
        for _ in 0..3 {
            player.board.place_minion(minion(&pool, PIRATE), 7);
        }

        assert!(player.check_triples(pool.catalog().as_ref()));
        assert_eq!(player.board.len(), 2);
        assert!(player.board.get(1).unwrap().golden);
        // No room for the reward.
        assert_eq!(player.hand.len(), 2);
    }

    #[test]
    fn test_merge_grants_reward() {
        let economy = EconomyConfig {
            triple_reward: Some(REWARD),
            ..EconomyConfig::default()
        };
        let (mut player, pool) = setup(economy);
        for _ in 0..3 {
            player.hand.push(card(&pool, PIRATE)).unwrap();
        }
        assert!(player.check_triples(pool.catalog().as_ref()));
        assert_eq!(player.hand.len(), 2);
        assert!(player.hand.get(1).unwrap().is_spell());
    }

    #[test]
    fn test_golden_copies_do_not_merge() {
        let (mut player, pool) = setup(EconomyConfig::default());
        player.hand.push(card(&pool, PIRATE)).unwrap();
        player.hand.push(card(&pool, PIRATE)).unwrap();
        player
            .hand
            .push(Minion::new_golden(pool.catalog().by_template_id(PIRATE).unwrap()).into())
            .unwrap();
        assert!(!player.check_triples(pool.catalog().as_ref()));
    }

    #[test]
    fn test_battlecry_buffs_chosen_target() {
        let (mut player, mut pool) = setup(EconomyConfig::default());
        player.board.place_minion(minion(&pool, PIRATE), 0);
        player.hand.push(card(&pool, WEAVER)).unwrap();

        assert_eq!(player.place_minion(0, 0, None, &mut pool), Err(GameError::MissingTarget));
        assert_eq!(
            player.place_minion(0, 0, Some(4), &mut pool),
            Err(GameError::InvalidIndex { index: 4, len: 1 })
        );
        assert_eq!(player.hand.len(), 1);

        player.place_minion(0, 0, Some(0), &mut pool).unwrap();
        let pirate = player.board.get(1).unwrap();
        assert_eq!((pirate.attack, pirate.health), (3, 2));
        assert_eq!(player.board.get(0).unwrap().template_id(), WEAVER);
    }

    #[test]
    fn test_battlecry_without_targets_fizzles() {
        let (mut player, mut pool) = setup(EconomyConfig::default());
        player.hand.push(card(&pool, WEAVER)).unwrap();
        player.place_minion(0, 0, None, &mut pool).unwrap();
        let weaver = player.board.get(0).unwrap();
        assert_eq!((weaver.attack, weaver.health), (1, 3));
    }

    #[test]
    fn test_battlecry_summons_token() {
        let (mut player, mut pool) = setup(EconomyConfig::default());
        player.hand.push(card(&pool, CAT)).unwrap();
        player.place_minion(0, 0, None, &mut pool).unwrap();
        let ids: Vec<_> = player.board.iter().map(Minion::template_id).collect();
        assert_eq!(ids, vec![CAT, PUP]);
    }

    #[test]
    fn test_spells() {
        let (mut player, mut pool) = setup(EconomyConfig::default());
        player.board.place_minion(minion(&pool, PIRATE), 0);
        player.hand.push(card(&pool, PIRATE)).unwrap();
        player.hand.push(card(&pool, BANANA)).unwrap();

        assert_eq!(player.play_spell(0, Some(0), &mut pool), Err(GameError::NotASpell));
        assert_eq!(player.place_minion(1, 0, None, &mut pool), Err(GameError::NotAMinion));

        player.play_spell(1, Some(0), &mut pool).unwrap();
        let pirate = player.board.get(0).unwrap();
        assert_eq!((pirate.attack, pirate.health), (4, 3));
        assert_eq!(player.hand.len(), 1);
    }

    #[test]
    fn test_one_discover_at_a_time() {
        let (mut player, mut pool) = setup(EconomyConfig::default());
        let before = pool.total();
        player.hand.push(card(&pool, REWARD)).unwrap();
        player.hand.push(card(&pool, REWARD)).unwrap();

        player.play_spell(0, None, &mut pool).unwrap();
        let offer = player.pending_discover().unwrap();
        assert_eq!(offer.len(), 3);
        assert!(offer.iter().all(|c| c.template().tier == 2));
        assert_eq!(player.play_spell(0, None, &mut pool), Err(GameError::DiscoverPending));
        assert_eq!(player.hand.len(), 1);

        player.discover_pick(1, &mut pool).unwrap();
        assert!(player.pending_discover().is_none());
        assert_eq!(player.hand.len(), 2);
        assert_eq!(pool.total(), before - 1);
        assert_eq!(player.discover_pick(0, &mut pool), Err(GameError::NoDiscoverPending));
    }

    #[test]
    fn test_forced_discover_with_full_hand_returns_all() {
        let economy = EconomyConfig {
            hand_capacity: 1,
            ..EconomyConfig::default()
        };
        let (mut player, mut pool) = setup(economy);
        let before = pool.total();
        player.hand.push(card(&pool, REWARD)).unwrap();
        player.play_spell(0, None, &mut pool).unwrap();
        player.hand.push(card(&pool, PIRATE)).unwrap();

        assert_eq!(player.discover_pick(0, &mut pool), Err(GameError::HandFull));
        player.end_turn(&mut pool);
        assert!(player.pending_discover().is_none());
        assert_eq!(pool.total(), before);
    }

    #[test]
    fn test_release_cards_returns_everything_stocked() {
        let (mut player, mut pool) = setup(EconomyConfig::default());
        let before = pool.total();
        player.start_turn(1, &mut pool);
        player.buy_card(0, &mut pool).unwrap();
        player.place_minion(0, 0, None, &mut pool).unwrap();
        player.release_cards(&mut pool);
        assert_eq!(pool.total(), before);
        assert!(player.board.is_empty() && player.hand.is_empty() && player.shop.is_empty());
    }
}
