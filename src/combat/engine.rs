//! The battle simulator.
//!
//! Two sides take turns attacking until one is empty or nobody can
//! attack. Each side keeps a round-robin cursor, so attackers go left to
//! right and wrap, unaffected by removals on the other side. The input
//! boards are cloned; nothing outside the engine is mutated.

use std::sync::Arc;

use log::{debug, info, trace, warn};
use smallvec::SmallVec;

use super::event::{CombatEvent, DeathReason};
use super::result::{CombatOutcome, SideSummary};
use crate::cards::{Catalog, Keyword, Minion, TemplateId};
use crate::core::{CombatConfig, CombatId, CombatIdAllocator, GameRng, PlayerId};
use crate::effects::{Effect, EffectTarget, TargetSelector, Trigger};
use crate::zones::Board;

/// One player's entry into a battle.
#[derive(Clone, Copy, Debug)]
pub struct Combatant<'a> {
    pub player: PlayerId,
    pub tier: u8,
    pub board: &'a Board,
}

#[derive(Clone, Debug)]
struct Side {
    player: PlayerId,
    tier: u8,
    board: Board,
    initial: Board,
    /// Next board index to consider when picking an attacker.
    cursor: usize,
}

pub struct CombatEngine {
    sides: [Side; 2],
    /// Index into `sides` of the side whose turn it is.
    attacker: usize,
    first_attacker: usize,
    rng: GameRng,
    ids: CombatIdAllocator,
    catalog: Arc<dyn Catalog>,
    max_iterations: u32,
    events: Vec<CombatEvent>,
    /// Minions hit by the poison path since the last removal pass.
    poisoned: SmallVec<[CombatId; 2]>,
}

impl CombatEngine {
    /// Clone both boards, tag every minion with a combat ID (`first`'s
    /// board, then `second`'s), snapshot, and flip for the first attack.
    pub fn new(
        first: Combatant<'_>,
        second: Combatant<'_>,
        catalog: Arc<dyn Catalog>,
        config: &CombatConfig,
        mut rng: GameRng,
    ) -> Self {
        let mut ids = CombatIdAllocator::new();
        let mut enter = |combatant: Combatant<'_>| {
            let mut board = combatant.board.clone();
            for minion in board.iter_mut() {
                minion.combat_id = ids.alloc();
            }
            Side {
                player: combatant.player,
                tier: combatant.tier,
                initial: board.clone(),
                board,
                cursor: 0,
            }
        };
        let sides = [enter(first), enter(second)];
        let attacker = usize::from(rng.gen_bool(0.5));
        debug!(
            "combat {} ({} minions) vs {} ({} minions), {} attacks first",
            sides[0].player,
            sides[0].board.len(),
            sides[1].player,
            sides[1].board.len(),
            sides[attacker].player
        );

        Self {
            sides,
            attacker,
            first_attacker: attacker,
            rng,
            ids,
            catalog,
            max_iterations: config.max_iterations,
            events: Vec::new(),
            poisoned: SmallVec::new(),
        }
    }

    /// Fight to the end.
    pub fn run(mut self) -> CombatOutcome {
        let mut iterations = 0;
        let mut capped = false;

        while !self.is_over() {
            if iterations >= self.max_iterations {
                warn!(
                    "combat {} vs {} hit the {}-iteration cap, scoring a draw",
                    self.sides[0].player, self.sides[1].player, self.max_iterations
                );
                capped = true;
                break;
            }
            if !self.sides[self.attacker].board.any_can_attack() {
                self.attacker = 1 - self.attacker;
                continue;
            }
            iterations += 1;
            self.take_turn();
            self.attacker = 1 - self.attacker;
        }

        self.finish(capped)
    }

    fn is_over(&self) -> bool {
        self.sides.iter().any(|s| s.board.living_count() == 0)
            || !self.sides.iter().any(|s| s.board.any_can_attack())
    }

    fn take_turn(&mut self) {
        let (att, def) = (self.attacker, 1 - self.attacker);
        let Some(index) = self.next_attacker(att) else {
            return;
        };
        let Some(attacker) = self.sides[att].board.get(index) else {
            return;
        };
        let attacker_id = attacker.combat_id;
        let swings = if attacker.has(Keyword::Windfury) { 2 } else { 1 };

        for _ in 0..swings {
            let Some(a_idx) = self.sides[att].board.position_of(attacker_id) else {
                break;
            };
            if !self.sides[att].board.get(a_idx).is_some_and(Minion::can_attack) {
                break;
            }
            let Some(d_idx) = self.sides[def].board.pick_defender(&mut self.rng) else {
                trace!("{attacker_id} has no legal target");
                break;
            };
            self.exchange(att, a_idx, d_idx);
            self.remove_dead(att);
        }
    }

    /// Round-robin from the side's cursor, skipping minions that cannot
    /// attack.
    fn next_attacker(&mut self, side: usize) -> Option<usize> {
        let side = &mut self.sides[side];
        let len = side.board.len();
        for step in 0..len {
            let index = (side.cursor + step) % len;
            if side.board.get(index).is_some_and(Minion::can_attack) {
                side.cursor = index + 1;
                return Some(index);
            }
        }
        None
    }

    /// Simultaneous hits, then the poison check per source.
    fn exchange(&mut self, att: usize, a_idx: usize, d_idx: usize) {
        let def = 1 - att;
        let (attacker_player, defender_player) = (self.sides[att].player, self.sides[def].player);

        let Some(attacker) = self.sides[att].board.get_mut(a_idx) else {
            return;
        };
        if attacker.abilities.keywords.remove(Keyword::Stealth) {
            self.events.push(CombatEvent::KeywordRemoved {
                target: attacker.combat_id,
                player: attacker_player,
                keyword: Keyword::Stealth,
            });
        }
        let (a_id, a_attack, a_toxic) = (attacker.combat_id, attacker.attack, is_toxic(attacker));

        let Some(defender) = self.sides[def].board.get(d_idx) else {
            return;
        };
        let (d_id, d_attack, d_toxic) = (defender.combat_id, defender.attack, is_toxic(defender));

        trace!("{a_id} ({a_attack} atk) attacks {d_id} ({d_attack} atk)");
        self.events.push(CombatEvent::Attack {
            attacker: a_id,
            attacker_player,
            defender: d_id,
            defender_player,
        });

        let to_defender = self.hit(def, d_idx, a_attack);
        let to_attacker = self.hit(att, a_idx, d_attack);

        if a_toxic && to_defender > 0 {
            self.poison(def, d_idx);
            self.spend_venom(att, a_idx);
        }
        if d_toxic && to_attacker > 0 {
            self.poison(att, a_idx);
            self.spend_venom(def, d_idx);
        }
    }

    /// Apply one hit. Divine Shield absorbs it whole. Returns the damage
    /// actually dealt.
    fn hit(&mut self, side: usize, index: usize, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let player = self.sides[side].player;
        let Some(minion) = self.sides[side].board.get_mut(index) else {
            return 0;
        };
        if minion.abilities.keywords.remove(Keyword::DivineShield) {
            self.events.push(CombatEvent::KeywordRemoved {
                target: minion.combat_id,
                player,
                keyword: Keyword::DivineShield,
            });
            return 0;
        }
        minion.health -= amount;
        self.events.push(CombatEvent::Damage {
            target: minion.combat_id,
            player,
            amount,
            health: minion.health,
        });
        amount
    }

    fn poison(&mut self, side: usize, index: usize) {
        if let Some(minion) = self.sides[side].board.get_mut(index) {
            if minion.is_alive() {
                minion.health = 0;
            }
            trace!("{} poisoned", minion.combat_id);
            self.poisoned.push(minion.combat_id);
        }
    }

    fn spend_venom(&mut self, side: usize, index: usize) {
        let player = self.sides[side].player;
        if let Some(minion) = self.sides[side].board.get_mut(index) {
            if minion.abilities.keywords.remove(Keyword::Venomous) {
                self.events.push(CombatEvent::KeywordRemoved {
                    target: minion.combat_id,
                    player,
                    keyword: Keyword::Venomous,
                });
            }
        }
    }

    /// Clear the dead from both boards, `first` side first.
    fn remove_dead(&mut self, first: usize) {
        for side in [first, 1 - first] {
            while let Some(index) = self.sides[side].board.iter().position(|m| !m.is_alive()) {
                self.bury(side, index);
            }
        }
        self.poisoned.clear();
    }

    fn bury(&mut self, side: usize, index: usize) {
        let player = self.sides[side].player;
        let before_cursor = index < self.sides[side].cursor;
        let Some(dead) = self.sides[side].board.remove_minion(index) else {
            return;
        };
        if before_cursor {
            self.sides[side].cursor -= 1;
        }

        let reason = if self.poisoned.contains(&dead.combat_id) {
            DeathReason::Poison
        } else {
            DeathReason::Damage
        };
        trace!("{} dies ({reason:?})", dead.combat_id);
        self.events.push(CombatEvent::Death {
            target: dead.combat_id,
            player,
            reason,
        });

        let mut position = index;
        for effect in dead.abilities.effects_for(Trigger::Deathrattle) {
            match effect {
                Effect::Summon { template, count } => {
                    for _ in 0..*count {
                        if self.summon(side, *template, position, before_cursor).is_some() {
                            position += 1;
                        }
                    }
                }
                Effect::BuffStats {
                    attack,
                    health,
                    target,
                } => {
                    // Nobody chooses in combat.
                    let target = match target {
                        EffectTarget::Chosen => EffectTarget::RandomFriendly,
                        other => *other,
                    };
                    let targets = TargetSelector::select(&self.sides[side].board, target, None, None, &mut self.rng);
                    for i in targets {
                        if let Some(minion) = self.sides[side].board.get_mut(i) {
                            minion.buff(*attack, *health);
                            self.events.push(CombatEvent::Buff {
                                target: minion.combat_id,
                                player,
                                attack: *attack,
                                health: *health,
                            });
                        }
                    }
                }
                other => trace!("deathrattle {other:?} does nothing in combat"),
            }
        }

        if dead.has(Keyword::Reborn) {
            self.reborn(side, &dead, index, before_cursor);
        }
    }

    fn place(&mut self, side: usize, mut minion: Minion, position: usize, before_cursor: bool) -> Option<(CombatId, usize)> {
        let side = &mut self.sides[side];
        if side.board.is_full() {
            return None;
        }
        let id = self.ids.alloc();
        minion.combat_id = id;
        let index = side.board.place_minion(minion, position);
        if before_cursor {
            side.cursor += 1;
        }
        Some((id, index))
    }

    fn summon(&mut self, side: usize, template: TemplateId, position: usize, before_cursor: bool) -> Option<CombatId> {
        let Some(template) = self.catalog.by_template_id(template).filter(|t| t.is_minion()) else {
            warn!("deathrattle summons unknown minion {template}");
            return None;
        };
        let template_id = template.id;
        let (id, index) = self.place(side, Minion::new_summoned(template), position, before_cursor)?;
        self.events.push(CombatEvent::Summon {
            minion: id,
            player: self.sides[side].player,
            template: template_id,
            position: index,
        });
        Some(id)
    }

    /// Bring `dead` back at 1 health, without Reborn, in its old slot.
    fn reborn(&mut self, side: usize, dead: &Minion, position: usize, before_cursor: bool) {
        let template = Arc::clone(&dead.template);
        let mut minion = if dead.golden {
            Minion::new_golden(template)
        } else {
            Minion::new(template)
        };
        minion.health = 1;
        minion.abilities.keywords.remove(Keyword::Reborn);

        if let Some((id, index)) = self.place(side, minion, position, before_cursor) {
            trace!("{} reborn as {id}", dead.combat_id);
            self.events.push(CombatEvent::Reborn {
                minion: id,
                original: dead.combat_id,
                player: self.sides[side].player,
                position: index,
            });
        }
    }

    fn finish(self, capped: bool) -> CombatOutcome {
        let first_attacker = self.sides[self.first_attacker].player;
        let [a, b] = self.sides;
        let summary = |side: Side| SideSummary {
            player: side.player,
            tier: side.tier,
            initial: side.initial,
            survivors: side.board,
        };
        let outcome = CombatOutcome {
            sides: [summary(a), summary(b)],
            first_attacker,
            events: self.events,
            capped,
        };
        match outcome.winner() {
            Some(winner) => info!("combat won by {winner} for {} damage", outcome.damage()),
            None => info!("combat drawn"),
        }
        outcome
    }
}

fn is_toxic(minion: &Minion) -> bool {
    minion.has(Keyword::Poisonous) || minion.has(Keyword::Venomous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardRegistry, CardTemplate};

    fn registry() -> Arc<CardRegistry> {
        let mut registry = CardRegistry::new();
        registry
            .register(CardTemplate::minion(TemplateId::new(100), "Token", 1, 1, 1).as_token())
            .unwrap();
        Arc::new(registry)
    }

    fn minion(id: u32, tier: u8, attack: i32, health: i32) -> Minion {
        Minion::new(Arc::new(CardTemplate::minion(TemplateId::new(id), format!("M{id}"), tier, attack, health)))
    }

    fn fight(a: &Board, b: &Board, seed: u64) -> CombatOutcome {
        let first = Combatant {
            player: PlayerId::new(0),
            tier: 1,
            board: a,
        };
        let second = Combatant {
            player: PlayerId::new(1),
            tier: 1,
            board: b,
        };
        CombatEngine::new(first, second, registry(), &CombatConfig::default(), GameRng::new(seed)).run()
    }

    #[test]
    fn test_ids_assigned_first_board_first() {
        let a = Board::from_minions(vec![minion(1, 1, 1, 1), minion(2, 1, 1, 1)]);
        let b = Board::from_minions(vec![minion(3, 1, 1, 1)]);
        let outcome = fight(&a, &b, 1);
        let ids = |board: &Board| board.iter().map(|m| m.combat_id.raw()).collect::<Vec<_>>();
        assert_eq!(ids(&outcome.sides[0].initial), vec![1, 2]);
        assert_eq!(ids(&outcome.sides[1].initial), vec![3]);
        // Inputs untouched.
        assert!(a.iter().all(|m| m.combat_id == CombatId::NONE));
    }

    #[test]
    fn test_empty_side_ends_immediately() {
        let a = Board::from_minions(vec![minion(1, 2, 1, 1)]);
        let outcome = fight(&a, &Board::default(), 1);
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.winner(), Some(PlayerId::new(0)));
        assert_eq!(outcome.damage(), 1 + 2);
    }

    #[test]
    fn test_zero_attack_stalemate_is_draw() {
        let a = Board::from_minions(vec![minion(1, 1, 0, 3)]);
        let b = Board::from_minions(vec![minion(2, 1, 0, 3)]);
        let outcome = fight(&a, &b, 1);
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.winner(), None);
        assert_eq!(outcome.damage(), 0);
    }

    #[test]
    fn test_poison_kills_through_health() {
        let mut snake = minion(1, 1, 1, 10);
        snake.abilities.keywords.insert(Keyword::Poisonous);
        let a = Board::from_minions(vec![snake]);
        let b = Board::from_minions(vec![minion(2, 1, 1, 50)]);
        let outcome = fight(&a, &b, 3);

        assert_eq!(outcome.winner(), Some(PlayerId::new(0)));
        assert!(outcome.events.iter().any(|e| matches!(
            e,
            CombatEvent::Death {
                reason: DeathReason::Poison,
                ..
            }
        )));
    }

    #[test]
    fn test_venomous_is_spent() {
        let mut spider = minion(1, 1, 1, 10);
        spider.abilities.keywords.insert(Keyword::Venomous);
        let a = Board::from_minions(vec![spider]);
        let b = Board::from_minions(vec![minion(2, 1, 1, 5), minion(3, 1, 1, 5)]);
        let outcome = fight(&a, &b, 9);

        let spent = outcome
            .events
            .iter()
            .filter(|e| matches!(e, CombatEvent::KeywordRemoved { keyword: Keyword::Venomous, .. }))
            .count();
        assert_eq!(spent, 1);
        let poison_deaths = outcome
            .events
            .iter()
            .filter(|e| matches!(e, CombatEvent::Death { reason: DeathReason::Poison, .. }))
            .count();
        assert_eq!(poison_deaths, 1);
    }

    #[test]
    fn test_stealth_breaks_on_attack() {
        let mut rogue = minion(1, 1, 5, 5);
        rogue.abilities.keywords.insert(Keyword::Stealth);
        let a = Board::from_minions(vec![rogue]);
        let b = Board::from_minions(vec![minion(2, 1, 1, 1)]);
        let outcome = fight(&a, &b, 4);
        assert_eq!(outcome.winner(), Some(PlayerId::new(0)));
        assert!(outcome.events.iter().any(|e| matches!(
            e,
            CombatEvent::KeywordRemoved {
                keyword: Keyword::Stealth,
                ..
            }
        )));
    }

    #[test]
    fn test_reborn_returns_at_one_health() {
        let mut phoenix = minion(1, 1, 1, 1);
        phoenix.abilities.keywords.insert(Keyword::Reborn);
        let a = Board::from_minions(vec![phoenix]);
        let b = Board::from_minions(vec![minion(2, 1, 1, 5)]);
        let outcome = fight(&a, &b, 2);

        let reborn: Vec<_> = outcome
            .events
            .iter()
            .filter(|e| matches!(e, CombatEvent::Reborn { .. }))
            .collect();
        assert_eq!(reborn.len(), 1);
        // The reborn copy dies on its next trade and does not come back.
        assert_eq!(outcome.winner(), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_deathrattle_summons_in_place() {
        let template = CardTemplate::minion(TemplateId::new(1), "Egg", 1, 1, 1).with_ability(
            Trigger::Deathrattle,
            Effect::Summon {
                template: TemplateId::new(100),
                count: 2,
            },
        );
        let a = Board::from_minions(vec![Minion::new(Arc::new(template))]);
        let b = Board::from_minions(vec![minion(2, 1, 1, 10)]);
        let outcome = fight(&a, &b, 6);

        let summons: Vec<usize> = outcome
            .events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::Summon { position, .. } => Some(*position),
                _ => None,
            })
            .collect();
        assert_eq!(summons, vec![0, 1]);
    }

    #[test]
    fn test_deathrattle_buff_only_touches_clone() {
        let template = CardTemplate::minion(TemplateId::new(1), "Martyr", 1, 1, 1)
            .with_ability(Trigger::Deathrattle, Effect::buff(2, 2, EffectTarget::AllFriendly));
        let a = Board::from_minions(vec![Minion::new(Arc::new(template)), minion(5, 1, 0, 20)]);
        let b = Board::from_minions(vec![minion(2, 1, 1, 1)]);
        let outcome = fight(&a, &b, 11);

        assert!(outcome.events.iter().any(|e| matches!(e, CombatEvent::Buff { .. })));
        assert_eq!(a.get(1).unwrap().attack, 0);
    }
}
