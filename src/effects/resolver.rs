//! Recruit-phase effect resolution.
//!
//! Spells and battlecries resolve here, against the acting player's
//! board. Changes are permanent. Discover is only signalled: opening an
//! offer needs the player's hand and the pool, so the caller handles it.

use std::sync::Arc;

use log::{debug, warn};

use super::effect::Effect;
use super::targeting::TargetSelector;
use crate::cards::{Catalog, Minion};
use crate::core::GameRng;
use crate::zones::Board;

/// Result of resolving one effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    /// The effect changed the board.
    Applied,
    /// Nothing to do: no legal target, full board, unknown template.
    Skipped,
    /// The caller must open a discover offer.
    Discover,
}

/// Where an effect comes from and what the player pointed at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolverContext {
    /// Board index of the minion that owns the effect.
    pub source: Option<usize>,
    /// Board index chosen by the player.
    pub chosen: Option<usize>,
}

pub struct EffectResolver<'a> {
    catalog: &'a dyn Catalog,
    rng: &'a mut GameRng,
}

impl<'a> EffectResolver<'a> {
    pub fn new(catalog: &'a dyn Catalog, rng: &'a mut GameRng) -> Self {
        Self { catalog, rng }
    }

    /// Resolve effects in order. Summons shift later minions right, so
    /// the source index is tracked across the batch.
    pub fn resolve_all<'e>(
        &mut self,
        board: &mut Board,
        effects: impl IntoIterator<Item = &'e Effect>,
        mut context: ResolverContext,
    ) -> Vec<ResolveResult> {
        let mut results = Vec::new();
        for effect in effects {
            let before = board.len();
            let result = self.resolve(board, effect, context);
            let summoned = board.len() - before;
            // Summons land right of the source, so only the chosen index
            // can shift.
            if let (Some(source), Some(chosen)) = (context.source, context.chosen) {
                if chosen > source {
                    context.chosen = Some(chosen + summoned);
                }
            }
            results.push(result);
        }
        results
    }

    pub fn resolve(&mut self, board: &mut Board, effect: &Effect, context: ResolverContext) -> ResolveResult {
        match effect {
            Effect::BuffStats {
                attack,
                health,
                target,
            } => {
                let targets = TargetSelector::select(board, *target, context.source, context.chosen, self.rng);
                for &i in &targets {
                    if let Some(minion) = board.get_mut(i) {
                        minion.buff(*attack, *health);
                    }
                }
                debug!("buff +{attack}/+{health} on {} minions", targets.len());
                Self::applied_if(!targets.is_empty())
            }

            Effect::GiveKeyword { keyword, target } => {
                let targets = TargetSelector::select(board, *target, context.source, context.chosen, self.rng);
                for &i in &targets {
                    if let Some(minion) = board.get_mut(i) {
                        minion.abilities.keywords.insert(*keyword);
                    }
                }
                debug!("give {keyword:?} to {} minions", targets.len());
                Self::applied_if(!targets.is_empty())
            }

            Effect::Summon { template, count } => {
                let Some(template) = self.catalog.by_template_id(*template) else {
                    warn!("summon of unknown {template} skipped");
                    return ResolveResult::Skipped;
                };
                let mut position = context.source.map_or(board.len(), |s| s + 1);
                let mut placed = 0;
                for _ in 0..*count {
                    if board.is_full() || !template.is_minion() {
                        break;
                    }
                    board.place_minion(Minion::new_summoned(Arc::clone(&template)), position);
                    position += 1;
                    placed += 1;
                }
                debug!("summoned {placed} x {}", template.name);
                Self::applied_if(placed > 0)
            }

            Effect::Discover => ResolveResult::Discover,
        }
    }

    fn applied_if(applied: bool) -> ResolveResult {
        if applied {
            ResolveResult::Applied
        } else {
            ResolveResult::Skipped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardRegistry, CardTemplate, Keyword, TemplateId};
    use crate::effects::EffectTarget;

    fn catalog() -> CardRegistry {
        let mut registry = CardRegistry::new();
        registry
            .register(CardTemplate::minion(TemplateId::new(1), "Cat", 1, 1, 1))
            .unwrap();
        registry
            .register(CardTemplate::minion(TemplateId::new(2), "Pup", 1, 1, 1).as_token())
            .unwrap();
        registry
    }

    fn board(n: usize) -> Board {
        let registry = catalog();
        let cat = registry.require(TemplateId::new(1)).unwrap();
        Board::from_minions((0..n).map(|_| Minion::new(Arc::clone(&cat))).collect())
    }

    #[test]
    fn test_buff_and_keyword() {
        let registry = catalog();
        let mut rng = GameRng::new(1);
        let mut resolver = EffectResolver::new(&registry, &mut rng);
        let mut board = board(3);

        let all = resolver.resolve(
            &mut board,
            &Effect::buff(1, 2, EffectTarget::AllFriendly),
            ResolverContext::default(),
        );
        assert_eq!(all, ResolveResult::Applied);
        assert!(board.iter().all(|m| (m.attack, m.health) == (2, 3)));

        let chosen = ResolverContext {
            source: None,
            chosen: Some(1),
        };
        resolver.resolve(&mut board, &Effect::give(Keyword::Taunt, EffectTarget::Chosen), chosen);
        assert!(board.get(1).unwrap().has(Keyword::Taunt));
        assert!(!board.get(0).unwrap().has(Keyword::Taunt));
    }

    #[test]
    fn test_summon_next_to_source_until_full() {
        let registry = catalog();
        let mut rng = GameRng::new(1);
        let mut resolver = EffectResolver::new(&registry, &mut rng);
        let mut board = board(5);

        let context = ResolverContext {
            source: Some(0),
            chosen: None,
        };
        let effect = Effect::Summon {
            template: TemplateId::new(2),
            count: 3,
        };
        assert_eq!(resolver.resolve(&mut board, &effect, context), ResolveResult::Applied);
        assert_eq!(board.len(), 7);
        assert_eq!(board.get(1).unwrap().template_id(), TemplateId::new(2));
        assert_eq!(board.get(2).unwrap().template_id(), TemplateId::new(2));
        assert_eq!(board.get(3).unwrap().template_id(), TemplateId::new(1));

        assert_eq!(resolver.resolve(&mut board, &effect, context), ResolveResult::Skipped);
    }

    #[test]
    fn test_chosen_index_tracks_summons() {
        let registry = catalog();
        let mut rng = GameRng::new(1);
        let mut resolver = EffectResolver::new(&registry, &mut rng);
        let mut board = board(3);

        let effects = [
            Effect::summon(TemplateId::new(2)),
            Effect::buff(5, 5, EffectTarget::Chosen),
        ];
        let context = ResolverContext {
            source: Some(0),
            chosen: Some(2),
        };
        let results = resolver.resolve_all(&mut board, &effects, context);
        assert_eq!(results, vec![ResolveResult::Applied, ResolveResult::Applied]);
        assert_eq!(board.get(3).unwrap().attack, 6);
    }

    #[test]
    fn test_discover_and_unknown_summon() {
        let registry = catalog();
        let mut rng = GameRng::new(1);
        let mut resolver = EffectResolver::new(&registry, &mut rng);
        let mut board = board(1);
        let context = ResolverContext::default();
        assert_eq!(resolver.resolve(&mut board, &Effect::Discover, context), ResolveResult::Discover);
        assert_eq!(
            resolver.resolve(&mut board, &Effect::summon(TemplateId::new(99)), context),
            ResolveResult::Skipped
        );
    }
}
