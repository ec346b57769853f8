//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tavern_core::cards::{CardRegistry, CardTemplate, Keyword, Minion, TemplateId, Tribe};
use tavern_core::effects::{Effect, EffectTarget, Trigger};

pub const ALLEYCAT: TemplateId = TemplateId::new(1);
pub const SCALLYWAG: TemplateId = TemplateId::new(2);
pub const IMP: TemplateId = TemplateId::new(3);
pub const SHIELD_BOT: TemplateId = TemplateId::new(4);
pub const WRATH_WEAVER: TemplateId = TemplateId::new(5);
pub const KNIGHT: TemplateId = TemplateId::new(10);
pub const HARPY: TemplateId = TemplateId::new(11);
pub const SNAKE: TemplateId = TemplateId::new(12);
pub const GIANT: TemplateId = TemplateId::new(20);
pub const DRAKE: TemplateId = TemplateId::new(21);
pub const PUP: TemplateId = TemplateId::new(100);
pub const TRIPLE_REWARD: TemplateId = TemplateId::new(900);
pub const BANANA: TemplateId = TemplateId::new(901);

/// A small but complete catalog: three tiers of minions, a token, a
/// discover spell, and a targeted buff spell.
pub fn registry() -> CardRegistry {
    let templates = vec![
        CardTemplate::minion(ALLEYCAT, "Alleycat", 1, 1, 1)
            .with_tribe(Tribe::Beast)
            .with_ability(Trigger::Battlecry, Effect::summon(PUP)),
        CardTemplate::minion(SCALLYWAG, "Scallywag", 1, 2, 1).with_tribe(Tribe::Pirate),
        CardTemplate::minion(IMP, "Imp", 1, 1, 3).with_tribe(Tribe::Demon),
        CardTemplate::minion(SHIELD_BOT, "Shield Bot", 1, 1, 1)
            .with_tribe(Tribe::Mech)
            .with_keyword(Keyword::DivineShield),
        CardTemplate::minion(WRATH_WEAVER, "Wrath Weaver", 1, 1, 3)
            .with_ability(Trigger::Battlecry, Effect::buff(1, 1, EffectTarget::Chosen)),
        CardTemplate::minion(KNIGHT, "Knight", 2, 4, 4).with_keyword(Keyword::Taunt),
        CardTemplate::minion(HARPY, "Harpy", 2, 2, 2).with_keyword(Keyword::Windfury),
        CardTemplate::minion(SNAKE, "Snake", 2, 1, 1).with_keyword(Keyword::Poisonous),
        CardTemplate::minion(GIANT, "Giant", 3, 6, 6),
        CardTemplate::minion(DRAKE, "Drake", 3, 3, 5).with_tribe(Tribe::Dragon),
        CardTemplate::minion(PUP, "Pup", 1, 1, 1).with_tribe(Tribe::Beast).as_token(),
        CardTemplate::spell(TRIPLE_REWARD, "Triple Reward", 1, 0).with_ability(Trigger::OnPlay, Effect::Discover),
        CardTemplate::spell(BANANA, "Banana", 1, 1)
            .with_ability(Trigger::OnPlay, Effect::buff(2, 2, EffectTarget::Chosen)),
    ];

    let mut registry = CardRegistry::new();
    for template in templates {
        registry.register(template).expect("fixture template is valid");
    }
    registry
}

pub fn catalog() -> Arc<CardRegistry> {
    Arc::new(registry())
}

pub fn minion(id: TemplateId) -> Minion {
    let template = registry().require(id).expect("fixture template exists");
    Minion::new(template)
}

/// A throwaway minion with the given stats.
pub fn vanilla(id: u32, tier: u8, attack: i32, health: i32) -> Minion {
    Minion::new(Arc::new(CardTemplate::minion(
        TemplateId::new(id),
        format!("Vanilla {id}"),
        tier,
        attack,
        health,
    )))
}
