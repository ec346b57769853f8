//! Card instances - runtime card state.
//!
//! A `Minion` diverges from its template as it is buffed, loses its
//! shield, or goes golden. A `Spell` never changes. `Card` is what a hand
//! or a discover offer holds.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::definition::{CardTemplate, TemplateId};
use super::keywords::Keyword;
use super::tribe::Tribe;
use crate::core::CombatId;
use crate::effects::AbilitySet;

/// A creature instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minion {
    pub template: Arc<CardTemplate>,
    pub attack: i32,
    pub health: i32,
    pub golden: bool,
    pub abilities: AbilitySet,
    /// Assigned only while a battle is running. Serialized so replay
    /// snapshots keep their IDs.
    #[serde(default)]
    pub combat_id: CombatId,
    /// Created by an effect rather than drawn from the pool.
    #[serde(default)]
    pub summoned: bool,
}

impl Minion {
    /// Fresh, non-golden minion with template stats.
    #[must_use]
    pub fn new(template: Arc<CardTemplate>) -> Self {
        Self {
            attack: template.attack,
            health: template.health,
            golden: false,
            abilities: template.abilities.clone(),
            combat_id: CombatId::NONE,
            summoned: false,
            template,
        }
    }

    /// Fresh golden minion using the template's golden variant.
    #[must_use]
    pub fn new_golden(template: Arc<CardTemplate>) -> Self {
        let golden = template.golden_variant();
        Self {
            attack: golden.attack,
            health: golden.health,
            golden: true,
            abilities: golden.abilities,
            combat_id: CombatId::NONE,
            summoned: false,
            template,
        }
    }

    #[must_use]
    pub fn template_id(&self) -> TemplateId {
        self.template.id
    }

    #[must_use]
    pub fn tier(&self) -> u8 {
        self.template.tier
    }

    #[must_use]
    pub fn tribes(&self) -> &[Tribe] {
        &self.template.tribes
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Alive with positive attack.
    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.is_alive() && self.attack > 0
    }

    #[must_use]
    pub fn has(&self, keyword: Keyword) -> bool {
        self.abilities.has(keyword)
    }

    /// Fresh minion created by an effect. It never counts as a pool copy.
    #[must_use]
    pub fn new_summoned(template: Arc<CardTemplate>) -> Self {
        Self {
            summoned: true,
            ..Self::new(template)
        }
    }

    /// Only copies drawn from the pool go back to it.
    #[must_use]
    pub fn returns_to_pool(&self) -> bool {
        !self.golden && !self.summoned && !self.template.token
    }

    /// Add stats, never dropping attack below 0.
    pub fn buff(&mut self, attack: i32, health: i32) {
        self.attack = (self.attack + attack).max(0);
        self.health += health;
    }
}

/// A spell instance. Immutable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub template: Arc<CardTemplate>,
}

impl Spell {
    #[must_use]
    pub fn new(template: Arc<CardTemplate>) -> Self {
        Self { template }
    }

    #[must_use]
    pub fn template_id(&self) -> TemplateId {
        self.template.id
    }
}

/// Anything that can sit in a hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Card {
    Minion(Minion),
    Spell(Spell),
}

impl Card {
    /// Instantiate a template as the matching card kind.
    #[must_use]
    pub fn from_template(template: Arc<CardTemplate>) -> Self {
        if template.is_spell() {
            Card::Spell(Spell::new(template))
        } else {
            Card::Minion(Minion::new(template))
        }
    }

    #[must_use]
    pub fn is_minion(&self) -> bool {
        matches!(self, Card::Minion(_))
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        matches!(self, Card::Spell(_))
    }

    #[must_use]
    pub fn is_golden(&self) -> bool {
        matches!(self, Card::Minion(m) if m.golden)
    }

    #[must_use]
    pub fn template_id(&self) -> TemplateId {
        self.template().id
    }

    #[must_use]
    pub fn template(&self) -> &Arc<CardTemplate> {
        match self {
            Card::Minion(m) => &m.template,
            Card::Spell(s) => &s.template,
        }
    }

    #[must_use]
    pub fn as_minion(&self) -> Option<&Minion> {
        match self {
            Card::Minion(m) => Some(m),
            Card::Spell(_) => None,
        }
    }

    /// Whether the card goes back into the shared pool when released.
    ///
    /// Golden, token and summoned minions live outside the finite-copy
    /// economy, as do spells.
    #[must_use]
    pub fn returns_to_pool(&self) -> bool {
        matches!(self, Card::Minion(m) if m.returns_to_pool())
    }
}

impl From<Minion> for Card {
    fn from(minion: Minion) -> Self {
        Card::Minion(minion)
    }
}

impl From<Spell> for Card {
    fn from(spell: Spell) -> Self {
        Card::Spell(spell)
    }
}
