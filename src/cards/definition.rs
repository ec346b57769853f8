//! Card templates - immutable card data.
//!
//! A `CardTemplate` is loaded once per catalog and shared behind an
//! `Arc` by every minion or spell created from it. Instance state
//! (buffs, lost shields, golden status) lives in `Minion`.

use serde::{Deserialize, Serialize};

use super::tribe::{Tribe, TribeSet};
use crate::core::MAX_TIER;
use crate::effects::AbilitySet;

/// Identifies a template (e.g. "Alleycat"), not an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

impl TemplateId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Template({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Minion,
    Spell,
}

/// Overrides applied when three copies merge into a golden minion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenVariant {
    pub attack: i32,
    pub health: i32,
    #[serde(default)]
    pub abilities: AbilitySet,
}

/// Immutable card data.
///
/// ```
/// use tavern_core::cards::{CardTemplate, Keyword, TemplateId, Tribe};
///
/// let template = CardTemplate::minion(TemplateId::new(1), "Scallywag", 1, 2, 1)
///     .with_tribe(Tribe::Pirate)
///     .with_keyword(Keyword::Taunt);
/// assert!(template.validate().is_ok());
/// assert!(template.abilities.has(Keyword::Taunt));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub id: TemplateId,
    pub name: String,
    pub kind: CardKind,
    #[serde(default)]
    pub tribes: TribeSet,
    pub tier: u8,
    pub attack: i32,
    pub health: i32,
    pub cost: u32,
    #[serde(default)]
    pub abilities: AbilitySet,
    #[serde(default)]
    pub golden: Option<GoldenVariant>,
    /// Tokens only appear through summons; the pool never stocks them.
    #[serde(default)]
    pub token: bool,
}

impl CardTemplate {
    /// Minion template with the default buy cost of 3.
    #[must_use]
    pub fn minion(id: TemplateId, name: impl Into<String>, tier: u8, attack: i32, health: i32) -> Self {
        Self {
            id,
            name: name.into(),
            kind: CardKind::Minion,
            tribes: TribeSet::new(),
            tier,
            attack,
            health,
            cost: 3,
            abilities: AbilitySet::default(),
            golden: None,
            token: false,
        }
    }

    /// Spell template. Spells have no stats.
    #[must_use]
    pub fn spell(id: TemplateId, name: impl Into<String>, tier: u8, cost: u32) -> Self {
        Self {
            id,
            name: name.into(),
            kind: CardKind::Spell,
            tribes: TribeSet::new(),
            tier,
            attack: 0,
            health: 0,
            cost,
            abilities: AbilitySet::default(),
            golden: None,
            token: false,
        }
    }

    #[must_use]
    pub fn with_tribe(mut self, tribe: Tribe) -> Self {
        self.tribes.push(tribe);
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: super::Keyword) -> Self {
        self.abilities.keywords.insert(keyword);
        self
    }

    #[must_use]
    pub fn with_ability(mut self, trigger: crate::effects::Trigger, effect: crate::effects::Effect) -> Self {
        self.abilities = self.abilities.with_ability(trigger, effect);
        self
    }

    #[must_use]
    pub fn with_golden(mut self, golden: GoldenVariant) -> Self {
        self.golden = Some(golden);
        self
    }

    #[must_use]
    pub fn as_token(mut self) -> Self {
        self.token = true;
        self
    }

    #[must_use]
    pub fn is_minion(&self) -> bool {
        self.kind == CardKind::Minion
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        self.kind == CardKind::Spell
    }

    /// Golden stats and abilities: the override if present, otherwise
    /// doubled base stats with the base ability set.
    #[must_use]
    pub fn golden_variant(&self) -> GoldenVariant {
        match &self.golden {
            Some(golden) => golden.clone(),
            None => GoldenVariant {
                attack: self.attack * 2,
                health: self.health * 2,
                abilities: self.abilities.clone(),
            },
        }
    }

    /// Check the template invariants.
    ///
    /// Minions need tier in 1..=6, health > 0, attack >= 0, cost > 0.
    /// Trigger keywords and payloads must agree, golden override included.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_TIER).contains(&self.tier) {
            return Err(format!("tier {} outside 1..={MAX_TIER}", self.tier));
        }
        if self.is_minion() {
            if self.health <= 0 {
                return Err(format!("health {} must be positive", self.health));
            }
            if self.attack < 0 {
                return Err(format!("attack {} must not be negative", self.attack));
            }
            if self.cost == 0 {
                return Err("minion cost must be positive".to_string());
            }
        }
        self.abilities.check_payloads()?;
        if let Some(golden) = &self.golden {
            if golden.health <= 0 || golden.attack < 0 {
                return Err("golden stats out of range".to_string());
            }
            golden.abilities.check_payloads()?;
        }
        Ok(())
    }
}
