//! Effect payloads.
//!
//! Effects are data: a card template lists them, and the recruit-phase
//! resolver or the combat engine executes them. Buffs applied during
//! recruit are permanent; buffs applied in combat only touch the
//! combat clone.

use serde::{Deserialize, Serialize};

use crate::cards::{Keyword, TemplateId, Tribe};

/// Who an effect lands on. All targets are friendly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTarget {
    /// The minion that owns the ability. Spells have no self.
    SelfMinion,
    /// A board index supplied by the player action.
    Chosen,
    AllFriendly,
    RandomFriendly,
    /// Every friendly minion of the tribe (wildcards included).
    FriendlyTribe(Tribe),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    BuffStats {
        attack: i32,
        health: i32,
        target: EffectTarget,
    },
    GiveKeyword {
        keyword: Keyword,
        target: EffectTarget,
    },
    /// Summon `count` fresh minions of a template next to the source.
    Summon { template: TemplateId, count: u8 },
    /// Offer a choice of minions from one tier above the shop.
    Discover,
}

impl Effect {
    #[must_use]
    pub fn buff(attack: i32, health: i32, target: EffectTarget) -> Self {
        Effect::BuffStats {
            attack,
            health,
            target,
        }
    }

    #[must_use]
    pub fn give(keyword: Keyword, target: EffectTarget) -> Self {
        Effect::GiveKeyword { keyword, target }
    }

    #[must_use]
    pub fn summon(template: TemplateId) -> Self {
        Effect::Summon { template, count: 1 }
    }

    /// Target of the effect, if it has one.
    #[must_use]
    pub fn target(&self) -> Option<EffectTarget> {
        match self {
            Effect::BuffStats { target, .. } | Effect::GiveKeyword { target, .. } => Some(*target),
            Effect::Summon { .. } | Effect::Discover => None,
        }
    }

    #[must_use]
    pub fn needs_chosen_target(&self) -> bool {
        self.target() == Some(EffectTarget::Chosen)
    }
}
