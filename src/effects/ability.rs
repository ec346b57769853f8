//! Triggered abilities and the per-minion ability set.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::effect::Effect;
use crate::cards::{Keyword, Keywords};

/// When an ability fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// When the minion is played from hand to the board.
    Battlecry,
    /// When the minion dies in combat.
    Deathrattle,
    /// When the spell is cast.
    OnPlay,
}

impl Trigger {
    /// Keyword that flags this trigger on a card, if any.
    #[must_use]
    pub const fn keyword(self) -> Option<Keyword> {
        match self {
            Trigger::Battlecry => Some(Keyword::Battlecry),
            Trigger::Deathrattle => Some(Keyword::Deathrattle),
            Trigger::OnPlay => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub trigger: Trigger,
    pub effect: Effect,
}

impl Ability {
    #[must_use]
    pub fn new(trigger: Trigger, effect: Effect) -> Self {
        Self { trigger, effect }
    }
}

/// Keywords plus triggered abilities.
///
/// Cloned from the template when a minion is created; every instance may
/// gain or lose keywords independently afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySet {
    #[serde(default)]
    pub keywords: Keywords,
    #[serde(default)]
    pub abilities: SmallVec<[Ability; 2]>,
}

impl AbilitySet {
    #[must_use]
    pub fn new(keywords: Keywords) -> Self {
        Self {
            keywords,
            abilities: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_ability(mut self, trigger: Trigger, effect: Effect) -> Self {
        if let Some(keyword) = trigger.keyword() {
            self.keywords.insert(keyword);
        }
        self.abilities.push(Ability::new(trigger, effect));
        self
    }

    #[must_use]
    pub fn has(&self, keyword: Keyword) -> bool {
        self.keywords.has(keyword)
    }

    /// Effects fired by `trigger`, in declaration order.
    pub fn effects_for(&self, trigger: Trigger) -> impl Iterator<Item = &Effect> {
        self.abilities
            .iter()
            .filter(move |a| a.trigger == trigger)
            .map(|a| &a.effect)
    }

    /// Keyword/payload consistency: a trigger keyword is set exactly when
    /// an ability with that trigger exists.
    pub fn check_payloads(&self) -> Result<(), String> {
        for trigger in [Trigger::Battlecry, Trigger::Deathrattle] {
            let Some(keyword) = trigger.keyword() else {
                continue;
            };
            let flagged = self.keywords.has(keyword);
            let carried = self.effects_for(trigger).next().is_some();
            if flagged != carried {
                return Err(format!(
                    "{keyword:?} keyword {} but {} payload",
                    if flagged { "set" } else { "unset" },
                    if carried { "has a" } else { "has no" }
                ));
            }
        }
        Ok(())
    }
}
