//! Combat log entries.
//!
//! Events are emitted in resolution order and reference minions by
//! `CombatId`, which is only meaningful within the battle that produced
//! it.

use serde::{Deserialize, Serialize};

use crate::cards::{Keyword, TemplateId};
use crate::core::{CombatId, PlayerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathReason {
    Damage,
    Poison,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    Attack {
        attacker: CombatId,
        attacker_player: PlayerId,
        defender: CombatId,
        defender_player: PlayerId,
    },
    Damage {
        target: CombatId,
        player: PlayerId,
        amount: i32,
        /// Health left after the hit.
        health: i32,
    },
    /// Divine Shield popped, Venomous spent, or Stealth broken.
    KeywordRemoved {
        target: CombatId,
        player: PlayerId,
        keyword: Keyword,
    },
    Death {
        target: CombatId,
        player: PlayerId,
        reason: DeathReason,
    },
    /// A deathrattle put a new minion on the board.
    Summon {
        minion: CombatId,
        player: PlayerId,
        template: TemplateId,
        position: usize,
    },
    /// A deathrattle buff. Lasts for this battle only.
    Buff {
        target: CombatId,
        player: PlayerId,
        attack: i32,
        health: i32,
    },
    /// `minion` came back in place of the dead `original`.
    Reborn {
        minion: CombatId,
        original: CombatId,
        player: PlayerId,
        position: usize,
    },
}

impl CombatEvent {
    /// Player whose minion the event is about. For attacks, the attacker.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            CombatEvent::Attack { attacker_player, .. } => *attacker_player,
            CombatEvent::Damage { player, .. }
            | CombatEvent::KeywordRemoved { player, .. }
            | CombatEvent::Death { player, .. }
            | CombatEvent::Summon { player, .. }
            | CombatEvent::Buff { player, .. }
            | CombatEvent::Reborn { player, .. } => *player,
        }
    }
}
