//! Battle outcome and replay.

use serde::{Deserialize, Serialize};

use super::event::CombatEvent;
use crate::core::PlayerId;
use crate::zones::Board;

/// One side of a finished battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSummary {
    pub player: PlayerId,
    pub tier: u8,
    /// Board as it entered combat, combat IDs assigned.
    pub initial: Board,
    /// Board after the last exchange.
    pub survivors: Board,
}

impl SideSummary {
    #[must_use]
    pub fn has_living(&self) -> bool {
        self.survivors.living_count() > 0
    }
}

/// Everything a finished battle produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub sides: [SideSummary; 2],
    pub first_attacker: PlayerId,
    pub events: Vec<CombatEvent>,
    /// The iteration cap ended the battle.
    pub capped: bool,
}

impl CombatOutcome {
    fn winning_side(&self) -> Option<&SideSummary> {
        if self.capped {
            return None;
        }
        match (self.sides[0].has_living(), self.sides[1].has_living()) {
            (true, false) => Some(&self.sides[0]),
            (false, true) => Some(&self.sides[1]),
            _ => None,
        }
    }

    /// `None` on a tie.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winning_side().map(|side| side.player)
    }

    #[must_use]
    pub fn loser(&self) -> Option<PlayerId> {
        let winner = self.winner()?;
        self.sides.iter().map(|s| s.player).find(|&p| p != winner)
    }

    /// Winner's tier plus the tiers of its surviving minions; 0 on a tie.
    #[must_use]
    pub fn damage(&self) -> u32 {
        self.winning_side()
            .map_or(0, |side| u32::from(side.tier) + side.survivors.living_tier_total())
    }

    /// Result record from `player`'s point of view.
    #[must_use]
    pub fn result_for(&self, player: PlayerId) -> Option<CombatResult> {
        let opponent = self.sides.iter().map(|s| s.player).find(|&p| p != player)?;
        if !self.sides.iter().any(|s| s.player == player) {
            return None;
        }
        Some(CombatResult {
            opponent,
            winner: self.winner(),
            damage: self.damage(),
        })
    }

    /// Initial snapshots plus the event log.
    #[must_use]
    pub fn replay(&self) -> CombatReplay {
        CombatReplay {
            players: [self.sides[0].player, self.sides[1].player],
            initial: [self.sides[0].initial.clone(), self.sides[1].initial.clone()],
            first_attacker: self.first_attacker,
            events: self.events.clone(),
        }
    }
}

/// Per-player battle record kept by the phase scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    pub opponent: PlayerId,
    pub winner: Option<PlayerId>,
    pub damage: u32,
}

/// What a renderer needs to play a battle back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatReplay {
    pub players: [PlayerId; 2],
    pub initial: [Board; 2],
    pub first_attacker: PlayerId,
    pub events: Vec<CombatEvent>,
}

impl CombatReplay {
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }
}
