//! Match configuration.
//!
//! All economy numbers, pool sizes, and combat limits live here instead
//! of being hardcoded. Every field has a default, so a JSON document only
//! needs to name what it overrides:
//!
//! ```
//! use tavern_core::core::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "economy": { "buy_cost": 2 } }"#).unwrap();
//! assert_eq!(config.economy.buy_cost, 2);
//! assert_eq!(config.economy.sell_refund, 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::TemplateId;

/// Highest tier a card or shop can reach.
pub const MAX_TIER: u8 = 6;

/// Gold, capacity, and shop tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_health: i32,
    pub starting_gold: u32,
    /// Ceiling for max gold growth.
    pub max_gold_cap: u32,
    pub buy_cost: u32,
    pub sell_refund: u32,
    pub refresh_cost: u32,
    pub hand_capacity: usize,
    pub board_capacity: usize,
    pub max_tier: u8,
    /// Base upgrade cost, indexed by current tier - 1.
    pub upgrade_costs: Vec<u32>,
    /// Shop offer size, indexed by tier - 1.
    pub shop_sizes: Vec<usize>,
    /// Spell put in the hand after a triple merge.
    pub triple_reward: Option<TemplateId>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_health: 40,
            starting_gold: 3,
            max_gold_cap: 10,
            buy_cost: 3,
            sell_refund: 1,
            refresh_cost: 1,
            hand_capacity: 10,
            board_capacity: 7,
            max_tier: MAX_TIER,
            upgrade_costs: vec![5, 7, 8, 9, 10],
            shop_sizes: vec![3, 4, 4, 5, 5, 6],
            triple_reward: None,
        }
    }
}

impl EconomyConfig {
    /// Number of cards the shop offers at `tier`.
    #[must_use]
    pub fn shop_size(&self, tier: u8) -> usize {
        let idx = usize::from(tier.max(1)) - 1;
        self.shop_sizes
            .get(idx)
            .or_else(|| self.shop_sizes.last())
            .copied()
            .unwrap_or(0)
    }

    /// Undiscounted cost to go from `tier` to `tier + 1`.
    ///
    /// `None` at the top tier.
    #[must_use]
    pub fn base_upgrade_cost(&self, tier: u8) -> Option<u32> {
        if tier >= self.max_tier {
            return None;
        }
        let idx = usize::from(tier.max(1)) - 1;
        self.upgrade_costs.get(idx).copied()
    }
}

/// Shared card pool sizing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Copies of each minion template, indexed by tier - 1.
    pub copies_per_tier: Vec<u32>,
    /// Cards offered by one discover.
    pub discover_count: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            copies_per_tier: vec![16, 15, 13, 11, 9, 7],
            discover_count: 3,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn copies_for_tier(&self, tier: u8) -> u32 {
        let idx = usize::from(tier.max(1)) - 1;
        self.copies_per_tier.get(idx).copied().unwrap_or(0)
    }
}

/// Combat safety limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Attack rounds before the battle is abandoned as a draw.
    pub max_iterations: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self { max_iterations: 500 }
    }
}

/// Complete match configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub economy: EconomyConfig,
    pub pool: PoolConfig,
    pub combat: CombatConfig,
}

impl GameConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_triple_reward(mut self, spell: TemplateId) -> Self {
        self.economy.triple_reward = Some(spell);
        self
    }
}
