//! # tavern-core
//!
//! Deterministic simulation core for a multiplayer auto-battler: a
//! recruit phase where players buy, sell, and arrange minions from a
//! shared finite pool, and an automated combat phase that fights two
//! boards to completion.
//!
//! ## Design Principles
//!
//! 1. **Seeded Everything**: all randomness flows from one `GameRng` per
//!    match. Same seed and same actions replay the same match, combat
//!    logs included.
//!
//! 2. **Check, Then Act**: player operations validate before they
//!    mutate. An `Err` means nothing changed.
//!
//! 3. **One Owner per Match**: the shared pool is only reachable through
//!    `&mut Match`, which is the single serialization point.
//!
//! ## Modules
//!
//! - `core`: seats, combat IDs, RNG, configuration, errors
//! - `cards`: templates, instances, keywords, tribes, catalog
//! - `effects`: abilities as data and their recruit-phase resolver
//! - `zones`: board and hand
//! - `economy`: shared card pool and per-player shop
//! - `game`: players, actions, match
//! - `combat`: battle engine, event log, outcome, replay

pub mod cards;
pub mod combat;
pub mod core;
pub mod economy;
pub mod effects;
pub mod game;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    CatalogError, CombatConfig, CombatId, EconomyConfig, GameConfig, GameError, GameResult, GameRng,
    GameRngState, PlayerId, PlayerMap, PoolConfig,
};

pub use crate::cards::{
    calc_majority_tribe, Card, CardKind, CardRegistry, CardTemplate, Catalog, GoldenVariant, Keyword,
    Keywords, MajorityTribe, Minion, Spell, TemplateId, Tribe, TribeSummary,
};

pub use crate::effects::{Ability, AbilitySet, Effect, EffectResolver, EffectTarget, Trigger};

pub use crate::zones::{Board, Hand};

pub use crate::economy::{CardPool, Shop};

pub use crate::game::{Match, Player, PlayerAction, SharedMatch};

pub use crate::combat::{
    CombatEngine, CombatEvent, CombatOutcome, CombatReplay, CombatResult, Combatant, DeathReason,
};
