//! Core building blocks: seats, combat IDs, RNG, configuration, errors.

pub mod config;
pub mod entity;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{CombatConfig, EconomyConfig, GameConfig, PoolConfig, MAX_TIER};
pub use entity::{CombatId, CombatIdAllocator};
pub use error::{CatalogError, GameError, GameResult};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
