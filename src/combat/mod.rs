//! Automated battles between two boards.
//!
//! ## Key Types
//!
//! - `CombatEngine`: clones two boards and fights them out
//! - `CombatEvent` / `DeathReason`: the ordered battle log
//! - `CombatOutcome`: final boards, log, and derived winner/damage
//! - `CombatResult`: per-player record for the scheduler
//! - `CombatReplay`: snapshots plus log, `bincode`-encodable
//!
//! ```
//! use std::sync::Arc;
//! use tavern_core::cards::{CardRegistry, CardTemplate, Minion, TemplateId};
//! use tavern_core::combat::{CombatEngine, Combatant};
//! use tavern_core::core::{CombatConfig, GameRng, PlayerId};
//! use tavern_core::zones::Board;
//!
//! let big = Arc::new(CardTemplate::minion(TemplateId::new(1), "Big", 2, 5, 5));
//! let small = Arc::new(CardTemplate::minion(TemplateId::new(2), "Small", 1, 1, 1));
//! let a = Board::from_minions(vec![Minion::new(big)]);
//! let b = Board::from_minions(vec![Minion::new(small)]);
//!
//! let outcome = CombatEngine::new(
//!     Combatant { player: PlayerId::new(0), tier: 3, board: &a },
//!     Combatant { player: PlayerId::new(1), tier: 1, board: &b },
//!     Arc::new(CardRegistry::new()),
//!     &CombatConfig::default(),
//!     GameRng::new(7),
//! )
//! .run();
//!
//! assert_eq!(outcome.winner(), Some(PlayerId::new(0)));
//! // Tier 3 plus one surviving tier-2 minion.
//! assert_eq!(outcome.damage(), 5);
//! ```

mod engine;
mod event;
mod result;

pub use engine::{CombatEngine, Combatant};
pub use event::{CombatEvent, DeathReason};
pub use result::{CombatOutcome, CombatReplay, CombatResult, SideSummary};
