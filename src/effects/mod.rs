//! Card abilities as data, and their recruit-phase execution.
//!
//! - `Effect` / `EffectTarget`: what an ability does and to whom
//! - `Trigger` / `Ability` / `AbilitySet`: when it fires, plus keywords
//! - `TargetSelector`: friendly target resolution
//! - `EffectResolver`: applies effects to a board during recruit
//!
//! Combat deathrattles are executed by the combat engine, which reuses
//! `TargetSelector` but only touches its own board clones.

mod ability;
mod effect;
mod resolver;
mod targeting;

pub use ability::{Ability, AbilitySet, Trigger};
pub use effect::{Effect, EffectTarget};
pub use resolver::{EffectResolver, ResolveResult, ResolverContext};
pub use targeting::{TargetSelector, Targets};
